use std::time::{Duration, Instant};

use super::run::CommandRunner;
use super::supervisor::Supervisor;
use super::types::LifecycleResult;

impl<R: CommandRunner> Supervisor<R> {
    /// Poll the daemon until it answers or `timeout` elapses.
    ///
    /// Returns immediately if the first check succeeds. `on_retry` is called
    /// after every failed re-check with a 1-based attempt number and the
    /// daemon error from that check.
    pub fn wait_for_daemon(
        &self,
        timeout: Duration,
        interval: Duration,
        mut on_retry: Option<&mut dyn FnMut(u32, &str)>,
    ) -> LifecycleResult {
        let start = Instant::now();
        let first = self.check_daemon_status();
        if first.is_daemon_running {
            return LifecycleResult::ok(ready_message(first.version.as_deref()));
        }

        let mut last_error = first.error.unwrap_or_default();
        let mut attempt: u32 = 0;

        while start.elapsed() < timeout {
            let remaining = timeout.saturating_sub(start.elapsed());
            std::thread::sleep(interval.min(remaining));

            let status = self.check_daemon_status();
            attempt += 1;
            if status.is_daemon_running {
                tracing::info!(attempt, "docker daemon became ready");
                return LifecycleResult::ok(ready_message(status.version.as_deref()));
            }

            last_error = status.error.unwrap_or_default();
            tracing::debug!(attempt, error = %last_error, "docker daemon not ready yet");
            if let Some(cb) = on_retry.as_deref_mut() {
                cb(attempt, &last_error);
            }
        }

        tracing::warn!(
            timeout_ms = timeout.as_millis() as u64,
            attempts = attempt + 1,
            "gave up waiting for docker daemon"
        );
        LifecycleResult::failed(format!(
            "Docker daemon did not become ready before timeout ({}ms): {last_error}",
            timeout.as_millis()
        ))
    }
}

fn ready_message(version: Option<&str>) -> String {
    match version {
        Some(v) => format!("Docker daemon is running (version {v})"),
        None => "Docker daemon is running".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docker::supervisor::SupervisorOptions;
    use crate::docker::testing::FakeRunner;

    fn supervisor(runner: FakeRunner) -> Supervisor<FakeRunner> {
        Supervisor::with_runner(runner, SupervisorOptions::default())
    }

    #[test]
    fn returns_immediately_when_daemon_is_up() {
        let sup = supervisor(FakeRunner::new().exit_ok("27.3.1"));
        let started = Instant::now();
        let result = sup.wait_for_daemon(Duration::from_secs(10), Duration::from_secs(1), None);
        assert!(result.success);
        assert!(started.elapsed() < Duration::from_millis(500));
        assert_eq!(sup.runner().call_count(), 1);
    }

    #[test]
    fn succeeds_after_two_failures() {
        let sup = supervisor(
            FakeRunner::new()
                .exit_err(1, "Cannot connect")
                .exit_err(1, "Cannot connect")
                .exit_ok("27.3.1"),
        );
        let result =
            sup.wait_for_daemon(Duration::from_secs(10), Duration::from_millis(100), None);
        assert!(result.success);
        assert_eq!(sup.runner().call_count(), 3);
    }

    #[test]
    fn retry_callback_counts_failed_attempts() {
        let sup = supervisor(
            FakeRunner::new()
                .exit_err(1, "first")
                .exit_err(1, "second")
                .exit_err(1, "third")
                .exit_ok(""),
        );
        let mut seen = Vec::new();
        let mut record = |attempt: u32, err: &str| seen.push((attempt, err.to_string()));
        let result = sup.wait_for_daemon(
            Duration::from_secs(10),
            Duration::from_millis(10),
            Some(&mut record as &mut dyn FnMut(u32, &str)),
        );
        assert!(result.success);
        assert_eq!(seen, vec![(1, "second".to_string()), (2, "third".to_string())]);
    }

    #[test]
    fn gives_up_with_timeout_message() {
        let mut runner = FakeRunner::new();
        for _ in 0..50 {
            runner = runner.exit_err(1, "Cannot connect to the Docker daemon");
        }
        let sup = supervisor(runner);
        let started = Instant::now();
        let result =
            sup.wait_for_daemon(Duration::from_millis(200), Duration::from_millis(50), None);
        assert!(!result.success);
        let error = result.error.unwrap();
        assert!(error.contains("timeout"));
        assert!(error.contains("Cannot connect"));
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
