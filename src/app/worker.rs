use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use dockside::docker::{
    BuildOptions, CommandRunner, ContainerDetails, ContainerState, FullStatus, LifecycleResult,
    StartOptions, StopOptions, Supervisor,
};

/// Lifecycle actions the watch screen can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Stop,
    Restart,
    Pull,
    Build,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Stop => "stop",
            Action::Restart => "restart",
            Action::Pull => "pull",
            Action::Build => "build",
        }
    }
}

/// Events streamed from background threads to the UI loop.
#[derive(Debug)]
pub enum WorkerEvent {
    Status(FullStatus),
    Details(Option<ContainerDetails>),
    ActionFinished {
        action: Action,
        result: LifecycleResult,
    },
}

/// Handle to the status poller. Dropping it stops the thread after its
/// current poll.
pub struct Poller {
    refresh_tx: Sender<()>,
}

impl Poller {
    /// Ask for a poll now instead of waiting for the next interval.
    pub fn refresh(&self) {
        let _ = self.refresh_tx.send(());
    }
}

/// Poll full status every `interval` (and on demand) on a background thread.
pub fn spawn_poller<R>(
    sup: Arc<Supervisor<R>>,
    interval: Duration,
    tx: Sender<WorkerEvent>,
) -> Poller
where
    R: CommandRunner + 'static,
{
    let (refresh_tx, refresh_rx) = mpsc::channel::<()>();
    std::thread::spawn(move || {
        loop {
            let status = sup.get_full_status();
            let running = status.container_state == ContainerState::Running;
            if tx.send(WorkerEvent::Status(status)).is_err() {
                break;
            }
            let details = if running {
                sup.get_container_details()
            } else {
                None
            };
            if tx.send(WorkerEvent::Details(details)).is_err() {
                break;
            }

            match refresh_rx.recv_timeout(interval) {
                Ok(()) | Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        tracing::debug!("status poller stopped");
    });
    Poller { refresh_tx }
}

/// Run one lifecycle action on its own thread; the result arrives as
/// [`WorkerEvent::ActionFinished`].
pub fn spawn_action<R>(sup: Arc<Supervisor<R>>, action: Action, tx: Sender<WorkerEvent>)
where
    R: CommandRunner + 'static,
{
    std::thread::spawn(move || {
        let result = run_action(&sup, action);
        let _ = tx.send(WorkerEvent::ActionFinished { action, result });
    });
}

pub fn run_action<R: CommandRunner>(sup: &Supervisor<R>, action: Action) -> LifecycleResult {
    match action {
        Action::Start => sup.start_container(StartOptions::default()),
        Action::Stop => sup.stop_container(StopOptions::default()),
        Action::Restart => {
            sup.restart_container(StopOptions::default(), StartOptions::default())
        }
        Action::Pull => sup.pull_images(),
        Action::Build => sup.build_images(BuildOptions::default()),
    }
}

/// Collect whatever is already queued without blocking.
pub fn drain(rx: &Receiver<WorkerEvent>) -> Vec<WorkerEvent> {
    rx.try_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockside::docker::SupervisorOptions;
    use dockside::docker::testing::FakeRunner;

    #[test]
    fn action_maps_to_compose_subcommand() {
        let sup = Supervisor::with_runner(
            FakeRunner::new().exit_ok("").exit_ok("").exit_ok(""),
            SupervisorOptions::default(),
        );
        assert!(run_action(&sup, Action::Pull).success);
        assert!(run_action(&sup, Action::Restart).success);
        let calls = sup.runner().calls();
        assert_eq!(calls[0].args, vec!["compose", "pull"]);
        assert_eq!(calls[1].args, vec!["compose", "down"]);
        assert_eq!(calls[2].args, vec!["compose", "up", "-d"]);
    }

    #[test]
    fn spawned_action_reports_back() {
        let sup = Arc::new(Supervisor::with_runner(
            FakeRunner::new().exit_err(1, "nope"),
            SupervisorOptions::default(),
        ));
        let (tx, rx) = mpsc::channel();
        spawn_action(sup, Action::Stop, tx);
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            WorkerEvent::ActionFinished { action, result } => {
                assert_eq!(action, Action::Stop);
                assert_eq!(result.error.as_deref(), Some("nope"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn poller_emits_status_then_details() {
        let sup = Arc::new(Supervisor::with_runner(
            FakeRunner::new().exit_err(1, "Cannot connect to the Docker daemon"),
            SupervisorOptions::default(),
        ));
        let (tx, rx) = mpsc::channel();
        let poller = spawn_poller(sup, Duration::from_secs(60), tx);

        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            WorkerEvent::Status(status) => {
                assert!(!status.is_daemon_running);
                assert_eq!(status.container_state, ContainerState::Unknown);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            WorkerEvent::Details(None)
        ));
        drop(poller);
    }
}
