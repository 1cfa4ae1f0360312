use super::run::CommandRunner;
use super::supervisor::Supervisor;
use super::types::{BuildOptions, LifecycleResult, StartOptions, StopOptions};

/// The compose subcommand behind each lifecycle operation, plus the wording
/// used when the tool itself prints nothing useful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Start,
    Stop,
    Pull,
    Build,
}

impl Operation {
    fn verb(self) -> &'static str {
        match self {
            Operation::Start => "start",
            Operation::Stop => "stop",
            Operation::Pull => "pull",
            Operation::Build => "build",
        }
    }

    fn success_message(self) -> &'static str {
        match self {
            Operation::Start => "Container started",
            Operation::Stop => "Container stopped",
            Operation::Pull => "Images pulled",
            Operation::Build => "Images built",
        }
    }

    fn failure_message(self) -> String {
        match self {
            Operation::Pull => "Failed to pull images".to_string(),
            Operation::Build => "Failed to build images".to_string(),
            _ => format!("Failed to {} container", self.verb()),
        }
    }
}

pub fn start_args(opts: StartOptions) -> Vec<&'static str> {
    let mut args = vec!["up", "-d"];
    if opts.build {
        args.push("--build");
    }
    if opts.force_recreate {
        args.push("--force-recreate");
    }
    args
}

pub fn stop_args(opts: StopOptions) -> Vec<&'static str> {
    let mut args = vec!["down"];
    if opts.volumes {
        args.push("--volumes");
    }
    if opts.remove_orphans {
        args.push("--remove-orphans");
    }
    args
}

pub fn build_args(opts: BuildOptions) -> Vec<&'static str> {
    let mut args = vec!["build"];
    if opts.no_cache {
        args.push("--no-cache");
    }
    args
}

impl<R: CommandRunner> Supervisor<R> {
    pub fn start_container(&self, opts: StartOptions) -> LifecycleResult {
        self.lifecycle(Operation::Start, &start_args(opts))
    }

    pub fn stop_container(&self, opts: StopOptions) -> LifecycleResult {
        self.lifecycle(Operation::Stop, &stop_args(opts))
    }

    /// Stop, then start. A failed stop is returned untouched and start is
    /// never attempted.
    pub fn restart_container(&self, stop: StopOptions, start: StartOptions) -> LifecycleResult {
        let stopped = self.stop_container(stop);
        if !stopped.success {
            return stopped;
        }
        let started = self.start_container(start);
        if !started.success {
            return started;
        }
        LifecycleResult::ok("Container restarted")
    }

    pub fn pull_images(&self) -> LifecycleResult {
        self.lifecycle(Operation::Pull, &["pull"])
    }

    pub fn build_images(&self, opts: BuildOptions) -> LifecycleResult {
        self.lifecycle(Operation::Build, &build_args(opts))
    }

    fn lifecycle(&self, op: Operation, args: &[&str]) -> LifecycleResult {
        let spec = self.compose_command(args);
        tracing::info!(
            op = op.verb(),
            container = %self.opts.container_name,
            command = %spec.display(),
            "lifecycle operation"
        );

        let result = match self.runner.run(&spec) {
            Ok(out) if out.success() => {
                let stdout = out.stdout.trim();
                LifecycleResult::ok(if stdout.is_empty() {
                    op.success_message().to_string()
                } else {
                    stdout.to_string()
                })
            }
            Ok(out) => {
                let stderr = out.stderr.trim();
                LifecycleResult::failed(if stderr.is_empty() {
                    op.failure_message()
                } else {
                    stderr.to_string()
                })
            }
            Err(e) => LifecycleResult::failed(e.to_string()),
        };

        if result.success {
            tracing::info!(op = op.verb(), "lifecycle operation succeeded");
        } else {
            tracing::warn!(op = op.verb(), error = ?result.error, "lifecycle operation failed");
        }
        result
    }
}
