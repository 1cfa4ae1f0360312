//! Scripted [`CommandRunner`] for exercising the supervisor without Docker.
//!
//! Responses are handed out in the order they were queued; every spec the
//! supervisor runs is recorded for later assertions.
//!
//! ```
//! use dockside::docker::testing::FakeRunner;
//! use dockside::docker::{Supervisor, SupervisorOptions};
//!
//! let runner = FakeRunner::new().exit_ok("27.3.1\n");
//! let sup = Supervisor::with_runner(runner, SupervisorOptions::default());
//! assert!(sup.check_daemon_status().is_daemon_running);
//! assert_eq!(sup.runner().call_count(), 1);
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use super::run::{CommandRunner, InvokeError};
use super::types::{CommandOutput, CommandSpec};

#[derive(Debug, Clone)]
enum Scripted {
    Exit(CommandOutput),
    SpawnError(String),
    Timeout,
}

#[derive(Debug, Default)]
pub struct FakeRunner {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<CommandSpec>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an exit-code-0 run with the given stdout.
    pub fn exit_ok(self, stdout: &str) -> Self {
        self.push(Scripted::Exit(CommandOutput {
            exit_code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }))
    }

    /// Queue a run that exits with `code` and the given stderr.
    pub fn exit_err(self, code: i32, stderr: &str) -> Self {
        self.push(Scripted::Exit(CommandOutput {
            exit_code: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }))
    }

    /// Queue a fully specified output.
    pub fn output(self, output: CommandOutput) -> Self {
        self.push(Scripted::Exit(output))
    }

    /// Queue a run whose process could not be started.
    pub fn spawn_err(self, message: &str) -> Self {
        self.push(Scripted::SpawnError(message.to_string()))
    }

    /// Queue a run that exceeds its deadline.
    pub fn timeout(self) -> Self {
        self.push(Scripted::Timeout)
    }

    fn push(self, item: Scripted) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(item);
        }
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or_default()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, InvokeError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(spec.clone());
        }
        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match next {
            Some(Scripted::Exit(output)) => Ok(output),
            Some(Scripted::SpawnError(message)) => Err(InvokeError::Spawn {
                program: spec.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, message),
            }),
            Some(Scripted::Timeout) => Err(InvokeError::Timeout {
                command: spec.display(),
                timeout: spec.timeout,
            }),
            None => Err(InvokeError::Spawn {
                program: spec.program.clone(),
                source: std::io::Error::other(format!(
                    "no scripted response left for `{}`",
                    spec.display()
                )),
            }),
        }
    }
}
