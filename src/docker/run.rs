use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use thiserror::Error;

use super::types::{CommandOutput, CommandSpec};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Why a process produced no exit status.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Timeout: `{command}` did not finish within {}s", .timeout.as_secs_f32())]
    Timeout { command: String, timeout: Duration },
    #[error("failed while waiting on `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Runs one external command to completion.
///
/// The supervisor only talks to the OS through this trait, so tests can
/// swap in a scripted runner.
pub trait CommandRunner: Send + Sync {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, InvokeError>;
}

/// Spawns real processes via `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, InvokeError> {
        tracing::debug!(command = %spec.display(), "spawning");

        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .envs(&spec.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &spec.work_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|source| {
            tracing::warn!(program = %spec.program, error = %source, "spawn failed");
            InvokeError::Spawn {
                program: spec.program.clone(),
                source,
            }
        })?;

        // Drain both pipes concurrently so a chatty process can't block on a
        // full pipe while we poll for exit. Buffers come back over channels so
        // a grandchild holding a pipe open can't hold us past the deadline.
        let stdout_rx = child.stdout.take().map(spawn_reader);
        let stderr_rx = child.stderr.take().map(spawn_reader);

        let start = Instant::now();
        let exit_status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(source) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(InvokeError::Wait {
                        program: spec.program.clone(),
                        source,
                    });
                }
            }

            if start.elapsed() > spec.timeout {
                let _ = child.kill();
                let _ = child.wait();
                tracing::warn!(command = %spec.display(), timeout = ?spec.timeout, "timed out");
                return Err(InvokeError::Timeout {
                    command: spec.display(),
                    timeout: spec.timeout,
                });
            }

            std::thread::sleep(POLL_INTERVAL);
        };

        let deadline = start + spec.timeout;
        let collect = |rx: Option<mpsc::Receiver<Vec<u8>>>, stream: &str| {
            let Some(rx) = rx else {
                return String::new();
            };
            // A process that exits right at the deadline still gets one poll
            // interval for its pipes to flush.
            let wait = deadline
                .saturating_duration_since(Instant::now())
                .max(POLL_INTERVAL);
            match rx.recv_timeout(wait) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(_) => {
                    tracing::warn!(
                        command = %spec.display(),
                        stream,
                        "pipe still held open after exit, output dropped"
                    );
                    String::new()
                }
            }
        };

        let stdout = collect(stdout_rx, "stdout");
        let stderr = collect(stderr_rx, "stderr");
        let output = CommandOutput {
            exit_code: exit_status.code(),
            stdout,
            stderr,
        };
        tracing::debug!(
            command = %spec.display(),
            exit_code = ?output.exit_code,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "finished"
        );
        Ok(output)
    }
}

/// Reads `pipe` to EOF on its own thread and hands the bytes back once done.
fn spawn_reader<P: Read + Send + 'static>(mut pipe: P) -> mpsc::Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send(buf);
    });
    rx
}
