use chrono::Utc;
use serde::Deserialize;

use super::classify::classify_error;
use super::run::CommandRunner;
use super::supervisor::Supervisor;
use super::types::{
    ClassifiedError, ContainerDetails, ContainerState, ContainerStatus, DaemonStatus, FullStatus,
};

const DAEMON_CHECK_FAILED: &str = "Docker daemon check failed";

// `docker inspect` renders this per container; health is empty when the
// image defines no healthcheck.
const INSPECT_TEMPLATE: &str = r#"{"name":{{json .Name}},"state":{{json .State.Status}},"image":{{json .Config.Image}},"health":"{{if .State.Health}}{{.State.Health.Status}}{{end}}"}"#;

#[derive(Deserialize)]
struct RawDetails {
    name: String,
    state: String,
    image: String,
    #[serde(default)]
    health: String,
}

/// Parse one line of [`INSPECT_TEMPLATE`] output.
pub fn parse_inspect(stdout: &str) -> Option<ContainerDetails> {
    let line = stdout.lines().map(str::trim).find(|l| !l.is_empty())?;
    let raw: RawDetails = serde_json::from_str(line).ok()?;
    let health = raw.health.trim();
    Some(ContainerDetails {
        name: raw.name.trim_start_matches('/').to_string(),
        state: raw.state,
        image: raw.image,
        health: (!health.is_empty()).then(|| health.to_string()),
    })
}

/// True when `name` is one of the lines of `docker ps --format {{.Names}}`.
/// Prefix collisions (`app` vs `app-dev`) do not count.
pub fn names_contain(ps_output: &str, name: &str) -> bool {
    ps_output.lines().any(|line| line.trim() == name)
}

impl<R: CommandRunner> Supervisor<R> {
    pub fn check_daemon_status(&self) -> DaemonStatus {
        let spec = self.docker_query(&["info", "--format", "{{.ServerVersion}}"]);
        let status = match self.runner.run(&spec) {
            Ok(out) if out.success() => {
                let version = out.stdout.trim();
                DaemonStatus {
                    is_daemon_running: true,
                    version: (!version.is_empty()).then(|| version.to_string()),
                    error: None,
                }
            }
            Ok(out) => {
                let stderr = out.stderr.trim();
                DaemonStatus {
                    is_daemon_running: false,
                    version: None,
                    error: Some(if stderr.is_empty() {
                        DAEMON_CHECK_FAILED.to_string()
                    } else {
                        stderr.to_string()
                    }),
                }
            }
            Err(e) => DaemonStatus {
                is_daemon_running: false,
                version: None,
                error: Some(e.to_string()),
            },
        };
        tracing::debug!(
            running = status.is_daemon_running,
            version = ?status.version,
            error = ?status.error,
            "daemon status"
        );
        status
    }

    pub fn check_container_status(&self) -> ContainerStatus {
        let name = &self.opts.container_name;
        let spec = self.docker_query(&["ps", "--format", "{{.Names}}"]);
        let container_state = match self.runner.run(&spec) {
            Ok(out) if out.success() => {
                if names_contain(&out.stdout, name) {
                    ContainerState::Running
                } else {
                    ContainerState::Stopped
                }
            }
            Ok(out) => {
                tracing::debug!(stderr = %out.stderr.trim(), "docker ps failed");
                ContainerState::Unknown
            }
            Err(e) => {
                tracing::debug!(error = %e, "docker ps failed");
                ContainerState::Unknown
            }
        };
        tracing::debug!(container = %name, state = %container_state, "container status");
        ContainerStatus {
            container_state,
            container_name: name.clone(),
            health_status: None,
        }
    }

    /// `None` when the container does not exist or inspect output is unusable.
    pub fn get_container_details(&self) -> Option<ContainerDetails> {
        let spec = self.docker_query(&[
            "inspect",
            self.opts.container_name.as_str(),
            "--format",
            INSPECT_TEMPLATE,
        ]);
        match self.runner.run(&spec) {
            Ok(out) if out.success() => parse_inspect(&out.stdout),
            _ => None,
        }
    }

    /// Daemon first; the container is only queried once the daemon answers.
    pub fn get_full_status(&self) -> FullStatus {
        let daemon = self.check_daemon_status();
        if !daemon.is_daemon_running {
            return FullStatus {
                is_daemon_running: false,
                version: daemon.version,
                error: daemon.error,
                container_state: ContainerState::Unknown,
                container_name: self.opts.container_name.clone(),
                health_status: None,
                timestamp: Utc::now(),
            };
        }

        let container = self.check_container_status();
        let health_status = if container.container_state == ContainerState::Running {
            self.get_container_details().and_then(|d| d.health)
        } else {
            None
        };

        FullStatus {
            is_daemon_running: true,
            version: daemon.version,
            error: None,
            container_state: container.container_state,
            container_name: container.container_name,
            health_status,
            timestamp: Utc::now(),
        }
    }

    /// Classify why the daemon is unreachable, or `None` if it is fine.
    pub fn get_daemon_error(&self) -> Option<ClassifiedError> {
        let status = self.check_daemon_status();
        if status.is_daemon_running {
            return None;
        }
        Some(classify_error(status.error.as_deref().unwrap_or_default()))
    }

    /// Client version line from `docker --version`; `None` if docker is missing.
    pub fn docker_version(&self) -> Option<String> {
        let spec = self.docker_query(&["--version"]);
        match self.runner.run(&spec) {
            Ok(out) if out.success() => {
                let line = out.stdout.trim();
                (!line.is_empty()).then(|| line.to_string())
            }
            _ => None,
        }
    }
}
