use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Describes a single process invocation. `args` is the full argument list
/// passed to `program` (the supervisor is responsible for assembling it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub work_dir: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
    pub timeout: Duration,
}

impl CommandSpec {
    pub fn new(program: &str, args: &[&str], timeout: Duration) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            work_dir: None,
            env: BTreeMap::new(),
            timeout,
        }
    }

    /// Shell-style rendering, used for logs only.
    pub fn display(&self) -> String {
        let mut words = Vec::with_capacity(self.args.len() + 1);
        words.push(self.program.as_str());
        words.extend(self.args.iter().map(String::as_str));
        shell_words::join(words)
    }
}

/// What a process left behind once it closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Daemon reachability, from `docker info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaemonStatus {
    pub is_daemon_running: bool,
    pub version: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    Running,
    Stopped,
    Unknown,
}

impl ContainerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerState::Running => "running",
            ContainerState::Stopped => "stopped",
            ContainerState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStatus {
    pub container_state: ContainerState,
    pub container_name: String,
    pub health_status: Option<String>,
}

/// Daemon and container status merged at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullStatus {
    pub is_daemon_running: bool,
    pub version: Option<String>,
    pub error: Option<String>,
    pub container_state: ContainerState,
    pub container_name: String,
    pub health_status: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Parsed `docker inspect` output for the managed container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDetails {
    pub name: String,
    pub state: String,
    pub image: String,
    pub health: Option<String>,
}

/// Outcome of a start/stop/restart/pull/build call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleResult {
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl LifecycleResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    DaemonNotRunning,
    DockerNotInstalled,
    PermissionDenied,
    UnknownError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::DaemonNotRunning => "DAEMON_NOT_RUNNING",
            ErrorCode::DockerNotInstalled => "DOCKER_NOT_INSTALLED",
            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

/// A daemon failure mapped to something a user can act on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedError {
    pub code: ErrorCode,
    pub message: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartOptions {
    pub build: bool,
    pub force_recreate: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StopOptions {
    pub volumes: bool,
    pub remove_orphans: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub no_cache: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_display_joins_words() {
        let spec = CommandSpec::new("docker", &["compose", "up", "-d"], Duration::from_secs(1));
        assert_eq!(spec.display(), "docker compose up -d");

        let spaced = CommandSpec::new("docker", &["logs", "my app"], Duration::from_secs(1));
        assert_eq!(spaced.display(), "docker logs 'my app'");
    }

    #[test]
    fn output_success_requires_zero_exit() {
        let mut out = CommandOutput::default();
        assert!(!out.success());
        out.exit_code = Some(0);
        assert!(out.success());
        out.exit_code = Some(1);
        assert!(!out.success());
    }

    #[test]
    fn status_serializes_camel_case() {
        let status = DaemonStatus {
            is_daemon_running: true,
            version: Some("27.1.1".into()),
            error: None,
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["isDaemonRunning"], true);
        assert_eq!(json["version"], "27.1.1");
    }

    #[test]
    fn enums_serialize_as_wire_names() {
        assert_eq!(
            serde_json::to_value(ContainerState::Stopped).unwrap(),
            "stopped"
        );
        assert_eq!(
            serde_json::to_value(ErrorCode::DaemonNotRunning).unwrap(),
            "DAEMON_NOT_RUNNING"
        );
        assert_eq!(ErrorCode::PermissionDenied.as_str(), "PERMISSION_DENIED");
    }
}
