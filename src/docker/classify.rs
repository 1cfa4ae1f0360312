use super::types::{ClassifiedError, ErrorCode};

// Matched case-insensitively against CLI / spawn error text. Order matters:
// the first table that hits wins.
const DAEMON_NOT_RUNNING: &[&str] = &[
    "cannot connect",
    "is the docker daemon running",
    "error during connect",
];
const NOT_INSTALLED: &[&str] = &[
    "enoent",
    "no such file or directory",
    "program not found",
    "command not found",
];
const PERMISSION_DENIED: &[&str] = &["permission denied"];

/// Map raw error text from a failed daemon query to a [`ClassifiedError`].
pub fn classify_error(text: &str) -> ClassifiedError {
    let lower = text.to_lowercase();
    let hit = |patterns: &[&str]| patterns.iter().any(|p| lower.contains(p));

    let code = if hit(DAEMON_NOT_RUNNING) {
        ErrorCode::DaemonNotRunning
    } else if hit(NOT_INSTALLED) {
        ErrorCode::DockerNotInstalled
    } else if hit(PERMISSION_DENIED) {
        ErrorCode::PermissionDenied
    } else {
        ErrorCode::UnknownError
    };

    let (message, suggestion) = match code {
        ErrorCode::DaemonNotRunning => (
            "Docker is installed but the daemon is not running.",
            "Start Docker Desktop (or the docker service) and try again.",
        ),
        ErrorCode::DockerNotInstalled => (
            "Docker was not found on this machine.",
            "Install Docker Desktop from https://www.docker.com/products/docker-desktop and make sure `docker` is on PATH.",
        ),
        ErrorCode::PermissionDenied => (
            "Permission denied while talking to the Docker daemon.",
            "Add your user to the `docker` group (or run Docker Desktop) and log in again.",
        ),
        ErrorCode::UnknownError => (
            "Docker reported an unexpected error.",
            "Check the Docker logs or restart Docker Desktop.",
        ),
    };

    let detail = text.trim();
    ClassifiedError {
        code,
        message: if detail.is_empty() {
            message.to_string()
        } else {
            format!("{message} ({detail})")
        },
        suggestion: suggestion.to_string(),
    }
}
