//! Checks against a real Docker installation.
//!
//! These require a running Docker daemon and are marked `#[ignore]`.
//! Run with: `cargo test -- --ignored`

use std::time::Duration;

use dockside::config::Config;
use dockside::docker::{ContainerState, StartOptions, StopOptions, Supervisor, SupervisorOptions};

/// A throwaway compose project with one idle container.
fn setup_project(container: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("failed to create tempdir");
    let compose = format!(
        "services:\n  idle:\n    image: busybox:1.36\n    container_name: {container}\n    command: [\"sleep\", \"300\"]\n"
    );
    std::fs::write(dir.path().join("compose.yaml"), compose).expect("failed to write compose.yaml");
    dir
}

fn supervisor_for(dir: &std::path::Path, container: &str) -> Supervisor {
    let cfg = Config {
        container_name: container.to_string(),
        work_dir: dir.to_path_buf(),
        lifecycle_timeout_secs: 180,
        ..Config::default()
    };
    Supervisor::new(SupervisorOptions::from_config(&cfg))
}

#[test]
#[ignore]
fn daemon_reports_a_version() {
    let sup = supervisor_for(std::path::Path::new("."), "unused");
    let status = sup.check_daemon_status();
    assert!(status.is_daemon_running, "daemon error: {:?}", status.error);
    assert!(status.version.is_some());
    assert!(sup.get_daemon_error().is_none());
    assert!(sup.docker_version().is_some());
}

#[test]
#[ignore]
fn compose_lifecycle_round_trip() {
    let name = "dockside-live-test";
    let dir = setup_project(name);
    let sup = supervisor_for(dir.path(), name);

    let waited = sup.wait_for_daemon(Duration::from_secs(30), Duration::from_secs(1), None);
    assert!(waited.success, "{:?}", waited.error);

    let started = sup.start_container(StartOptions::default());
    assert!(started.success, "start failed: {:?}", started.error);
    assert_eq!(
        sup.check_container_status().container_state,
        ContainerState::Running
    );
    let details = sup.get_container_details().expect("inspect should succeed");
    assert_eq!(details.name, name);
    assert_eq!(details.state, "running");

    let restarted = sup.restart_container(StopOptions::default(), StartOptions::default());
    assert!(restarted.success, "restart failed: {:?}", restarted.error);

    let stopped = sup.stop_container(StopOptions {
        volumes: true,
        remove_orphans: true,
    });
    assert!(stopped.success, "stop failed: {:?}", stopped.error);
    assert_eq!(
        sup.check_container_status().container_state,
        ContainerState::Stopped
    );
    assert!(sup.get_container_details().is_none());
}
