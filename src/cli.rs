//! Command-line surface.
//!
//! Every subcommand maps onto one supervisor operation and prints its result,
//! either as text or (with `--json`) as the same camelCase object the IPC
//! layer receives.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use dockside::config::{self, ComposeVariant, Config};
use dockside::docker::{
    BuildOptions, CommandRunner, LifecycleResult, StartOptions, StopOptions, Supervisor,
};

#[derive(Parser, Debug)]
#[command(name = "dockside")]
#[command(about = "Supervise the local Docker backend: status, lifecycle, and a live view")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Config file (defaults to .dockside.yaml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Name of the managed container
    #[arg(long, global = true, env = "DOCKSIDE_CONTAINER")]
    pub container: Option<String>,

    /// Directory holding the compose project
    #[arg(long, global = true)]
    pub work_dir: Option<PathBuf>,

    /// Use the standalone `docker-compose` binary instead of `docker compose`
    #[arg(long, global = true)]
    pub legacy_compose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Daemon + container status (default)
    ///
    /// Exits 0 whenever the daemon answered, whether or not the container is
    /// up; exits 1 when the daemon is unreachable.
    Status,
    /// Daemon reachability only
    Daemon,
    /// `docker inspect` summary of the container
    Inspect,
    /// Start the backend (`compose up -d`)
    Start(StartArgs),
    /// Stop the backend (`compose down`)
    Stop(StopArgs),
    /// Stop, then start
    Restart {
        #[command(flatten)]
        stop: StopArgs,
        #[command(flatten)]
        start: StartArgs,
    },
    /// Pull images (`compose pull`)
    Pull,
    /// Build images (`compose build`)
    Build {
        /// Do not use the build cache
        #[arg(long)]
        no_cache: bool,
    },
    /// Block until the daemon answers or the timeout passes
    Wait {
        /// Give up after this many seconds (defaults to config daemon_wait_secs)
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Delay between checks
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },
    /// Diagnose why Docker is not usable
    Doctor,
    /// Live status view with lifecycle keys
    Watch,
}

#[derive(Args, Debug, Default)]
pub struct StartArgs {
    /// Build images before starting
    #[arg(long)]
    pub build: bool,
    /// Recreate containers even if unchanged
    #[arg(long)]
    pub force_recreate: bool,
}

impl From<&StartArgs> for StartOptions {
    fn from(a: &StartArgs) -> Self {
        StartOptions {
            build: a.build,
            force_recreate: a.force_recreate,
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct StopArgs {
    /// Remove named volumes
    #[arg(long)]
    pub volumes: bool,
    /// Remove containers not defined in the compose file
    #[arg(long)]
    pub remove_orphans: bool,
}

impl From<&StopArgs> for StopOptions {
    fn from(a: &StopArgs) -> Self {
        StopOptions {
            volumes: a.volumes,
            remove_orphans: a.remove_orphans,
        }
    }
}

impl Cli {
    /// Load the config file and layer command-line overrides on top.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => config::load_file(path)?,
            None => config::load(&std::env::current_dir()?)?,
        };
        if let Some(name) = &self.container {
            cfg.container_name = name.clone();
        }
        if let Some(dir) = &self.work_dir {
            cfg.work_dir = dir.clone();
        }
        if self.legacy_compose {
            cfg.compose_variant = ComposeVariant::Standalone;
        }
        Ok(cfg)
    }
}

/// JSON payload for `doctor`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DoctorReport {
    client_version: Option<String>,
    daemon: dockside::docker::DaemonStatus,
    problem: Option<dockside::docker::ClassifiedError>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_lifecycle(result: &LifecycleResult, json: bool) -> Result<bool> {
    if json {
        print_json(result)?;
    } else if result.success {
        println!("{}", result.message.as_deref().unwrap_or("ok"));
    } else {
        eprintln!("error: {}", result.error.as_deref().unwrap_or("unknown error"));
    }
    Ok(result.success)
}

/// Run a one-shot subcommand. Returns whether it succeeded.
pub fn run_command<R: CommandRunner>(
    sup: &Supervisor<R>,
    cfg: &Config,
    command: &Command,
    json: bool,
) -> Result<bool> {
    match command {
        Command::Status => {
            let status = sup.get_full_status();
            if json {
                print_json(&status)?;
            } else {
                if status.is_daemon_running {
                    println!(
                        "daemon:    running ({})",
                        status.version.as_deref().unwrap_or("unknown version")
                    );
                } else {
                    println!(
                        "daemon:    not running: {}",
                        status.error.as_deref().unwrap_or("unknown error")
                    );
                }
                println!(
                    "container: {} ({})",
                    status.container_state, status.container_name
                );
                if let Some(health) = &status.health_status {
                    println!("health:    {health}");
                }
            }
            Ok(status.is_daemon_running)
        }
        Command::Daemon => {
            let status = sup.check_daemon_status();
            if json {
                print_json(&status)?;
            } else if status.is_daemon_running {
                println!(
                    "running ({})",
                    status.version.as_deref().unwrap_or("unknown version")
                );
            } else {
                println!(
                    "not running: {}",
                    status.error.as_deref().unwrap_or("unknown error")
                );
            }
            Ok(status.is_daemon_running)
        }
        Command::Inspect => {
            let details = sup.get_container_details();
            if json {
                print_json(&details)?;
            } else {
                match &details {
                    Some(d) => {
                        println!("name:   {}", d.name);
                        println!("image:  {}", d.image);
                        println!("state:  {}", d.state);
                        println!("health: {}", d.health.as_deref().unwrap_or("none"));
                    }
                    None => println!("container {} not found", cfg.container_name),
                }
            }
            Ok(details.is_some())
        }
        Command::Start(args) => print_lifecycle(&sup.start_container(args.into()), json),
        Command::Stop(args) => print_lifecycle(&sup.stop_container(args.into()), json),
        Command::Restart { stop, start } => {
            print_lifecycle(&sup.restart_container(stop.into(), start.into()), json)
        }
        Command::Pull => print_lifecycle(&sup.pull_images(), json),
        Command::Build { no_cache } => print_lifecycle(
            &sup.build_images(BuildOptions {
                no_cache: *no_cache,
            }),
            json,
        ),
        Command::Wait {
            timeout_secs,
            interval_ms,
        } => {
            let timeout = Duration::from_secs(timeout_secs.unwrap_or(cfg.daemon_wait_secs));
            let mut report = |attempt: u32, err: &str| {
                if !json {
                    eprintln!("waiting for docker daemon (attempt {attempt}): {err}");
                }
            };
            let result = sup.wait_for_daemon(
                timeout,
                Duration::from_millis(*interval_ms),
                Some(&mut report as &mut dyn FnMut(u32, &str)),
            );
            print_lifecycle(&result, json)
        }
        Command::Doctor => {
            let client_version = sup.docker_version();
            let daemon = sup.check_daemon_status();
            let problem = (!daemon.is_daemon_running).then(|| {
                dockside::docker::classify_error(daemon.error.as_deref().unwrap_or_default())
            });
            let healthy = problem.is_none();
            if json {
                print_json(&DoctorReport {
                    client_version,
                    daemon,
                    problem,
                })?;
            } else {
                println!(
                    "client: {}",
                    client_version.as_deref().unwrap_or("docker not found")
                );
                println!("compose: {}", cfg.compose_variant.as_str());
                match &problem {
                    None => println!(
                        "daemon: running ({})",
                        daemon.version.as_deref().unwrap_or("unknown version")
                    ),
                    Some(p) => {
                        println!("daemon: {}", p.code.as_str());
                        println!("  {}", p.message);
                        println!("  hint: {}", p.suggestion);
                    }
                }
            }
            Ok(healthy)
        }
        // Handled by main before a one-shot runner is needed.
        Command::Watch => Ok(true),
    }
}
