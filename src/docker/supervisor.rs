use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{ComposeVariant, Config};

use super::run::{CommandRunner, SystemRunner};
use super::types::CommandSpec;

/// Everything the supervisor needs to know about the managed backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorOptions {
    pub container_name: String,
    /// Directory holding the compose project.
    pub work_dir: PathBuf,
    pub compose_file: Option<PathBuf>,
    pub variant: ComposeVariant,
    /// Applies to status queries (`info`, `ps`, `inspect`, `--version`).
    pub query_timeout: Duration,
    /// Applies to compose lifecycle commands.
    pub lifecycle_timeout: Duration,
    pub env: BTreeMap<String, String>,
}

impl SupervisorOptions {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            container_name: cfg.container_name.clone(),
            work_dir: cfg.work_dir.clone(),
            compose_file: cfg.compose_file.clone(),
            variant: cfg.compose_variant,
            query_timeout: Duration::from_secs(cfg.query_timeout_secs),
            lifecycle_timeout: Duration::from_secs(cfg.lifecycle_timeout_secs),
            env: cfg.env.clone(),
        }
    }
}

impl Default for SupervisorOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Queries and controls the local Docker backend.
///
/// Holds no state between calls: every status is recomputed from a fresh
/// subprocess, and concurrent calls each spawn their own.
pub struct Supervisor<R = SystemRunner> {
    pub(super) runner: R,
    pub(super) opts: SupervisorOptions,
}

impl Supervisor<SystemRunner> {
    pub fn new(opts: SupervisorOptions) -> Self {
        Self::with_runner(SystemRunner, opts)
    }
}

impl<R: CommandRunner> Supervisor<R> {
    pub fn with_runner(runner: R, opts: SupervisorOptions) -> Self {
        Self { runner, opts }
    }

    pub fn options(&self) -> &SupervisorOptions {
        &self.opts
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// A plain `docker` query bound by the query timeout.
    pub(super) fn docker_query(&self, args: &[&str]) -> CommandSpec {
        let mut spec = CommandSpec::new("docker", args, self.opts.query_timeout);
        spec.env = self.opts.env.clone();
        spec
    }

    /// A compose invocation in the project directory, in whichever form the
    /// options select.
    pub(super) fn compose_command(&self, args: &[&str]) -> CommandSpec {
        let (program, mut full): (&str, Vec<String>) = match self.opts.variant {
            ComposeVariant::Plugin => ("docker", vec!["compose".into()]),
            ComposeVariant::Standalone => ("docker-compose", Vec::new()),
        };
        if let Some(file) = &self.opts.compose_file {
            full.push("-f".into());
            full.push(file.display().to_string());
        }
        full.extend(args.iter().map(|a| a.to_string()));

        CommandSpec {
            program: program.to_string(),
            args: full,
            work_dir: Some(self.opts.work_dir.clone()),
            env: self.opts.env.clone(),
            timeout: self.opts.lifecycle_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docker::testing::FakeRunner;

    fn supervisor(variant: ComposeVariant) -> Supervisor<FakeRunner> {
        let opts = SupervisorOptions {
            variant,
            work_dir: PathBuf::from("/srv/backend"),
            ..SupervisorOptions::default()
        };
        Supervisor::with_runner(FakeRunner::new(), opts)
    }

    #[test]
    fn plugin_variant_prefixes_compose_subcommand() {
        let sup = supervisor(ComposeVariant::Plugin);
        let spec = sup.compose_command(&["up", "-d"]);
        assert_eq!(spec.program, "docker");
        assert_eq!(spec.args, vec!["compose", "up", "-d"]);
        assert_eq!(spec.work_dir, Some(PathBuf::from("/srv/backend")));
        assert_eq!(spec.timeout, sup.options().lifecycle_timeout);
    }

    #[test]
    fn standalone_variant_uses_legacy_binary() {
        let sup = supervisor(ComposeVariant::Standalone);
        let spec = sup.compose_command(&["down"]);
        assert_eq!(spec.program, "docker-compose");
        assert_eq!(spec.args, vec!["down"]);
    }

    #[test]
    fn compose_file_goes_before_subcommand() {
        let mut sup = supervisor(ComposeVariant::Plugin);
        sup.opts.compose_file = Some(PathBuf::from("docker-compose.prod.yml"));
        let spec = sup.compose_command(&["pull"]);
        assert_eq!(
            spec.args,
            vec!["compose", "-f", "docker-compose.prod.yml", "pull"]
        );
    }

    #[test]
    fn env_overrides_are_passed_through() {
        let mut sup = supervisor(ComposeVariant::Plugin);
        sup.opts.env.insert("DOCKER_HOST".into(), "unix:///tmp/d.sock".into());
        let query = sup.docker_query(&["info"]);
        let compose = sup.compose_command(&["up", "-d"]);
        assert_eq!(query.env.get("DOCKER_HOST").map(String::as_str), Some("unix:///tmp/d.sock"));
        assert_eq!(compose.env, query.env);
        assert_eq!(query.timeout, sup.options().query_timeout);
    }
}
