use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which form of the compose tool to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComposeVariant {
    /// `docker compose …`
    Plugin,
    /// Legacy `docker-compose …` binary.
    Standalone,
}

impl ComposeVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComposeVariant::Plugin => "plugin",
            ComposeVariant::Standalone => "standalone",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub container_name: String,
    pub work_dir: PathBuf,
    pub compose_file: Option<PathBuf>,
    pub compose_variant: ComposeVariant,
    pub query_timeout_secs: u64,
    pub lifecycle_timeout_secs: u64,
    pub daemon_wait_secs: u64,
    pub poll_interval_ms: u64,
    pub env: BTreeMap<String, String>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            container_name: "mcp-container".to_string(),
            work_dir: PathBuf::from("."),
            compose_file: None,
            compose_variant: ComposeVariant::Plugin,
            query_timeout_secs: 10,
            lifecycle_timeout_secs: 300,
            daemon_wait_secs: 60,
            poll_interval_ms: 2000,
            env: BTreeMap::new(),
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg: Config = serde_yaml::from_str("container_name: invoices-api\n").unwrap();
        assert_eq!(cfg.container_name, "invoices-api");
        assert_eq!(cfg.compose_variant, ComposeVariant::Plugin);
        assert_eq!(cfg.query_timeout_secs, 10);
        assert_eq!(cfg.lifecycle_timeout_secs, 300);
    }

    #[test]
    fn full_yaml_round_trips_fields() {
        let yaml = r#"
container_name: backend
work_dir: /opt/backend
compose_file: compose.prod.yml
compose_variant: standalone
query_timeout_secs: 5
lifecycle_timeout_secs: 120
daemon_wait_secs: 30
poll_interval_ms: 500
env:
  COMPOSE_PROJECT_NAME: invoices
log_level: debug
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.work_dir, PathBuf::from("/opt/backend"));
        assert_eq!(cfg.compose_file, Some(PathBuf::from("compose.prod.yml")));
        assert_eq!(cfg.compose_variant, ComposeVariant::Standalone);
        assert_eq!(cfg.poll_interval_ms, 500);
        assert_eq!(
            cfg.env.get("COMPOSE_PROJECT_NAME").map(String::as_str),
            Some("invoices")
        );
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn unknown_variant_is_rejected() {
        let err = serde_yaml::from_str::<Config>("compose_variant: podman\n");
        assert!(err.is_err());
    }

    #[test]
    fn variant_names_match_the_yaml_spelling() {
        for variant in [ComposeVariant::Plugin, ComposeVariant::Standalone] {
            let yaml = serde_yaml::to_string(&variant).unwrap();
            assert_eq!(yaml.trim(), variant.as_str());
        }
    }
}
