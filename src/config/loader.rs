use std::path::Path;

use anyhow::{Context, Result};

use super::types::Config;

pub const CONFIG_FILE: &str = ".dockside.yaml";

/// Load `.dockside.yaml` from `dir`, falling back to defaults when absent.
///
/// A relative `work_dir` in the file is resolved against `dir`.
pub fn load(dir: &Path) -> Result<Config> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config {
            work_dir: dir.to_path_buf(),
            ..Config::default()
        });
    }
    let mut cfg = load_file(&path)?;
    if cfg.work_dir.is_relative() {
        cfg.work_dir = dir.join(&cfg.work_dir);
    }
    Ok(cfg)
}

/// Load an explicit config file. Paths are taken as written.
pub fn load_file(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let cfg: Config = serde_yaml::from_str(&contents)
        .with_context(|| format!("invalid config in {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults_rooted_at_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load(dir.path()).unwrap();
        assert_eq!(cfg.container_name, Config::default().container_name);
        assert_eq!(cfg.work_dir, dir.path());
    }

    #[test]
    fn relative_work_dir_is_resolved() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "container_name: api\nwork_dir: backend\n",
        )
        .unwrap();
        let cfg = load(dir.path()).unwrap();
        assert_eq!(cfg.container_name, "api");
        assert_eq!(cfg.work_dir, dir.path().join("backend"));
    }

    #[test]
    fn malformed_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "query_timeout_secs: [nope\n").unwrap();
        let err = load(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains(CONFIG_FILE));
    }
}
