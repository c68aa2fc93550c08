use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::sync::SyncMode;

pub const ENV_DATA_DIR: &str = "FUELMAP_DATA_DIR";
pub const ENV_REMOTE_URL: &str = "FUELMAP_REMOTE_URL";
pub const ENV_LOG: &str = "FUELMAP_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Backend root; each domain is fetched from `{base_url}/{domain}`
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 30,
        }
    }
}

/// Configuration for [`DataLayer`](crate::DataLayer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataLayerConfig {
    /// Directory holding table and preference files; `None` keeps everything in memory
    pub data_dir: Option<PathBuf>,
    pub remote: RemoteConfig,
    pub sync_mode: SyncMode,
    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_filter: String,
}

impl Default for DataLayerConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            remote: RemoteConfig::default(),
            sync_mode: SyncMode::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl DataLayerConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: DataLayerConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config YAML {}", path.display()))?;

        Ok(config)
    }

    /// Apply `FUELMAP_*` overrides read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = lookup(ENV_REMOTE_URL).filter(|v| !v.trim().is_empty()) {
            self.remote.base_url = Some(url);
        }
        if let Some(filter) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            self.log_filter = filter;
        }
    }

    /// File (if given) plus process environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_load_yaml_with_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("fuelmap.yaml");
        fs::write(
            &path,
            "data_dir: /var/lib/fuelmap\nremote:\n  base_url: https://api.example.org\nsync_mode: replace\n",
        )?;

        let config = DataLayerConfig::load_from_file(&path)?;
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/fuelmap")));
        assert_eq!(config.remote.base_url.as_deref(), Some("https://api.example.org"));
        assert_eq!(config.remote.timeout_secs, 30);
        assert_eq!(config.sync_mode, SyncMode::Replace);
        assert_eq!(config.log_filter, "info");
        Ok(())
    }

    #[test]
    fn test_invalid_yaml_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "sync_mode: [").unwrap();

        let err = DataLayerConfig::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_DATA_DIR, "/tmp/fuelmap"),
            (ENV_REMOTE_URL, "http://localhost:8080"),
            (ENV_LOG, ""),
        ]);
        let mut config = DataLayerConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/fuelmap")));
        assert_eq!(config.remote.base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.log_filter, "info");
    }
}
