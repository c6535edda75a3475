//! Runtime configuration.
//!
//! Layered: compiled defaults, then an optional JSON file, then `ORDOS_*`
//! environment variables. Every field has a default; an empty file and no
//! environment yields a runnable configuration.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::ApiConfig;
use crate::model::ROOT_ACT;
use crate::queue::QueueLayout;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Library root holding the order queue, ledger and markers.
    #[serde(default = "default_lib_dir")]
    pub lib_dir: PathBuf,

    #[serde(default = "default_runner_interval_secs")]
    pub runner_interval_secs: u64,

    #[serde(default = "default_processor_interval_secs")]
    pub processor_interval_secs: u64,

    /// Executors stay side-effect free when set. On by default.
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,

    #[serde(default = "default_acte_parent")]
    pub acte_parent: String,

    #[serde(default)]
    pub api: ApiConfig,
}

fn default_lib_dir() -> PathBuf {
    PathBuf::from("/var/lib/ordos")
}

fn default_runner_interval_secs() -> u64 {
    5
}

fn default_processor_interval_secs() -> u64 {
    1
}

fn default_dry_run() -> bool {
    true
}

fn default_acte_parent() -> String {
    ROOT_ACT.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lib_dir: default_lib_dir(),
            runner_interval_secs: default_runner_interval_secs(),
            processor_interval_secs: default_processor_interval_secs(),
            dry_run: default_dry_run(),
            acte_parent: default_acte_parent(),
            api: ApiConfig::default(),
        }
    }
}

impl Config {
    /// Load from an optional file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let content = fs::read_to_string(path)?;
                serde_json::from_str(&content)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `ORDOS_*` overrides from the given lookup.
    fn apply_overrides(
        &mut self,
        get: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = get("ORDOS_LIB_DIR") {
            self.lib_dir = PathBuf::from(value);
        }
        if let Some(value) = get("ORDOS_RUNNER_INTERVAL_SECS") {
            self.runner_interval_secs = parse_env("ORDOS_RUNNER_INTERVAL_SECS", &value)?;
        }
        if let Some(value) = get("ORDOS_PROCESSOR_INTERVAL_SECS") {
            self.processor_interval_secs = parse_env("ORDOS_PROCESSOR_INTERVAL_SECS", &value)?;
        }
        if let Some(value) = get("ORDOS_DRY_RUN") {
            self.dry_run = match value.as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        key: "ORDOS_DRY_RUN",
                        value,
                    })
                }
            };
        }
        if let Some(value) = get("ORDOS_HTTP_HOST") {
            self.api.host = value;
        }
        if let Some(value) = get("ORDOS_HTTP_PORT") {
            self.api.port = parse_env("ORDOS_HTTP_PORT", &value)?;
        }
        if let Some(value) = get("ORDOS_ACTE_PARENT") {
            self.acte_parent = value;
        }
        Ok(())
    }

    pub fn runner_interval(&self) -> Duration {
        Duration::from_secs(self.runner_interval_secs)
    }

    pub fn processor_interval(&self) -> Duration {
        Duration::from_secs(self.processor_interval_secs)
    }

    pub fn layout(&self) -> QueueLayout {
        QueueLayout::new(&self.lib_dir)
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidEnv {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.lib_dir, PathBuf::from("/var/lib/ordos"));
        assert!(config.dry_run);
        assert_eq!(config.acte_parent, "ACTE_IV");
        assert_eq!(config.runner_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ordos.json");
        fs::write(&path, r#"{"lib_dir": "/tmp/ordos-test"}"#).unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.lib_dir, PathBuf::from("/tmp/ordos-test"));
        assert_eq!(config.processor_interval_secs, 1);
    }

    #[test]
    fn test_environment_overrides() {
        let vars: HashMap<&str, &str> = [
            ("ORDOS_LIB_DIR", "/tmp/elsewhere"),
            ("ORDOS_DRY_RUN", "false"),
            ("ORDOS_HTTP_PORT", "9100"),
            ("ORDOS_RUNNER_INTERVAL_SECS", "30"),
        ]
        .into();
        let mut config = Config::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.lib_dir, PathBuf::from("/tmp/elsewhere"));
        assert!(!config.dry_run);
        assert_eq!(config.api.port, 9100);
        assert_eq!(config.runner_interval_secs, 30);
    }

    #[test]
    fn test_invalid_env_value_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_overrides(|key| {
            (key == "ORDOS_HTTP_PORT").then(|| "not-a-port".to_string())
        });
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnv {
                key: "ORDOS_HTTP_PORT",
                ..
            })
        ));
    }
}
