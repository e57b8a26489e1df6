use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::mirror::DEFAULT_PREVIEW_CAPACITY;

/// Environment variable that points at an alternate config file
pub const CONFIG_ENV: &str = "TILEGRID_CONFIG";

/// Centralized configuration for tilegrid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileConfig {
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Number of leading items mirrored into each group's preview
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    DEFAULT_PREVIEW_CAPACITY
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_PREVIEW_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Default catalog file (`.toml` or `.json`); `${HOME}` style variables expand
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    pub level: String,
}

impl TileConfig {
    /// Load config from ~/.tilegrid/config.toml (or `$TILEGRID_CONFIG`)
    ///
    /// Fails hard with actionable error if config doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            anyhow::bail!(
                "Config not found at {:?}\n\nRun: tilegrid config init",
                config_path
            );
        }

        Self::load_from(&config_path)
    }

    /// Load config if present, otherwise fall back to defaults
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;

        let mut config: Self =
            toml::from_str(&content).context("Failed to parse config file (invalid TOML)")?;

        config.expand_variables();
        config.validate()?;

        Ok(config)
    }

    /// Get config file path: $TILEGRID_CONFIG or ~/.tilegrid/config.toml
    pub fn config_path() -> PathBuf {
        if let Ok(path) = env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tilegrid/config.toml")
    }

    /// Reject values the preview cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.preview.capacity == 0 {
            anyhow::bail!("preview.capacity must be at least 1");
        }
        Ok(())
    }

    /// Expand ${var} references in paths
    fn expand_variables(&mut self) {
        let mut vars = HashMap::new();
        vars.insert("HOME".to_string(), env::var("HOME").unwrap_or_default());
        vars.insert(
            "TILEGRID_HOME".to_string(),
            env::var("TILEGRID_HOME").unwrap_or_default(),
        );

        if let Some(ref path) = self.catalog.path {
            self.catalog.path = Some(Self::expand_path(path, &vars));
        }
    }

    fn expand_path(path: &Path, vars: &HashMap<String, String>) -> PathBuf {
        PathBuf::from(Self::expand_string(&path.display().to_string(), vars))
    }

    /// Expand ${var} references in a string
    fn expand_string(s: &str, vars: &HashMap<String, String>) -> String {
        let mut result = s.to_string();

        for (key, value) in vars {
            let pattern = format!("${{{}}}", key);
            result = result.replace(&pattern, value);
        }

        result
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(config_path, toml_str)
            .context(format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config: TileConfig = toml::from_str("").unwrap();
        assert_eq!(config.preview.capacity, DEFAULT_PREVIEW_CAPACITY);
        assert!(config.catalog.path.is_none());
        assert!(config.logging.is_none());
    }

    #[test]
    fn test_expand_string() {
        let mut vars = HashMap::new();
        vars.insert("HOME".to_string(), "/home/tiles".to_string());
        assert_eq!(
            TileConfig::expand_string("${HOME}/catalog.toml", &vars),
            "/home/tiles/catalog.toml"
        );
    }

    #[test]
    fn test_zero_capacity_invalid() {
        let config = TileConfig {
            preview: PreviewConfig { capacity: 0 },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = TileConfig {
            preview: PreviewConfig { capacity: 6 },
            catalog: CatalogConfig {
                path: Some(PathBuf::from("/srv/tiles/catalog.json")),
            },
            logging: Some(LoggingConfig {
                level: "debug".to_string(),
            }),
        };
        config.save_to(&path).unwrap();

        let loaded = TileConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_zero_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[preview]\ncapacity = 0\n").unwrap();

        let err = TileConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("capacity"));
    }
}
