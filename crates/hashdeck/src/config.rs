use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::loader::DEFAULT_TIMEOUT;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "hashdeck";

pub const KEYS: &[&str] = &["defaults.theme", "defaults.windowed", "loader.timeout_secs"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loader: Option<LoaderConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windowed: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Per-request timeout for remote fragments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `hashdeck config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!(error = %e, "using default configuration");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# hashdeck configuration\n{yaml}");
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn theme(&self) -> Option<&str> {
        self.defaults.as_ref().and_then(|d| d.theme.as_deref())
    }

    pub fn windowed(&self) -> bool {
        self.defaults
            .as_ref()
            .and_then(|d| d.windowed)
            .unwrap_or(false)
    }

    pub fn loader_timeout(&self) -> Duration {
        self.loader
            .as_ref()
            .and_then(|l| l.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            "defaults.windowed" => {
                let windowed = match value {
                    "true" => true,
                    "false" => false,
                    _ => anyhow::bail!("Invalid windowed: {value}. Must be 'true' or 'false'."),
                };
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .windowed = Some(windowed);
            }
            "loader.timeout_secs" => {
                let secs = match value.parse::<u64>() {
                    Ok(secs) if secs > 0 => secs,
                    _ => anyhow::bail!(
                        "Invalid timeout_secs: {value}. Must be a positive number of seconds."
                    ),
                };
                self.loader
                    .get_or_insert_with(LoaderConfig::default)
                    .timeout_secs = Some(secs);
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {}", KEYS.join(", ")),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_valid_values() {
        let mut config = Config::default();
        config.set("defaults.theme", "dark").unwrap();
        config.set("defaults.windowed", "true").unwrap();
        config.set("loader.timeout_secs", "30").unwrap();
        assert_eq!(config.theme(), Some("dark"));
        assert!(config.windowed());
        assert_eq!(config.loader_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut config = Config::default();
        assert!(config.set("defaults.theme", "sepia").is_err());
        assert!(config.set("defaults.windowed", "yes").is_err());
        assert!(config.set("loader.timeout_secs", "0").is_err());
        assert!(config.set("loader.timeout_secs", "soon").is_err());
        let err = config.set("defaults.aspect", "16:9").unwrap_err();
        assert!(err.to_string().contains("defaults.theme"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.theme(), None);
        assert!(!config.windowed());
        assert_eq!(config.loader_timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(FILENAME);
        let mut config = Config::default();
        config.set("defaults.theme", "light").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.theme(), Some("light"));
        assert!(loaded.loader.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load_from(Path::new("/nonexistent/config.yaml")).unwrap_err();
        assert!(err.to_string().contains("No config found"));
    }
}
