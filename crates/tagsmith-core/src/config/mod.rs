//! Configuration management for Tagsmith.
//!
//! Configuration is loaded from `~/.tagsmith/config.toml` with sensible defaults.
//! Every section implements `Default`, and unknown or missing keys fall back to
//! those defaults so config files written by other versions still load.
//!
//! The analysis core never reads this file itself; the caller loads it once and
//! passes the relevant values in.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Tagsmith.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Image discovery settings
    pub discovery: DiscoveryConfig,

    /// Tagger model settings
    pub tagging: TaggingConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.tagsmith.tagsmith/config.toml
    /// - Linux: ~/.config/tagsmith/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\tagsmith\config\config.toml
    ///
    /// Falls back to ~/.tagsmith/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "tagsmith", "tagsmith")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".tagsmith").join("config.toml")
            })
    }

    /// Get the resolved model directory path (with ~ expansion).
    pub fn model_dir(&self) -> PathBuf {
        expand(&self.general.model_dir)
    }

    /// Get the resolved result cache file path (with ~ expansion).
    pub fn cache_file(&self) -> PathBuf {
        expand(&self.general.cache_file)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::tilde(&path_str);
    PathBuf::from(expanded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.discovery.extensions, vec!["jpg", "jpeg", "png"]);
        assert!(!config.output.persist_tags);
        assert!(!config.general.agreed_terms);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[tagging]"));
        assert!(toml.contains("persist_tags"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[output]\npersist_tags = true\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.output.persist_tags);
        assert_eq!(config.tagging.general_threshold, 0.35);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_rejects_invalid_values() {
        let err = Config::parse("[tagging]\ngeneral_threshold = 2.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[general]\nlegacy_flag = \"True\"\n").unwrap();

        assert!(Config::load_from(&path).is_ok());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[output\npersist_tags = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_absolute_paths_pass_through() {
        let mut config = Config::default();
        config.general.cache_file = PathBuf::from("/tmp/tagsmith/dump.json");
        assert_eq!(config.cache_file(), PathBuf::from("/tmp/tagsmith/dump.json"));
    }
}
