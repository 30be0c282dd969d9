//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];
const LOG_FORMATS: &[&str] = &["pretty", "json"];
const OUTPUT_FORMATS: &[&str] = &["text", "json"];

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let thresholds = [
            ("tagging.general_threshold", self.tagging.general_threshold),
            ("tagging.character_threshold", self.tagging.character_threshold),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be between 0.0 and 1.0"
                )));
            }
        }

        if self.tagging.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "tagging.model must not be empty".into(),
            ));
        }
        if self.tagging.image_size == 0 {
            return Err(ConfigError::ValidationError(
                "tagging.image_size must be > 0".into(),
            ));
        }
        if self.discovery.extensions.is_empty() {
            return Err(ConfigError::ValidationError(
                "discovery.extensions must list at least one extension".into(),
            ));
        }
        if let Some(ext) = self
            .discovery
            .extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.contains('.'))
        {
            return Err(ConfigError::ValidationError(format!(
                "discovery.extensions entry {ext:?} must be a bare extension like \"jpg\""
            )));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }
        if !OUTPUT_FORMATS.contains(&self.output.format.as_str()) {
            return Err(ConfigError::ValidationError(
                "output.format must be \"text\" or \"json\"".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_threshold() {
        let mut config = Config::default();
        config.tagging.general_threshold = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("general_threshold"));

        let mut config = Config::default();
        config.tagging.character_threshold = -0.1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("character_threshold"));
    }

    #[test]
    fn test_validate_rejects_zero_image_size() {
        let mut config = Config::default();
        config.tagging.image_size = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("image_size"));
    }

    #[test]
    fn test_validate_rejects_empty_extensions() {
        let mut config = Config::default();
        config.discovery.extensions.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("discovery.extensions"));
    }

    #[test]
    fn test_validate_rejects_dotted_extension() {
        let mut config = Config::default();
        config.discovery.extensions = vec![".png".to_string()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains(".png"));
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_validate_rejects_unknown_output_format() {
        let mut config = Config::default();
        config.output.format = "yaml".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("output.format"));
    }
}
