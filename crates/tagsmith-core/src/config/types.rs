//! Sub-configuration structs with their documented defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory where tagger models are stored
    pub model_dir: PathBuf,

    /// Where the result cache (last analysis) is persisted
    pub cache_file: PathBuf,

    /// Whether the user has acknowledged the terms of use
    pub agreed_terms: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("~/.tagsmith/models"),
            cache_file: PathBuf::from("~/.tagsmith/dump.json"),
            agreed_terms: false,
        }
    }
}

/// Image discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// File extensions treated as images, without the leading dot.
    /// Matching is case-sensitive.
    pub extensions: Vec<String>,

    /// Descend into dot-directories and pick up dot-files
    pub include_hidden: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            include_hidden: false,
        }
    }
}

/// Tagger model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggingConfig {
    /// Model name; its files live under `{model_dir}/{model}/`
    pub model: String,

    /// Square input size the model was trained at
    pub image_size: u32,

    /// Minimum probability for general tags
    pub general_threshold: f32,

    /// Minimum probability for character tags
    pub character_threshold: f32,

    /// Emit "long hair" instead of "long_hair"
    pub replace_underscores: bool,

    /// Escape `(` and `)` so tags paste cleanly into prompt syntax
    pub escape_parentheses: bool,

    /// Prepend the most likely rating tag
    pub include_rating: bool,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            model: "wd-v1-4-moat-tagger-v2".to_string(),
            image_size: 448,
            general_threshold: 0.35,
            character_threshold: 0.85,
            replace_underscores: true,
            escape_parentheses: false,
            include_rating: false,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Write `<image-stem>.txt` next to each analyzed image
    pub persist_tags: bool,

    /// Default output format: "text" or "json"
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            persist_tags: false,
            format: "text".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
