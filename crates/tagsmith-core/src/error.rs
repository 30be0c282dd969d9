//! Error types for the Tagsmith analysis pipeline.
//!
//! Every failure a caller can act on is a distinct variant carrying the path
//! it concerns. Cache read failures never appear here: they degrade to a miss.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Tagsmith operations.
#[derive(Error, Debug)]
pub enum TagsmithError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Analysis run errors
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors that end an analysis run.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The requested path is neither a file nor a directory
    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),

    /// Enumeration (or the cache) produced no image files
    #[error("No images found at {0}")]
    NoImagesFound(PathBuf),

    /// Tagger model assets are missing
    #[error("Model not found at {0}. Run `tagsmith models download` first.")]
    ModelNotFound(PathBuf),

    /// The tagger failed on one image; the rest of the batch is abandoned
    #[error("Tagging failed for {path}: {message}")]
    TaggingFailed { path: PathBuf, message: String },

    /// The run was cancelled between images
    #[error("Analysis cancelled after {processed}/{total} images")]
    Cancelled { processed: usize, total: usize },
}

impl AnalysisError {
    /// Build a `TaggingFailed` for `path` from any displayable cause.
    pub fn tagging(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::TaggingFailed {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Convenience type alias for Tagsmith results.
pub type Result<T> = std::result::Result<T, TagsmithError>;

/// Convenience type alias for analysis-specific results.
pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
