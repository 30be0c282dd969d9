//! Tagsmith Core - cached, filtered image tag extraction.
//!
//! Tagsmith runs an image-tagging model over a file or a directory of images
//! and merges the per-image results into one deduplicated, ordered tag list,
//! the kind of list that pastes straight into a prompt.
//!
//! # Architecture
//!
//! ```text
//! Request → Cache hit? ─yes─→ cached file list ─┐
//!              └─no─→ Discover images ──────────┤
//!                                               ↓
//!          per image: Tagger → Filter → (sidecar .txt) → accumulate
//!                                               ↓
//!                          Merge (first occurrence wins) → store cache
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use tagsmith_core::{AnalysisRequest, Analyzer, Config, LazyTagger};
//!
//! fn main() -> tagsmith_core::Result<()> {
//!     let config = Config::load()?;
//!     let analyzer = Analyzer::new(&config);
//!     let mut tagger = LazyTagger::new(config.model_dir(), config.tagging.clone());
//!
//!     let request = AnalysisRequest::from_input("./shots", "masterpiece", "watermark")?;
//!     let outcome = analyzer.analyze(&request, &mut tagger)?;
//!     println!("{}", outcome.prompt());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod cache;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod request;
pub mod tagging;
pub mod types;

// Re-exports for convenient access
pub use cache::{CacheRecord, ResultCache};
pub use config::Config;
pub use error::{AnalysisError, AnalysisResult, ConfigError, Result, TagsmithError};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{AnalysisOptions, Analyzer, CancelFlag, FileDiscovery};
pub use request::{normalize_path_input, parse_tag_list, parse_tag_set, AnalysisRequest};
pub use tagging::{LazyTagger, Tagger, WdTagger};
pub use types::{AnalysisOutcome, ImageTags, ProcessingStats, Progress};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_analyzer_from_default_config() {
        let config = Config::default();
        let analyzer = Analyzer::new(&config);
        assert!(analyzer.cache().path().ends_with("dump.json"));
    }
}
