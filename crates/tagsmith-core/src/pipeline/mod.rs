//! Analysis pipeline components.
//!
//! - **discovery**: Find image files under a path
//! - **filter**: Apply include/exclude rules and merge tag lists
//! - **sidecar**: Write per-image tag files
//! - **analyzer**: Orchestrates a full run, including the result cache

pub mod analyzer;
pub mod discovery;
pub mod filter;
pub mod sidecar;

// Re-exports for convenient access
pub use analyzer::{AnalysisOptions, Analyzer, CancelFlag};
pub use discovery::FileDiscovery;
pub use filter::{dedup_first_occurrence, filter_tags, split_raw_tags, TAG_DELIMITER};
pub use sidecar::{sidecar_path, write_sidecar};
