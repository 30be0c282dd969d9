//! Result types produced by an analysis run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Final tags for one analyzed image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageTags {
    /// Image the tags belong to
    pub file: PathBuf,

    /// Additional tags followed by the filtered model tags
    pub tags: Vec<String>,
}

/// Everything an analysis run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    /// Every image's tags merged, first occurrence wins
    pub merged_tags: Vec<String>,

    /// Per-image tag lists, in processing order
    pub images: Vec<ImageTags>,

    /// The image list came from the result cache rather than a directory walk
    pub cache_hit: bool,

    /// The result cache was updated for the next run
    pub cache_written: bool,

    /// Sidecar files that could not be written
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub sidecar_failures: Vec<PathBuf>,

    /// Timing information
    pub stats: ProcessingStats,
}

impl AnalysisOutcome {
    /// The merged tags as a single prompt line.
    pub fn prompt(&self) -> String {
        self.merged_tags.join(", ")
    }
}

/// Timing for an analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Images tagged
    pub images: usize,

    /// Wall-clock time of the whole run
    pub elapsed_ms: u64,

    /// Time spent inside the tagger
    pub tagging_ms: u64,
}

impl ProcessingStats {
    /// Images tagged per second.
    pub fn rate(&self) -> f64 {
        if self.elapsed_ms == 0 {
            0.0
        } else {
            self.images as f64 / (self.elapsed_ms as f64 / 1000.0)
        }
    }
}

/// Progress notification sent after each image completes.
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// Images finished so far, including this one
    pub done: usize,

    /// Images in the run
    pub total: usize,

    /// The image that just finished
    pub file: &'a std::path::Path,
}
