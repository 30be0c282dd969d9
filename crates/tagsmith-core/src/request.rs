//! Analysis requests and the caller-side parsing that builds them.
//!
//! Free-text input (a pasted path, comma-separated tag lists) is normalized
//! here, before the pipeline sees it. The pipeline compares paths byte-for-byte
//! when deciding whether the cache applies, so normalization must happen once
//! and consistently.

use std::collections::HashSet;

use crate::error::{AnalysisError, AnalysisResult};

/// What to analyze and how to shape the tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    path: String,
    additional_tags: Vec<String>,
    exclude_tags: HashSet<String>,
}

impl AnalysisRequest {
    /// Build a request. Tags are trimmed and empty entries dropped; additional
    /// tags keep their first occurrence only.
    ///
    /// Fails with `InvalidPath` when `path` is empty.
    pub fn new<A, E>(path: impl Into<String>, additional_tags: A, exclude_tags: E) -> AnalysisResult<Self>
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let path = path.into();
        if path.is_empty() {
            return Err(AnalysisError::InvalidPath(path.into()));
        }

        let mut seen = HashSet::new();
        let additional_tags = additional_tags
            .into_iter()
            .filter_map(|t| clean(t.as_ref()))
            .filter(|t| seen.insert(t.clone()))
            .collect();
        let exclude_tags = exclude_tags
            .into_iter()
            .filter_map(|t| clean(t.as_ref()))
            .collect();

        Ok(Self {
            path,
            additional_tags,
            exclude_tags,
        })
    }

    /// Build a request straight from the three free-text inputs of the
    /// front end: a pasted path and two comma-separated tag lists.
    pub fn from_input(path: &str, additional: &str, exclude: &str) -> AnalysisResult<Self> {
        Self::new(
            normalize_path_input(path),
            parse_tag_list(additional),
            parse_tag_set(exclude),
        )
    }

    /// The requested path, exactly as it is compared against the cache.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Tags forced to the front of every image's list, in order.
    pub fn additional_tags(&self) -> &[String] {
        &self.additional_tags
    }

    /// Tags removed from the model's output.
    pub fn exclude_tags(&self) -> &HashSet<String> {
        &self.exclude_tags
    }
}

fn clean(tag: &str) -> Option<String> {
    let tag = tag.trim();
    (!tag.is_empty()).then(|| tag.to_string())
}

/// Normalize a user-typed path: backslashes become `/`, double quotes are
/// stripped (paths pasted from a file manager often carry them), and
/// surrounding whitespace is trimmed.
pub fn normalize_path_input(input: &str) -> String {
    input.replace('\\', "/").replace('"', "").trim().to_string()
}

/// Split a comma-separated tag list, trimming each entry, dropping empties and
/// keeping only the first occurrence of each tag.
pub fn parse_tag_list(input: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    input
        .split(',')
        .filter_map(clean)
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Split a comma-separated tag list into a set.
pub fn parse_tag_set(input: &str) -> HashSet<String> {
    input.split(',').filter_map(clean).collect()
}
