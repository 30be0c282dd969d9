//! File discovery for finding images in directories.

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::config::DiscoveryConfig;
use crate::error::{AnalysisError, AnalysisResult};

/// Resolves a user-supplied path into an ordered list of image files.
#[derive(Debug, Clone, Default)]
pub struct FileDiscovery {
    config: DiscoveryConfig,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: DiscoveryConfig) -> Self {
        Self { config }
    }

    /// Enumerate the images at a path.
    ///
    /// A regular file is returned as-is, whatever its extension. A directory is
    /// walked recursively for files with a configured extension, sorted by path
    /// so an unchanged tree always enumerates the same way. Anything else is
    /// `InvalidPath`.
    pub fn enumerate(&self, path: &Path) -> AnalysisResult<Vec<PathBuf>> {
        if path.is_file() {
            return Ok(vec![path.to_path_buf()]);
        }
        if !path.is_dir() {
            return Err(AnalysisError::InvalidPath(path.to_path_buf()));
        }

        let include_hidden = self.config.include_hidden;
        let mut files: Vec<PathBuf> = WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| include_hidden || e.depth() == 0 || !is_hidden(e))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && self.is_supported(e.path()))
            .map(DirEntry::into_path)
            .collect();

        files.sort();
        tracing::debug!("Enumerated {} image(s) under {:?}", files.len(), path);
        Ok(files)
    }

    /// Check if a file has a supported extension. Case-sensitive.
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.config.extensions.iter().any(|fmt| fmt == ext))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
