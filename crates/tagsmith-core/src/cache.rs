//! Single-record result cache.
//!
//! Remembers the image list (and every tag) of the last analysis so a second
//! run over the same path skips the directory walk. The cache is keyed on the
//! requested path string alone; it does not notice files added to or removed
//! from the tree.
//!
//! On disk it is a JSON object:
//!
//! ```json
//! { "path_input": "shots", "image_files": ["shots/a.jpg"], "all_tags_list": ["cat"] }
//! ```

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

/// The persisted result of the last analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// The request path the record was produced for
    pub path_input: String,

    /// Enumerated image files, in processing order
    pub image_files: Vec<PathBuf>,

    /// Every image's final tags concatenated, duplicates kept
    pub all_tags_list: Vec<String>,
}

/// Reads and writes the result cache file.
#[derive(Debug, Clone)]
pub struct ResultCache {
    path: PathBuf,
}

impl ResultCache {
    /// Create a cache backed by the given file. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored record, if there is a readable one.
    ///
    /// Missing files, I/O errors and malformed JSON all yield `None`.
    pub fn load(&self) -> Option<CacheRecord> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    tracing::debug!("Cache {:?} unreadable: {}", self.path, e);
                }
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!("Cache {:?} malformed, ignoring: {}", self.path, e);
                None
            }
        }
    }

    /// Return the cached image list when the record was stored for exactly
    /// `requested_path`. Any other situation is a miss.
    pub fn try_reuse(&self, requested_path: &str) -> Option<Vec<PathBuf>> {
        let record = self.load()?;
        if record.path_input == requested_path {
            tracing::debug!(
                "Cache hit for {:?} ({} files)",
                requested_path,
                record.image_files.len()
            );
            Some(record.image_files)
        } else {
            tracing::debug!(
                "Cache miss: stored for {:?}, requested {:?}",
                record.path_input,
                requested_path
            );
            None
        }
    }

    /// Overwrite the cache with a new record.
    ///
    /// The record is written to a sibling temp file and renamed into place, so
    /// a crash mid-write leaves the previous cache intact.
    pub fn store(
        &self,
        path_input: &str,
        image_files: &[PathBuf],
        all_tags_list: &[String],
    ) -> io::Result<()> {
        #[derive(Serialize)]
        struct RecordRef<'a> {
            path_input: &'a str,
            image_files: &'a [PathBuf],
            all_tags_list: &'a [String],
        }

        let json = serde_json::to_vec(&RecordRef {
            path_input,
            image_files,
            all_tags_list,
        })
        .map_err(io::Error::other)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)
    }

    /// Delete the cache file. Returns whether there was one.
    pub fn clear(&self) -> io::Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_store_then_reuse_returns_same_files() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path().join("dump.json"));
        let images = files(&["shots/b.png", "shots/a.jpg", "shots/sub/c.jpeg"]);

        cache
            .store("shots", &images, &["cat".to_string(), "cat".to_string()])
            .unwrap();

        assert_eq!(cache.try_reuse("shots"), Some(images));
    }

    #[test]
    fn test_reuse_is_path_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path().join("dump.json"));
        cache.store("shots", &files(&["shots/a.jpg"]), &[]).unwrap();

        assert_eq!(cache.try_reuse("shots/"), None);
        assert_eq!(cache.try_reuse("other"), None);
    }

    #[test]
    fn test_missing_file_is_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path().join("absent.json"));
        assert_eq!(cache.try_reuse("shots"), None);
    }

    #[test]
    fn test_malformed_file_is_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(ResultCache::new(&path).try_reuse("shots"), None);

        std::fs::write(&path, r#"{"path_input": "shots", "image_files": 3}"#).unwrap();
        assert_eq!(ResultCache::new(&path).try_reuse("shots"), None);
    }

    #[test]
    fn test_reads_hand_written_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");
        std::fs::write(
            &path,
            r#"{"path_input": "C:/pics", "image_files": ["C:/pics/a.png"], "all_tags_list": ["cat", "cat"]}"#,
        )
        .unwrap();

        let record = ResultCache::new(&path).load().unwrap();
        assert_eq!(record.path_input, "C:/pics");
        assert_eq!(record.all_tags_list, vec!["cat", "cat"]);
    }

    #[test]
    fn test_store_overwrites_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path().join("dump.json"));
        cache.store("first", &files(&["a.jpg"]), &["x".to_string()]).unwrap();
        cache.store("second", &files(&["b.jpg"]), &["y".to_string()]).unwrap();

        let record = cache.load().unwrap();
        assert_eq!(record.path_input, "second");
        assert_eq!(record.image_files, files(&["b.jpg"]));
        assert_eq!(record.all_tags_list, vec!["y"]);
        assert_eq!(cache.try_reuse("first"), None);
    }

    #[test]
    fn test_store_creates_parent_dirs_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/state/dump.json");
        let cache = ResultCache::new(&path);
        cache.store("shots", &files(&["a.jpg"]), &[]).unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("nested/state/dump.json.tmp").exists());
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path().join("dump.json"));
        assert!(!cache.clear().unwrap());

        cache.store("shots", &files(&["a.jpg"]), &[]).unwrap();
        assert!(cache.clear().unwrap());
        assert!(cache.load().is_none());
    }
}
