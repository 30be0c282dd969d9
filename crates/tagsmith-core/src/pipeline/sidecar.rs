//! Sidecar tag files written next to analyzed images.

use std::io;
use std::path::{Path, PathBuf};

use super::filter::TAG_DELIMITER;

/// The sidecar for `dir/photo.jpg` is `dir/photo.txt`.
pub fn sidecar_path(image: &Path) -> PathBuf {
    image.with_extension("txt")
}

/// Write an image's tags to its sidecar, replacing any existing file.
pub fn write_sidecar(image: &Path, tags: &[String]) -> io::Result<PathBuf> {
    let path = sidecar_path(image);
    std::fs::write(&path, tags.join(TAG_DELIMITER))?;
    Ok(path)
}
