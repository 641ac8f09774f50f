//! Positional discovery of low-light/ground-truth image pairs.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Extensions treated as dataset images, matched case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Failure while listing a dataset directory.
#[derive(Error, Debug)]
pub enum PairError {
    #[error("failed to list {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A low-light capture matched with its well-lit ground truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePair {
    pub low: PathBuf,
    pub high: PathBuf,
    /// Stem of the low file; artifact names derive from it.
    pub name: String,
}

impl ImagePair {
    /// True when both sides share a file stem.
    ///
    /// Discovery pairs by position, so a dataset with an extra or missing
    /// file on one side shifts every later pair. This check lets callers
    /// audit a discovered set before trusting the scores.
    pub fn is_stem_match(&self) -> bool {
        self.low.file_stem() == self.high.file_stem()
    }
}

/// Discovers pairs by zipping the sorted listings of both directories.
///
/// The i-th low image is paired with the i-th high image; names never
/// enter into the matching. When the directories hold different counts
/// the longer side is truncated and a warning is logged.
///
/// # Errors
/// [`PairError::ReadDir`] when either directory cannot be listed.
pub fn discover_pairs(low_dir: &Path, high_dir: &Path) -> Result<Vec<ImagePair>, PairError> {
    let low = list_images(low_dir)?;
    let high = list_images(high_dir)?;

    if low.len() != high.len() {
        warn!(
            low = low.len(),
            high = high.len(),
            "directories hold different image counts; extra files are ignored"
        );
    }

    Ok(low
        .into_iter()
        .zip(high)
        .map(|(low, high)| {
            let name = low
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or_default()
                .to_string();
            ImagePair { low, high, name }
        })
        .collect())
}

/// Lists image files in a directory, sorted by file name.
fn list_images(dir: &Path) -> Result<Vec<PathBuf>, PairError> {
    let read_error = |source| PairError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut images = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if path.is_file() && is_image(&path) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(extension))
        })
}
