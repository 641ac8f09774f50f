//! Append-only CSV log of per-image SSIM scores.

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Column header written once, when the log file is first created.
pub const HEADER: &str = "timestamp,image_name,ssim";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Failure while appending to the metrics log.
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("failed to append to metrics log {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// CSV score log that survives across runs.
///
/// Every append reopens the file in append mode, so successive batch runs
/// accumulate rows rather than overwriting each other. N runs over M pairs
/// leave `1 + N*M` lines.
#[derive(Debug, Clone)]
pub struct MetricsLog {
    path: PathBuf,
}

impl MetricsLog {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one `timestamp,image_name,ssim` row, writing the header
    /// first if the file is empty.
    ///
    /// # Errors
    /// [`MetricsError::Write`] when the file cannot be opened or written;
    /// the parent directory must already exist.
    pub fn append(&self, image_name: &str, ssim: f64) -> Result<(), MetricsError> {
        let write_error = |source| MetricsError::Write {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_error)?;

        if file.metadata().map_err(write_error)?.len() == 0 {
            writeln!(file, "{HEADER}").map_err(write_error)?;
        }

        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        writeln!(file, "{timestamp},{image_name},{ssim:.6}").map_err(write_error)?;
        Ok(())
    }
}
