//! Sequential batch evaluation over a paired dataset.

use crate::comparison::{self, ComparisonError};
use crate::metrics::{MetricsError, MetricsLog};
use crate::pairs::{self, ImagePair, PairError};
use imaging::equalize::equalize_global;
use imaging::io::{load_gray, save_gray, ImageIoError};
use imaging::ssim::structural_similarity;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Dataset and output locations for one batch run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub low_dir: PathBuf,
    pub high_dir: PathBuf,
    pub out_dir: PathBuf,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            low_dir: PathBuf::from("data/low"),
            high_dir: PathBuf::from("data/high"),
            out_dir: PathBuf::from("results"),
        }
    }
}

/// Counts reported after a batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub discovered: usize,
    pub processed: usize,
    pub skipped: usize,
}

/// Hard failure of a batch run.
///
/// Per-pair decode and scoring problems are logged and skipped instead;
/// only discovery, directory bootstrap and artifact writes surface here.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Pairs(#[from] PairError),
    #[error("failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Image(#[from] ImageIoError),
    #[error(transparent)]
    Comparison(#[from] ComparisonError),
    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

struct OutputLayout {
    equalized: PathBuf,
    plots: PathBuf,
    metrics: PathBuf,
}

impl OutputLayout {
    fn create(out_dir: &Path) -> Result<Self, RunError> {
        let layout = Self {
            equalized: out_dir.join("equalized"),
            plots: out_dir.join("plots"),
            metrics: out_dir.join("metrics"),
        };
        for dir in [&layout.equalized, &layout.plots, &layout.metrics] {
            fs::create_dir_all(dir).map_err(|source| RunError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(layout)
    }

    fn metrics_csv(&self) -> PathBuf {
        self.metrics.join("metrics.csv")
    }
}

/// Equalizes and scores every discovered pair, strictly in order.
///
/// Per pair: load both sides as grayscale, globally equalize the low
/// image, score it against the truth with SSIM, then write the equalized
/// image, a comparison panel and a metrics row. Pairs that fail to decode
/// or score are skipped with a warning; the rest of the batch continues.
///
/// # Errors
/// [`RunError`] when discovery, output bootstrap or an artifact write
/// fails.
pub fn run(options: &RunOptions) -> Result<RunSummary, RunError> {
    let pairs = pairs::discover_pairs(&options.low_dir, &options.high_dir)?;
    info!("found {} image pairs", pairs.len());

    let layout = OutputLayout::create(&options.out_dir)?;
    let log = MetricsLog::new(&layout.metrics_csv());

    let mut summary = RunSummary {
        discovered: pairs.len(),
        ..Default::default()
    };
    for pair in &pairs {
        match process_pair(pair, &layout, &log)? {
            Some(score) => {
                summary.processed += 1;
                info!("processed {}: SSIM = {score:.4}", pair.name);
            }
            None => summary.skipped += 1,
        }
    }

    info!(
        "batch complete: {} processed, {} skipped",
        summary.processed, summary.skipped
    );
    Ok(summary)
}

fn process_pair(
    pair: &ImagePair,
    layout: &OutputLayout,
    log: &MetricsLog,
) -> Result<Option<f64>, RunError> {
    let low = match load_gray(&pair.low) {
        Ok(image) => image,
        Err(err) => {
            warn!("skipping {}: {err}", pair.name);
            return Ok(None);
        }
    };
    let high = match load_gray(&pair.high) {
        Ok(image) => image,
        Err(err) => {
            warn!("skipping {}: {err}", pair.name);
            return Ok(None);
        }
    };

    let equalized = equalize_global(&low);
    let score = match structural_similarity(&equalized, &high, 255.0) {
        Ok(score) => score,
        Err(err) => {
            warn!("skipping {}: {err}", pair.name);
            return Ok(None);
        }
    };

    let equalized_path = layout.equalized.join(format!("{}_equalized.png", pair.name));
    save_gray(&equalized, &equalized_path)?;

    let comparison_path = layout.plots.join(format!("{}_comparison.png", pair.name));
    comparison::write_comparison(&low, &equalized, &high, &comparison_path)?;

    log.append(&pair.name, score)?;
    Ok(Some(score))
}
