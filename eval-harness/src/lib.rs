//! Batch evaluation of the global-equalization strategy.
//!
//! Walks a directory of low-light captures paired positionally with
//! well-lit ground truths, equalizes each capture, scores it with SSIM
//! and writes equalized images, side-by-side comparison panels and an
//! append-only metrics log under a results directory.

pub mod comparison;
pub mod metrics;
pub mod pairs;
pub mod runner;

pub use metrics::MetricsLog;
pub use pairs::{discover_pairs, ImagePair};
pub use runner::{run, RunOptions, RunSummary};
