//! Batch evaluation entry point.
//!
//! Runs the global-equalization strategy over a paired dataset and leaves
//! equalized images, comparison panels and a metrics log under the output
//! directory.

use anyhow::{Context, Result};
use clap::Parser;
use eval_harness::{run, RunOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Evaluate equalization over an image dataset")]
struct Args {
    #[arg(long, default_value = "data/low", help = "Directory of low-light captures")]
    low_dir: PathBuf,

    #[arg(long, default_value = "data/high", help = "Directory of ground-truth images")]
    high_dir: PathBuf,

    #[arg(long, default_value = "results", help = "Directory for run artifacts")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let options = RunOptions {
        low_dir: args.low_dir,
        high_dir: args.high_dir,
        out_dir: args.out_dir,
    };
    run(&options).context("Batch evaluation failed")?;
    Ok(())
}
