//! Command-line front end for the enhancement pipeline.
//!
//! Enhances one image with the same parameter set the interactive UI
//! exposes, optionally loading a JSON preset and scoring the result
//! against a same-stem ground-truth image.

use anyhow::{Context, Result};
use clap::Parser;
use imaging::io::{load_raster, save_rgb};
use imaging::pipeline::{enhance, ContrastMode, EnhanceConfig};
use imaging::raster::Raster;
use imaging::ssim::evaluate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Enhance a low-light image")]
struct Args {
    #[arg(short, long, help = "Image to enhance")]
    input: PathBuf,

    #[arg(short, long, help = "Where to write the enhanced image")]
    output: PathBuf,

    #[arg(
        long,
        help = "JSON preset holding an EnhanceConfig; explicit flags override its fields"
    )]
    preset: Option<PathBuf>,

    #[arg(long, value_enum, help = "Adaptive contrast mode")]
    contrast: Option<ContrastMode>,

    #[arg(long, help = "CLAHE clip limit")]
    clip_limit: Option<f64>,

    #[arg(long, help = "CLAHE tile grid (tiles per side)")]
    tile_grid: Option<usize>,

    #[arg(long, help = "Gamma exponent (1.0 leaves tone untouched)")]
    gamma: Option<f64>,

    #[arg(long, help = "Non-local means strength (0 disables denoising)")]
    denoise: Option<f64>,

    #[arg(long, help = "Skip the final sharpening stage")]
    no_sharpen: bool,

    #[arg(
        long,
        help = "Directory holding ground-truth images named by the input's stem"
    )]
    reference_dir: Option<PathBuf>,
}

fn build_config(args: &Args) -> Result<EnhanceConfig> {
    let mut config = match &args.preset {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read preset: {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse preset: {}", path.display()))?
        }
        None => EnhanceConfig::default(),
    };
    if let Some(contrast) = args.contrast {
        config.contrast_mode = contrast;
    }
    if let Some(clip_limit) = args.clip_limit {
        config.clip_limit = clip_limit;
    }
    if let Some(tile_grid) = args.tile_grid {
        config.tile_grid = tile_grid;
    }
    if let Some(gamma) = args.gamma {
        config.gamma = gamma;
    }
    if let Some(denoise) = args.denoise {
        config.denoise_strength = denoise;
    }
    if args.no_sharpen {
        config.sharpen = false;
    }
    Ok(config)
}

fn find_reference(dir: &Path, input: &Path) -> Option<PathBuf> {
    let stem = input.file_stem()?.to_str()?;
    ["png", "jpg", "jpeg"]
        .iter()
        .map(|extension| dir.join(format!("{stem}.{extension}")))
        .find(|path| path.exists())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = build_config(&args)?;

    let raster = load_raster(&args.input)
        .with_context(|| format!("Failed to load input: {}", args.input.display()))?;
    info!(
        "Enhancing {} ({}x{})",
        args.input.display(),
        raster.width(),
        raster.height()
    );

    let enhanced = enhance(&raster, &config)?;

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {parent:?}"))?;
        }
    }
    save_rgb(&enhanced, &args.output)
        .with_context(|| format!("Failed to write output: {}", args.output.display()))?;
    info!("Wrote enhanced image to {}", args.output.display());

    if let Some(reference_dir) = &args.reference_dir {
        match find_reference(reference_dir, &args.input) {
            Some(path) => {
                let reference = load_raster(&path)
                    .with_context(|| format!("Failed to load reference: {}", path.display()))?;
                let score = evaluate(&Raster::Multi(enhanced), &reference)?;
                println!("SSIM Similarity: {score:.4}");
            }
            None => {
                println!(
                    "No reference image for {} under {}",
                    args.input.display(),
                    reference_dir.display()
                );
            }
        }
    }

    Ok(())
}
