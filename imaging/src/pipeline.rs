//! The enhancement pipeline: channel normalization, adaptive contrast,
//! gamma, denoising and sharpening, always in that order.
//!
//! Stages never reorder and never silently vanish; each one degrades to a
//! no-op through its own parameter (`ContrastMode::None`, `gamma == 1.0`,
//! `denoise_strength == 0.0`, `sharpen == false`). Failures are typed; the
//! only place they collapse into the legacy blank-preview raster is
//! [`enhance_or_blank`].

use crate::color::{rgb_to_yuv, yuv_to_rgb};
use crate::denoise::denoise_nlm;
use crate::equalize::equalize_adaptive;
use crate::gamma::adjust_gamma;
use crate::raster::{blank_preview, to_rgb, ConversionError, Raster};
use crate::sharpen::sharpen;
use ndarray::{Array3, Axis};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Which channels adaptive contrast runs on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ContrastMode {
    /// Skip adaptive contrast entirely.
    #[default]
    None,
    /// Equalize each RGB channel independently. Strongest, but can shift
    /// hues because the channels move apart.
    PerChannel,
    /// Equalize luma only through a YUV round trip, preserving chroma.
    LuminanceOnly,
}

/// Tunable parameters for [`enhance`].
///
/// The defaults mirror the interactive front end's initial control
/// positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    pub contrast_mode: ContrastMode,
    /// CLAHE clip limit, relative to a flat tile histogram.
    pub clip_limit: f64,
    /// CLAHE tile grid: the image is split into `tile_grid` tiles per side.
    pub tile_grid: usize,
    /// Power-law exponent; 1.0 leaves tone untouched.
    pub gamma: f64,
    /// Non-local means strength; 0 disables denoising.
    pub denoise_strength: f64,
    /// Apply the fixed 3x3 sharpening kernel as the final stage.
    pub sharpen: bool,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            contrast_mode: ContrastMode::None,
            clip_limit: 2.0,
            tile_grid: 8,
            gamma: 1.0,
            denoise_strength: 10.0,
            sharpen: true,
        }
    }
}

/// A rejected [`EnhanceConfig`] field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("clip_limit must be positive, got {0}")]
    ClipLimit(f64),
    #[error("tile_grid must be at least 2, got {0}")]
    TileGrid(usize),
    #[error("gamma must be positive, got {0}")]
    Gamma(f64),
    #[error("denoise_strength must not be negative, got {0}")]
    DenoiseStrength(f64),
}

impl EnhanceConfig {
    /// Checks every field against its allowed range, reporting the first
    /// offender.
    ///
    /// # Errors
    /// The corresponding [`ConfigError`] variant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clip_limit <= 0.0 || self.clip_limit.is_nan() {
            return Err(ConfigError::ClipLimit(self.clip_limit));
        }
        if self.tile_grid < 2 {
            return Err(ConfigError::TileGrid(self.tile_grid));
        }
        if self.gamma <= 0.0 || self.gamma.is_nan() {
            return Err(ConfigError::Gamma(self.gamma));
        }
        if self.denoise_strength < 0.0 || self.denoise_strength.is_nan() {
            return Err(ConfigError::DenoiseStrength(self.denoise_strength));
        }
        Ok(())
    }
}

/// Why enhancement could not run.
#[derive(Error, Debug)]
pub enum EnhanceError {
    /// The input raster could not be normalized to 3-channel RGB.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    /// A parameter was outside its allowed range.
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
}

/// Runs the full enhancement pipeline on one raster.
///
/// # Errors
/// [`EnhanceError::Config`] when `config` fails validation,
/// [`EnhanceError::Conversion`] when the raster cannot be canonicalized.
/// Later stages are total on canonical input.
pub fn enhance(raster: &Raster, config: &EnhanceConfig) -> Result<Array3<u8>, EnhanceError> {
    config.validate()?;
    let mut working = to_rgb(raster)?;

    working = match config.contrast_mode {
        ContrastMode::None => working,
        ContrastMode::PerChannel => {
            equalize_channels(&working, config.clip_limit, config.tile_grid)
        }
        ContrastMode::LuminanceOnly => equalize_luma(&working, config.clip_limit, config.tile_grid),
    };
    working = adjust_gamma(&working, config.gamma);
    working = denoise_nlm(&working, config.denoise_strength);
    if config.sharpen {
        working = sharpen(&working);
    }
    Ok(working)
}

/// Total-function variant for front ends that always render something.
///
/// Absent input and every [`EnhanceError`] collapse to the fixed-size
/// black raster from [`blank_preview`]. This is the single place errors
/// are downgraded, and they are logged on the way through.
pub fn enhance_or_blank(raster: Option<&Raster>, config: &EnhanceConfig) -> Array3<u8> {
    let Some(raster) = raster else {
        warn!("no input raster; rendering blank preview");
        return blank_preview();
    };
    match enhance(raster, config) {
        Ok(enhanced) => enhanced,
        Err(err) => {
            warn!(error = %err, "enhancement failed; rendering blank preview");
            blank_preview()
        }
    }
}

fn equalize_channels(rgb: &Array3<u8>, clip_limit: f64, tile_grid: usize) -> Array3<u8> {
    let (height, width, _) = rgb.dim();
    let mut output = Array3::zeros((height, width, 3));
    for c in 0..3 {
        let plane = rgb.index_axis(Axis(2), c).to_owned();
        let equalized = equalize_adaptive(&plane, clip_limit, tile_grid);
        output.index_axis_mut(Axis(2), c).assign(&equalized);
    }
    output
}

fn equalize_luma(rgb: &Array3<u8>, clip_limit: f64, tile_grid: usize) -> Array3<u8> {
    let mut yuv = rgb_to_yuv(rgb);
    let luma = yuv.index_axis(Axis(2), 0).to_owned();
    let equalized = equalize_adaptive(&luma, clip_limit, tile_grid);
    yuv.index_axis_mut(Axis(2), 0).assign(&equalized);
    yuv_to_rgb(&yuv)
}
