//! Side-by-side comparison panels for visual inspection.

use image::{imageops, GrayImage, Luma};
use imaging::io::array2_to_gray_image;
use ndarray::Array2;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Pixels of white margin around and between panels.
pub const GUTTER: u32 = 16;

/// Failure while encoding a comparison panel.
#[derive(Error, Debug)]
pub enum ComparisonError {
    #[error("failed to write comparison {path}: {source}")]
    Write {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Writes `original | enhanced | reference` onto one white canvas.
///
/// Panels keep their native sizes and are laid out left to right,
/// top-aligned; the canvas is tall enough for the tallest panel plus the
/// gutter on both sides. The output format follows the path extension.
///
/// # Errors
/// [`ComparisonError::Write`] on encoding or filesystem failure.
pub fn write_comparison(
    original: &Array2<u8>,
    enhanced: &Array2<u8>,
    reference: &Array2<u8>,
    path: &Path,
) -> Result<(), ComparisonError> {
    let panels = [
        array2_to_gray_image(original),
        array2_to_gray_image(enhanced),
        array2_to_gray_image(reference),
    ];

    let width: u32 = panels.iter().map(GrayImage::width).sum::<u32>() + 4 * GUTTER;
    let height = panels.iter().map(GrayImage::height).max().unwrap_or(0) + 2 * GUTTER;

    let mut canvas = GrayImage::from_pixel(width, height, Luma([255]));
    let mut x = GUTTER;
    for panel in &panels {
        imageops::overlay(&mut canvas, panel, i64::from(x), i64::from(GUTTER));
        x += panel.width() + GUTTER;
    }

    canvas.save(path).map_err(|source| ComparisonError::Write {
        path: path.to_path_buf(),
        source,
    })
}
