//! Structural similarity (SSIM) scoring.
//!
//! Mean SSIM over 7x7 uniformly-weighted windows with the standard
//! stabilizers (K1 = 0.01, K2 = 0.03) and sample-normalized covariances.
//! Only windows that fit entirely inside the image contribute, which is
//! equivalent to filtering everywhere and cropping `(window - 1) / 2`
//! pixels from each border before averaging. Identical inputs score
//! exactly 1.0.

use crate::io::{array2_to_gray_image, gray_image_to_array2};
use crate::raster::{luminance, ConversionError, Raster};
use image::imageops::{self, FilterType};
use ndarray::Array2;
use thiserror::Error;

/// Side length of the square comparison window.
pub const WINDOW: usize = 7;
const K1: f64 = 0.01;
const K2: f64 = 0.03;

/// Why a similarity score could not be produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SsimError {
    /// The two rasters disagree on shape.
    #[error("shape mismatch: {a_height}x{a_width} vs {b_height}x{b_width}")]
    ShapeMismatch {
        a_height: usize,
        a_width: usize,
        b_height: usize,
        b_width: usize,
    },
    /// The rasters are smaller than one comparison window.
    #[error("image {height}x{width} is smaller than the 7x7 comparison window")]
    WindowTooLarge { height: usize, width: usize },
    /// The nominal dynamic range must be positive.
    #[error("data range must be positive, got {0}")]
    InvalidDataRange(f64),
    /// A raster could not be collapsed to luminance.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Scores two equally-shaped single-channel rasters.
///
/// `data_range` is the nominal dynamic range of the samples (255 for
/// 8-bit data). The result lies in `[-1, 1]`, is symmetric in its
/// arguments, and hits 1.0 exactly when the inputs are identical.
///
/// # Errors
/// [`SsimError::ShapeMismatch`], [`SsimError::WindowTooLarge`] or
/// [`SsimError::InvalidDataRange`].
pub fn structural_similarity(
    a: &Array2<u8>,
    b: &Array2<u8>,
    data_range: f64,
) -> Result<f64, SsimError> {
    let (a_height, a_width) = a.dim();
    let (b_height, b_width) = b.dim();
    if (a_height, a_width) != (b_height, b_width) {
        return Err(SsimError::ShapeMismatch {
            a_height,
            a_width,
            b_height,
            b_width,
        });
    }
    if data_range <= 0.0 || data_range.is_nan() {
        return Err(SsimError::InvalidDataRange(data_range));
    }
    if a_height < WINDOW || a_width < WINDOW {
        return Err(SsimError::WindowTooLarge {
            height: a_height,
            width: a_width,
        });
    }

    let np = (WINDOW * WINDOW) as f64;
    // Sample (n - 1) normalization, matching how the covariances are
    // estimated from each window.
    let cov_norm = np / (np - 1.0);
    let c1 = (K1 * data_range).powi(2);
    let c2 = (K2 * data_range).powi(2);

    // Summed-area tables give every window sum in constant time.
    let sum_a = summed_area(a_height, a_width, |y, x| f64::from(a[[y, x]]));
    let sum_b = summed_area(a_height, a_width, |y, x| f64::from(b[[y, x]]));
    let sum_aa = summed_area(a_height, a_width, |y, x| {
        f64::from(a[[y, x]]) * f64::from(a[[y, x]])
    });
    let sum_bb = summed_area(a_height, a_width, |y, x| {
        f64::from(b[[y, x]]) * f64::from(b[[y, x]])
    });
    let sum_ab = summed_area(a_height, a_width, |y, x| {
        f64::from(a[[y, x]]) * f64::from(b[[y, x]])
    });

    let mut total = 0.0f64;
    let mut windows = 0usize;
    for y in 0..=(a_height - WINDOW) {
        for x in 0..=(a_width - WINDOW) {
            let ux = window_sum(&sum_a, y, x) / np;
            let uy = window_sum(&sum_b, y, x) / np;
            let uxx = window_sum(&sum_aa, y, x) / np;
            let uyy = window_sum(&sum_bb, y, x) / np;
            let uxy = window_sum(&sum_ab, y, x) / np;

            let vx = cov_norm * (uxx - ux * ux);
            let vy = cov_norm * (uyy - uy * uy);
            let vxy = cov_norm * (uxy - ux * uy);

            let luminance_term = 2.0 * ux * uy + c1;
            let contrast_term = 2.0 * vxy + c2;
            let denom = (ux * ux + uy * uy + c1) * (vx + vy + c2);
            total += (luminance_term * contrast_term) / denom;
            windows += 1;
        }
    }
    Ok(total / windows as f64)
}

/// Scores an enhanced raster against a reference.
///
/// Both sides are collapsed to luminance first. When the shapes differ,
/// the *reference* is resampled to the candidate's dimensions with
/// bilinear filtering; the candidate is never touched. Scoring uses the
/// full 8-bit data range.
///
/// # Errors
/// Conversion failures and the window errors from
/// [`structural_similarity`].
pub fn evaluate(candidate: &Raster, reference: &Raster) -> Result<f64, SsimError> {
    let cand = luminance(candidate)?;
    let mut refr = luminance(reference)?;
    if refr.dim() != cand.dim() {
        let (height, width) = cand.dim();
        refr = resize_gray(&refr, width as u32, height as u32);
    }
    structural_similarity(&cand, &refr, 255.0)
}

fn resize_gray(plane: &Array2<u8>, width: u32, height: u32) -> Array2<u8> {
    let buffer = array2_to_gray_image(plane);
    let resized = imageops::resize(&buffer, width, height, FilterType::Triangle);
    gray_image_to_array2(&resized)
}

/// Table sized `(h + 1, w + 1)` where entry `[y, x]` holds the sum of all
/// values above and left of `(y, x)` exclusive.
fn summed_area(height: usize, width: usize, value: impl Fn(usize, usize) -> f64) -> Array2<f64> {
    let mut table = Array2::zeros((height + 1, width + 1));
    for y in 0..height {
        let mut row = 0.0f64;
        for x in 0..width {
            row += value(y, x);
            table[[y + 1, x + 1]] = table[[y, x + 1]] + row;
        }
    }
    table
}

fn window_sum(table: &Array2<f64>, y: usize, x: usize) -> f64 {
    table[[y + WINDOW, x + WINDOW]] - table[[y, x + WINDOW]] - table[[y + WINDOW, x]]
        + table[[y, x]]
}
