//! Raster input normalization.
//!
//! Decoders and interactive front ends hand us images in whatever channel
//! layout they happen to have. Everything downstream of [`to_rgb`] works on
//! the canonical form: an interleaved 8-bit `(height, width, 3)` RGB array.
//!
//! Coordinate convention follows ndarray throughout: index `[row, col]`,
//! i.e. `[y, x]`.

use ndarray::{Array2, Array3, Axis};
use thiserror::Error;

/// Side length of the blank preview raster rendered when enhancement
/// cannot run at all.
pub const BLANK_PREVIEW_SIZE: usize = 300;

/// Why an input raster could not be normalized to canonical RGB.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// The raster has a channel count we refuse to guess an interpretation
    /// for (e.g. RGBA or a raw planar stack).
    #[error("unsupported channel count {channels}, expected 1 or 3")]
    UnsupportedChannels { channels: usize },
    /// The raster has no pixels.
    #[error("empty raster ({height}x{width})")]
    EmptyRaster { height: usize, width: usize },
}

/// An input image as delivered by a decoder or interactive front end.
#[derive(Debug, Clone, PartialEq)]
pub enum Raster {
    /// Single-channel 8-bit image, shape `(height, width)`.
    Gray(Array2<u8>),
    /// Interleaved 8-bit image, shape `(height, width, channels)`.
    Multi(Array3<u8>),
}

impl Raster {
    /// Height in pixels.
    pub fn height(&self) -> usize {
        match self {
            Raster::Gray(plane) => plane.nrows(),
            Raster::Multi(array) => array.dim().0,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        match self {
            Raster::Gray(plane) => plane.ncols(),
            Raster::Multi(array) => array.dim().1,
        }
    }
}

impl From<Array2<u8>> for Raster {
    fn from(plane: Array2<u8>) -> Self {
        Raster::Gray(plane)
    }
}

impl From<Array3<u8>> for Raster {
    fn from(array: Array3<u8>) -> Self {
        Raster::Multi(array)
    }
}

/// Normalizes an input raster to the canonical `(height, width, 3)` form.
///
/// Single-channel input (either the dedicated gray variant or a
/// one-channel array) is replicated across all three channels;
/// three-channel input passes through untouched. Anything else is refused
/// rather than guessed at.
///
/// # Errors
///
/// * [`ConversionError::EmptyRaster`] when either dimension is zero.
/// * [`ConversionError::UnsupportedChannels`] for channel counts other
///   than 1 or 3.
pub fn to_rgb(raster: &Raster) -> Result<Array3<u8>, ConversionError> {
    let (height, width) = (raster.height(), raster.width());
    if height == 0 || width == 0 {
        return Err(ConversionError::EmptyRaster { height, width });
    }
    match raster {
        Raster::Gray(plane) => Ok(replicate(&plane.view())),
        Raster::Multi(array) => match array.dim().2 {
            1 => Ok(replicate(&array.index_axis(Axis(2), 0))),
            3 => Ok(array.clone()),
            channels => Err(ConversionError::UnsupportedChannels { channels }),
        },
    }
}

fn replicate(plane: &ndarray::ArrayView2<u8>) -> Array3<u8> {
    let (height, width) = plane.dim();
    Array3::from_shape_fn((height, width, 3), |(y, x, _)| plane[[y, x]])
}

/// Collapses a raster to single-channel luminance.
///
/// Gray input passes through unchanged; color input is reduced with the
/// Rec. 601 weights via [`rgb_luminance`].
///
/// # Errors
/// Same conditions as [`to_rgb`].
pub fn luminance(raster: &Raster) -> Result<Array2<u8>, ConversionError> {
    match raster {
        Raster::Gray(plane) => {
            let (height, width) = plane.dim();
            if height == 0 || width == 0 {
                return Err(ConversionError::EmptyRaster { height, width });
            }
            Ok(plane.clone())
        }
        Raster::Multi(_) => Ok(rgb_luminance(&to_rgb(raster)?)),
    }
}

/// Rec. 601 luminance of a canonical RGB raster:
/// `0.299 R + 0.587 G + 0.114 B`, rounded to the nearest level.
pub fn rgb_luminance(rgb: &Array3<u8>) -> Array2<u8> {
    let (height, width, _) = rgb.dim();
    Array2::from_shape_fn((height, width), |(y, x)| {
        let r = f64::from(rgb[[y, x, 0]]);
        let g = f64::from(rgb[[y, x, 1]]);
        let b = f64::from(rgb[[y, x, 2]]);
        (0.299 * r + 0.587 * g + 0.114 * b).round().clamp(0.0, 255.0) as u8
    })
}

/// All-zero RGB raster of the given size.
pub fn blank_rgb(height: usize, width: usize) -> Array3<u8> {
    Array3::zeros((height, width, 3))
}

/// The fixed-size black raster legacy front ends render in place of output
/// when enhancement cannot run. See
/// [`enhance_or_blank`](crate::pipeline::enhance_or_blank).
pub fn blank_preview() -> Array3<u8> {
    blank_rgb(BLANK_PREVIEW_SIZE, BLANK_PREVIEW_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_input_replicates_into_three_channels() {
        let plane = Array2::from_shape_fn((4, 5), |(y, x)| (y * 5 + x) as u8);
        let rgb = to_rgb(&Raster::Gray(plane.clone())).unwrap();
        assert_eq!(rgb.dim(), (4, 5, 3));
        for ((y, x, _), &value) in rgb.indexed_iter() {
            assert_eq!(value, plane[[y, x]]);
        }
    }

    #[test]
    fn test_single_channel_array_is_treated_as_gray() {
        let mut single = Array3::zeros((3, 3, 1));
        single[[1, 2, 0]] = 77;
        let rgb = to_rgb(&Raster::Multi(single)).unwrap();
        assert_eq!(rgb[[1, 2, 0]], 77);
        assert_eq!(rgb[[1, 2, 1]], 77);
        assert_eq!(rgb[[1, 2, 2]], 77);
    }

    #[test]
    fn test_three_channel_input_passes_through() {
        let rgb_in = Array3::from_shape_fn((2, 2, 3), |(y, x, c)| (y * 12 + x * 3 + c) as u8);
        let rgb_out = to_rgb(&Raster::Multi(rgb_in.clone())).unwrap();
        assert_eq!(rgb_out, rgb_in);
    }

    #[test]
    fn test_four_channel_input_is_refused() {
        let rgba = Array3::<u8>::zeros((4, 4, 4));
        let err = to_rgb(&Raster::Multi(rgba)).unwrap_err();
        assert_eq!(err, ConversionError::UnsupportedChannels { channels: 4 });
    }

    #[test]
    fn test_empty_raster_is_refused() {
        let empty = Array2::<u8>::zeros((0, 7));
        let err = to_rgb(&Raster::Gray(empty)).unwrap_err();
        assert_eq!(
            err,
            ConversionError::EmptyRaster {
                height: 0,
                width: 7
            }
        );
    }

    #[test]
    fn test_luminance_uses_rec601_weights() {
        let mut rgb = Array3::zeros((1, 3, 3));
        rgb[[0, 0, 0]] = 255; // pure red
        rgb[[0, 1, 1]] = 255; // pure green
        rgb[[0, 2, 2]] = 255; // pure blue
        let luma = luminance(&Raster::Multi(rgb)).unwrap();
        assert_eq!(luma[[0, 0]], 76); // 0.299 * 255
        assert_eq!(luma[[0, 1]], 150); // 0.587 * 255
        assert_eq!(luma[[0, 2]], 29); // 0.114 * 255
    }

    #[test]
    fn test_luminance_of_gray_is_identity() {
        let plane = Array2::from_shape_fn((3, 3), |(y, x)| (y * 16 + x) as u8);
        let luma = luminance(&Raster::Gray(plane.clone())).unwrap();
        assert_eq!(luma, plane);
    }

    #[test]
    fn test_blank_preview_is_fixed_size_and_black() {
        let blank = blank_preview();
        assert_eq!(blank.dim(), (300, 300, 3));
        assert!(blank.iter().all(|&v| v == 0));
    }
}
