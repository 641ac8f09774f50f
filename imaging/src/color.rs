//! RGB / YUV conversion, 8-bit BT.601 with a 128 chroma offset.
//!
//! Luma carries the Rec. 601 weighted sum; chroma is the blue and red
//! differences scaled by 0.492 and 0.877 and biased to mid-range so the
//! planes stay unsigned. Every step rounds and clamps, so a round trip is
//! lossy by at most the rounding of each plane.

use ndarray::Array3;

fn quantize(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Converts a canonical RGB raster to YUV, channel order `[Y, U, V]`.
pub fn rgb_to_yuv(rgb: &Array3<u8>) -> Array3<u8> {
    let (height, width, _) = rgb.dim();
    let mut yuv = Array3::zeros((height, width, 3));
    for y in 0..height {
        for x in 0..width {
            let r = f64::from(rgb[[y, x, 0]]);
            let g = f64::from(rgb[[y, x, 1]]);
            let b = f64::from(rgb[[y, x, 2]]);
            let luma = 0.299 * r + 0.587 * g + 0.114 * b;
            yuv[[y, x, 0]] = quantize(luma);
            yuv[[y, x, 1]] = quantize((b - luma) * 0.492 + 128.0);
            yuv[[y, x, 2]] = quantize((r - luma) * 0.877 + 128.0);
        }
    }
    yuv
}

/// Converts a YUV raster (channel order `[Y, U, V]`) back to RGB.
pub fn yuv_to_rgb(yuv: &Array3<u8>) -> Array3<u8> {
    let (height, width, _) = yuv.dim();
    let mut rgb = Array3::zeros((height, width, 3));
    for y in 0..height {
        for x in 0..width {
            let luma = f64::from(yuv[[y, x, 0]]);
            let u = f64::from(yuv[[y, x, 1]]) - 128.0;
            let v = f64::from(yuv[[y, x, 2]]) - 128.0;
            rgb[[y, x, 0]] = quantize(luma + 1.140 * v);
            rgb[[y, x, 1]] = quantize(luma - 0.395 * u - 0.581 * v);
            rgb[[y, x, 2]] = quantize(luma + 2.032 * u);
        }
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::rgb_luminance;
    use ndarray::Array3;

    fn solid(r: u8, g: u8, b: u8) -> Array3<u8> {
        Array3::from_shape_fn((2, 2, 3), |(_, _, c)| match c {
            0 => r,
            1 => g,
            _ => b,
        })
    }

    #[test]
    fn test_neutral_gray_is_exact_through_the_round_trip() {
        for level in [0u8, 1, 64, 128, 200, 255] {
            let rgb = solid(level, level, level);
            let yuv = rgb_to_yuv(&rgb);
            assert_eq!(yuv[[0, 0, 0]], level);
            assert_eq!(yuv[[0, 0, 1]], 128);
            assert_eq!(yuv[[0, 0, 2]], 128);
            assert_eq!(yuv_to_rgb(&yuv), rgb);
        }
    }

    #[test]
    fn test_luma_plane_matches_rec601_luminance() {
        let rgb = Array3::from_shape_fn((3, 3, 3), |(y, x, c)| (y * 40 + x * 13 + c * 7) as u8);
        let yuv = rgb_to_yuv(&rgb);
        let luma = rgb_luminance(&rgb);
        for ((y, x), &expected) in luma.indexed_iter() {
            assert_eq!(yuv[[y, x, 0]], expected);
        }
    }

    #[test]
    fn test_in_gamut_colors_round_trip_within_quantization() {
        for rgb in [solid(200, 30, 90), solid(12, 240, 56), solid(90, 60, 200)] {
            let back = yuv_to_rgb(&rgb_to_yuv(&rgb));
            for (&a, &b) in rgb.iter().zip(back.iter()) {
                assert!(
                    (i16::from(a) - i16::from(b)).abs() <= 2,
                    "{a} vs {b} drifted more than quantization allows"
                );
            }
        }
    }

    #[test]
    fn test_fully_saturated_red_clamps_its_chroma() {
        // 0.877 * (255 - Y) overshoots the unsigned range, so V pins at 255
        // and the round trip is lossy for extreme colors.
        let yuv = rgb_to_yuv(&solid(255, 0, 0));
        assert_eq!(yuv[[0, 0, 2]], 255);
    }
}
