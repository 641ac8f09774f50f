//! Deterministic synthetic rasters used by tests and demos.

use ndarray::{Array2, Array3};

/// Horizontal ramp from 0 at the left edge to 255 at the right edge.
pub fn gradient_gray(height: usize, width: usize) -> Array2<u8> {
    Array2::from_shape_fn((height, width), |(_, x)| {
        if width <= 1 {
            0
        } else {
            (x * 255 / (width - 1)) as u8
        }
    })
}

/// Checkerboard of `square`-sized tiles alternating 0 and 255.
pub fn checkerboard_gray(height: usize, width: usize, square: usize) -> Array2<u8> {
    let square = square.max(1);
    Array2::from_shape_fn((height, width), |(y, x)| {
        if ((y / square) + (x / square)) % 2 == 0 {
            0
        } else {
            255
        }
    })
}

/// RGB test card: red rises along x, green along y, blue fixed mid-level.
pub fn gradient_rgb(height: usize, width: usize) -> Array3<u8> {
    Array3::from_shape_fn((height, width, 3), |(y, x, c)| match c {
        0 => {
            if width <= 1 {
                0
            } else {
                (x * 255 / (width - 1)) as u8
            }
        }
        1 => {
            if height <= 1 {
                0
            } else {
                (y * 255 / (height - 1)) as u8
            }
        }
        _ => 128,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_spans_the_full_range() {
        let ramp = gradient_gray(4, 16);
        assert_eq!(ramp[[0, 0]], 0);
        assert_eq!(ramp[[3, 15]], 255);
        assert_eq!(ramp.dim(), (4, 16));
    }

    #[test]
    fn test_checkerboard_alternates_between_extremes() {
        let board = checkerboard_gray(8, 8, 2);
        assert_eq!(board[[0, 0]], 0);
        assert_eq!(board[[0, 2]], 255);
        assert_eq!(board[[2, 0]], 255);
        assert_eq!(board[[2, 2]], 0);
    }

    #[test]
    fn test_rgb_card_varies_on_independent_axes() {
        let card = gradient_rgb(9, 9);
        assert!(card[[0, 8, 0]] > card[[0, 0, 0]]);
        assert!(card[[8, 0, 1]] > card[[0, 0, 1]]);
        assert_eq!(card[[4, 4, 2]], 128);
    }
}
