//! Fixed-kernel sharpening.

use crate::border::reflect_101;
use ndarray::Array3;

/// Identity plus a negative Laplacian: boosts each sample by its contrast
/// against the four nearest neighbors.
const KERNEL: [[i32; 3]; 3] = [[0, -1, 0], [-1, 5, -1], [0, -1, 0]];

/// Sharpens every channel with the fixed 3x3 kernel.
///
/// The kernel sums to one, so flat regions pass through unchanged while
/// edges gain overshoot. Borders reflect without repeating the edge
/// sample; accumulation is in `i32` and the result saturates to `[0, 255]`.
pub fn sharpen(rgb: &Array3<u8>) -> Array3<u8> {
    let (height, width, _) = rgb.dim();
    let mut output = Array3::zeros((height, width, 3));
    for y in 0..height {
        for x in 0..width {
            for c in 0..3 {
                let mut acc = 0i32;
                for (ky, row) in KERNEL.iter().enumerate() {
                    for (kx, &weight) in row.iter().enumerate() {
                        if weight == 0 {
                            continue;
                        }
                        let sy = reflect_101(y as isize + ky as isize - 1, height);
                        let sx = reflect_101(x as isize + kx as isize - 1, width);
                        acc += weight * i32::from(rgb[[sy, sx, c]]);
                    }
                }
                output[[y, x, c]] = acc.clamp(0, 255) as u8;
            }
        }
    }
    output
}
