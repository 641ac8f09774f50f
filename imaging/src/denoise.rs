//! Non-local means denoising.
//!
//! Each pixel is replaced by a weighted average over its search window,
//! where a candidate's weight comes from how closely the patch around it
//! resembles the patch around the pixel being restored. Repeated structure
//! anywhere in the window reinforces itself; dissimilar candidates are
//! suppressed exponentially. Cost is O(pixels * search^2 * patch^2), which
//! is fine for the preview-sized rasters the pipeline handles.

use ndarray::Array3;

/// Patch half-width: comparisons use 7x7 patches.
const PATCH_RADIUS: isize = 3;
/// Search half-width: candidates come from a 21x21 neighborhood.
const SEARCH_RADIUS: isize = 10;

/// Denoises an RGB raster with non-local means.
///
/// `strength` is the filtering parameter `h`: candidate weights are
/// `exp(-d^2 / h^2)` where `d^2` is the mean squared difference between
/// the two 7x7 patches over all three channels. One weight per candidate
/// is shared across channels, so luminance and color are smoothed equally.
/// Patch samples beyond the border clamp to the edge.
///
/// A `strength` of zero or below performs no filtering at all and returns
/// the input unchanged.
pub fn denoise_nlm(rgb: &Array3<u8>, strength: f64) -> Array3<u8> {
    if strength <= 0.0 {
        return rgb.clone();
    }
    let (height, width, _) = rgb.dim();
    let h2 = strength * strength;
    let mut output = Array3::zeros((height, width, 3));
    for y in 0..height {
        for x in 0..width {
            let mut weight_sum = 0.0f64;
            let mut acc = [0.0f64; 3];
            for dy in -SEARCH_RADIUS..=SEARCH_RADIUS {
                for dx in -SEARCH_RADIUS..=SEARCH_RADIUS {
                    let cy = clamp_coord(y as isize + dy, height);
                    let cx = clamp_coord(x as isize + dx, width);
                    let d2 = patch_distance(rgb, (y, x), (cy, cx));
                    let weight = (-d2 / h2).exp();
                    weight_sum += weight;
                    for (channel, slot) in acc.iter_mut().enumerate() {
                        *slot += weight * f64::from(rgb[[cy, cx, channel]]);
                    }
                }
            }
            for (channel, &sum) in acc.iter().enumerate() {
                output[[y, x, channel]] = (sum / weight_sum).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    output
}

/// Mean squared difference between the patches centered on `a` and `b`,
/// accumulated over all three channels.
fn patch_distance(rgb: &Array3<u8>, a: (usize, usize), b: (usize, usize)) -> f64 {
    let (height, width, _) = rgb.dim();
    let mut sum = 0.0f64;
    for dy in -PATCH_RADIUS..=PATCH_RADIUS {
        for dx in -PATCH_RADIUS..=PATCH_RADIUS {
            let ay = clamp_coord(a.0 as isize + dy, height);
            let ax = clamp_coord(a.1 as isize + dx, width);
            let by = clamp_coord(b.0 as isize + dy, height);
            let bx = clamp_coord(b.1 as isize + dx, width);
            for channel in 0..3 {
                let diff = f64::from(rgb[[ay, ax, channel]]) - f64::from(rgb[[by, bx, channel]]);
                sum += diff * diff;
            }
        }
    }
    let side = 2 * PATCH_RADIUS + 1;
    sum / (side * side * 3) as f64
}

fn clamp_coord(index: isize, len: usize) -> usize {
    index.clamp(0, len as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn flat(value: u8, size: usize) -> Array3<u8> {
        Array3::from_elem((size, size, 3), value)
    }

    /// Deterministic speckle on a mid-gray field.
    fn speckled(size: usize) -> Array3<u8> {
        Array3::from_shape_fn((size, size, 3), |(y, x, c)| {
            let jitter = ((y * 31 + x * 17 + c * 7) % 13) as u8;
            120 + jitter
        })
    }

    fn spread(rgb: &Array3<u8>) -> f64 {
        let mean = rgb.iter().map(|&v| f64::from(v)).sum::<f64>() / rgb.len() as f64;
        rgb.iter()
            .map(|&v| (f64::from(v) - mean).powi(2))
            .sum::<f64>()
            / rgb.len() as f64
    }

    #[test]
    fn test_zero_strength_is_an_exact_no_op() {
        let noisy = speckled(10);
        assert_eq!(denoise_nlm(&noisy, 0.0), noisy);
    }

    #[test]
    fn test_constant_field_is_unchanged_by_filtering() {
        let field = flat(77, 10);
        assert_eq!(denoise_nlm(&field, 10.0), field);
    }

    #[test]
    fn test_an_impulse_is_pulled_toward_its_surroundings() {
        let mut field = flat(50, 11);
        for c in 0..3 {
            field[[5, 5, c]] = 250;
        }
        let cleaned = denoise_nlm(&field, 15.0);
        assert!(
            cleaned[[5, 5, 0]] < 250,
            "impulse survived at {}",
            cleaned[[5, 5, 0]]
        );
        // Far corner sees only flat patches and must stay put.
        assert_eq!(cleaned[[0, 0, 0]], 50);
    }

    #[test]
    fn test_stronger_filtering_smooths_more() {
        let noisy = speckled(12);
        let gentle = denoise_nlm(&noisy, 3.0);
        let heavy = denoise_nlm(&noisy, 25.0);
        assert!(spread(&heavy) < spread(&gentle));
        assert!(spread(&gentle) <= spread(&noisy));
    }
}
