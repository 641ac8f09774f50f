//! Power-law tone adjustment.

use ndarray::Array3;

/// Applies `out = (in / 255)^gamma * 255` to every sample through a
/// 256-entry lookup table, rounding to the nearest level.
///
/// Exponents above 1.0 darken, below 1.0 brighten, and exactly 1.0 maps
/// every level to itself, so the stage degrades to a clean no-op.
pub fn adjust_gamma(rgb: &Array3<u8>, gamma: f64) -> Array3<u8> {
    let lut = build_lut(gamma);
    rgb.mapv(|value| lut[value as usize])
}

fn build_lut(gamma: f64) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (level, slot) in lut.iter_mut().enumerate() {
        let normalized = level as f64 / 255.0;
        *slot = (normalized.powf(gamma) * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    lut
}
