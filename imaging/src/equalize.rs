//! Histogram equalization, in two named strategies.
//!
//! [`equalize_global`] builds one cumulative lookup table for the whole
//! image and is what the batch harness scores. [`equalize_adaptive`]
//! (CLAHE) builds a clipped lookup table per tile and blends the four
//! neighboring tables bilinearly at every pixel, so dark regions get
//! stretched without letting any single region drive the whole map; the
//! interactive pipeline uses it. Both operate on one 8-bit channel.

use crate::border::reflect_101;
use ndarray::{s, Array2, ArrayView2};

const LEVELS: usize = 256;

/// Full-image histogram equalization.
///
/// The first occupied level maps to 0 and the remaining mass is spread
/// linearly over the 8-bit range, so the output always reaches toward both
/// ends. A constant image has nothing to spread and is returned unchanged,
/// as is an empty one.
pub fn equalize_global(channel: &Array2<u8>) -> Array2<u8> {
    let total = channel.len();
    let mut hist = [0usize; LEVELS];
    for &value in channel.iter() {
        hist[value as usize] += 1;
    }
    let first = match hist.iter().position(|&count| count > 0) {
        Some(level) => level,
        None => return channel.clone(),
    };
    if hist[first] == total {
        return channel.clone();
    }

    // Mass at the first occupied level is excluded from the scale so that
    // level lands exactly on 0.
    let scale = 255.0 / (total - hist[first]) as f64;
    let mut lut = [0u8; LEVELS];
    let mut cumulative = 0usize;
    for level in (first + 1)..LEVELS {
        cumulative += hist[level];
        lut[level] = (cumulative as f64 * scale).round().clamp(0.0, 255.0) as u8;
    }
    channel.mapv(|value| lut[value as usize])
}

/// Contrast-limited adaptive histogram equalization (CLAHE).
///
/// The image is extended with reflect-101 borders until both dimensions
/// divide evenly into `tile_grid` tiles, a clipped cumulative lookup table
/// is built per tile, and each output pixel bilinearly blends the four
/// tables surrounding it (tile centers sit half a tile in from the
/// corners; coordinates beyond the outermost centers clamp).
///
/// `clip_limit` is expressed relative to a flat histogram: mass above
/// `clip_limit * tile_area / 256` (never less than 1) is cut off and
/// redistributed uniformly across all bins. Degenerate parameters are
/// tolerated rather than rejected here; the pipeline validates its config
/// before calling.
pub fn equalize_adaptive(channel: &Array2<u8>, clip_limit: f64, tile_grid: usize) -> Array2<u8> {
    let (height, width) = channel.dim();
    if height == 0 || width == 0 {
        return channel.clone();
    }
    let grid = tile_grid.max(1);
    let tile_h = height.div_ceil(grid);
    let tile_w = width.div_ceil(grid);
    let extended = extend_reflect_101(channel, tile_h * grid, tile_w * grid);

    let tile_area = tile_h * tile_w;
    let clip = (((clip_limit * tile_area as f64) / LEVELS as f64).max(1.0)).floor() as usize;

    // One LUT per tile, row-major over the grid.
    let mut luts = vec![[0u8; LEVELS]; grid * grid];
    for ty in 0..grid {
        for tx in 0..grid {
            let tile = extended.slice(s![
                ty * tile_h..(ty + 1) * tile_h,
                tx * tile_w..(tx + 1) * tile_w
            ]);
            build_tile_lut(&tile, clip, tile_area, &mut luts[ty * grid + tx]);
        }
    }

    // Both neighbor indices come from the unclamped floor and clamp
    // independently, so past the outermost tile centers the pair collapses
    // onto the edge tile and the outer half-tile band maps through that
    // table alone. Weights stay unclamped.
    let mut output = Array2::zeros((height, width));
    let inv_tile_h = 1.0 / tile_h as f64;
    let inv_tile_w = 1.0 / tile_w as f64;
    for y in 0..height {
        let tyf = y as f64 * inv_tile_h - 0.5;
        let ty = tyf.floor() as isize;
        let wy = tyf - ty as f64;
        let ty0 = ty.max(0) as usize;
        let ty1 = ((ty + 1).max(0) as usize).min(grid - 1);
        for x in 0..width {
            let txf = x as f64 * inv_tile_w - 0.5;
            let tx = txf.floor() as isize;
            let wx = txf - tx as f64;
            let tx0 = tx.max(0) as usize;
            let tx1 = ((tx + 1).max(0) as usize).min(grid - 1);

            let level = channel[[y, x]] as usize;
            let tl = f64::from(luts[ty0 * grid + tx0][level]);
            let tr = f64::from(luts[ty0 * grid + tx1][level]);
            let bl = f64::from(luts[ty1 * grid + tx0][level]);
            let br = f64::from(luts[ty1 * grid + tx1][level]);
            let top = tl * (1.0 - wx) + tr * wx;
            let bottom = bl * (1.0 - wx) + br * wx;
            let blended = top * (1.0 - wy) + bottom * wy;
            output[[y, x]] = blended.round().clamp(0.0, 255.0) as u8;
        }
    }
    output
}

fn extend_reflect_101(channel: &Array2<u8>, ext_h: usize, ext_w: usize) -> Array2<u8> {
    let (height, width) = channel.dim();
    if ext_h == height && ext_w == width {
        return channel.clone();
    }
    Array2::from_shape_fn((ext_h, ext_w), |(y, x)| {
        channel[[reflect_101(y as isize, height), reflect_101(x as isize, width)]]
    })
}

fn build_tile_lut(tile: &ArrayView2<u8>, clip: usize, tile_area: usize, lut: &mut [u8; LEVELS]) {
    let mut hist = [0usize; LEVELS];
    for &value in tile.iter() {
        hist[value as usize] += 1;
    }

    let mut excess = 0usize;
    for count in hist.iter_mut() {
        if *count > clip {
            excess += *count - clip;
            *count = clip;
        }
    }

    // Spread the clipped mass back: an even share everywhere, then the
    // remainder stepped across the bins.
    let share = excess / LEVELS;
    let mut residual = excess % LEVELS;
    for count in hist.iter_mut() {
        *count += share;
    }
    if residual > 0 {
        let step = (LEVELS / residual).max(1);
        let mut level = 0;
        while level < LEVELS && residual > 0 {
            hist[level] += 1;
            residual -= 1;
            level += step;
        }
    }

    let lut_scale = 255.0 / tile_area as f64;
    let mut cumulative = 0usize;
    for (level, &count) in hist.iter().enumerate() {
        cumulative += count;
        lut[level] = (cumulative as f64 * lut_scale).round().clamp(0.0, 255.0) as u8;
    }
}
