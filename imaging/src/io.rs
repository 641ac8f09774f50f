//! Conversions between ndarray rasters and `image` crate buffers, plus
//! file-level load and save helpers.
//!
//! ndarray indexes `[row, col]` (y, x) while the `image` crate addresses
//! `(x, y)`; these helpers are the one place that swap happens, so nothing
//! else in the crate needs to think about it.

use crate::raster::Raster;
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use ndarray::{Array2, Array3};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// I/O failure at the image file boundary.
#[derive(Error, Debug)]
pub enum ImageIoError {
    #[error("failed to read image {path}: {source}")]
    Read {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("failed to write image {path}: {source}")]
    Write {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Converts a grayscale image buffer to a 2D array.
pub fn gray_image_to_array2(image: &GrayImage) -> Array2<u8> {
    let (width, height) = image.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
        image.get_pixel(x as u32, y as u32)[0]
    })
}

/// Converts a 2D array to a grayscale image buffer.
pub fn array2_to_gray_image(array: &Array2<u8>) -> GrayImage {
    let (height, width) = array.dim();
    let mut image = GrayImage::new(width as u32, height as u32);
    for ((y, x), &value) in array.indexed_iter() {
        image.put_pixel(x as u32, y as u32, Luma([value]));
    }
    image
}

/// Converts an RGB image buffer to a `(height, width, 3)` array.
pub fn rgb_image_to_array3(image: &RgbImage) -> Array3<u8> {
    let (width, height) = image.dimensions();
    Array3::from_shape_fn((height as usize, width as usize, 3), |(y, x, c)| {
        image.get_pixel(x as u32, y as u32)[c]
    })
}

/// Converts a `(height, width, 3)` array to an RGB image buffer.
pub fn array3_to_rgb_image(array: &Array3<u8>) -> RgbImage {
    let (height, width, _) = array.dim();
    let mut image = RgbImage::new(width as u32, height as u32);
    for y in 0..height {
        for x in 0..width {
            let pixel = Rgb([array[[y, x, 0]], array[[y, x, 1]], array[[y, x, 2]]]);
            image.put_pixel(x as u32, y as u32, pixel);
        }
    }
    image
}

/// Loads an image file as a [`Raster`].
///
/// Gray files decode to the gray variant; everything else (including
/// palette and alpha formats) is converted to 3-channel RGB by the
/// decoder.
///
/// # Errors
/// [`ImageIoError::Read`] when the file is missing or fails to decode.
pub fn load_raster(path: &Path) -> Result<Raster, ImageIoError> {
    let decoded = open(path)?;
    Ok(match decoded {
        DynamicImage::ImageLuma8(gray) => Raster::Gray(gray_image_to_array2(&gray)),
        other => Raster::Multi(rgb_image_to_array3(&other.to_rgb8())),
    })
}

/// Loads an image file and collapses it to a grayscale array.
///
/// # Errors
/// [`ImageIoError::Read`] when the file is missing or fails to decode.
pub fn load_gray(path: &Path) -> Result<Array2<u8>, ImageIoError> {
    Ok(gray_image_to_array2(&open(path)?.to_luma8()))
}

/// Saves a grayscale array as an image file; the format follows the
/// extension.
///
/// # Errors
/// [`ImageIoError::Write`] on encoding or filesystem failure.
pub fn save_gray(array: &Array2<u8>, path: &Path) -> Result<(), ImageIoError> {
    array2_to_gray_image(array)
        .save(path)
        .map_err(|source| ImageIoError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Saves a `(height, width, 3)` array as an image file; the format follows
/// the extension.
///
/// # Errors
/// [`ImageIoError::Write`] on encoding or filesystem failure.
pub fn save_rgb(array: &Array3<u8>, path: &Path) -> Result<(), ImageIoError> {
    array3_to_rgb_image(array)
        .save(path)
        .map_err(|source| ImageIoError::Write {
            path: path.to_path_buf(),
            source,
        })
}

fn open(path: &Path) -> Result<DynamicImage, ImageIoError> {
    image::open(path).map_err(|source| ImageIoError::Read {
        path: path.to_path_buf(),
        source,
    })
}
