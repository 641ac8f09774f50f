//! Ground-truth lookup for interactive comparisons.
//!
//! The front end ships with a fixed gallery of example inputs whose
//! ground-truth twins live under a matching stem in the reference
//! directory. The gallery is injected by the caller as an [`ExampleTable`],
//! so tests and alternative galleries need no global state. Arbitrary
//! uploads simply have no ground truth.

use crate::io::load_raster;
use crate::raster::{to_rgb, Raster};
use ndarray::Array3;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extensions probed for a reference image, in order.
const REFERENCE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Known example inputs, matched by pixel-exact content.
#[derive(Debug, Clone, Default)]
pub struct ExampleTable {
    entries: Vec<(String, Array3<u8>)>,
}

impl ExampleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an example under its bare stem (e.g. `"102"`). Entries
    /// are consulted in insertion order.
    pub fn insert(&mut self, stem: impl Into<String>, raster: Array3<u8>) {
        self.entries.push((stem.into(), raster));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn match_stem(&self, rgb: &Array3<u8>) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, known)| known == rgb)
            .map(|(stem, _)| stem.as_str())
    }
}

/// Resolves a raster back to its ground-truth image, when one exists.
#[derive(Debug, Clone)]
pub struct ReferenceLookup {
    table: ExampleTable,
    reference_dir: PathBuf,
}

impl ReferenceLookup {
    pub fn new(table: ExampleTable, reference_dir: impl Into<PathBuf>) -> Self {
        Self {
            table,
            reference_dir: reference_dir.into(),
        }
    }

    pub fn reference_dir(&self) -> &Path {
        &self.reference_dir
    }

    /// Finds the ground truth for `raster`.
    ///
    /// The raster must be pixel-identical to one of the known examples;
    /// its stem is then probed under the reference directory with each
    /// extension in turn, and the first file that decodes wins. Everything
    /// else yields `None`; the caller decides what to compare against
    /// instead.
    pub fn find(&self, raster: &Raster) -> Option<Raster> {
        let rgb = to_rgb(raster).ok()?;
        let stem = self.table.match_stem(&rgb)?;
        for extension in REFERENCE_EXTENSIONS {
            let path = self.reference_dir.join(format!("{stem}.{extension}"));
            if !path.exists() {
                continue;
            }
            match load_raster(&path) {
                Ok(reference) => {
                    debug!(stem, path = %path.display(), "matched example to its ground truth");
                    return Some(reference);
                }
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "reference candidate failed to decode");
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::save_rgb;
    use crate::patterns::gradient_rgb;
    use ndarray::Array3;
    use tempfile::TempDir;

    fn example() -> Array3<u8> {
        gradient_rgb(10, 12)
    }

    fn lookup_with(dir: &TempDir) -> ReferenceLookup {
        let mut table = ExampleTable::new();
        table.insert("102", example());
        ReferenceLookup::new(table, dir.path())
    }

    #[test]
    fn test_known_example_resolves_to_its_reference_file() {
        let dir = TempDir::new().unwrap();
        let truth = Array3::from_elem((10, 12, 3), 200);
        save_rgb(&truth, &dir.path().join("102.png")).unwrap();

        let found = lookup_with(&dir).find(&Raster::Multi(example())).unwrap();
        match found {
            Raster::Multi(rgb) => assert_eq!(rgb, truth),
            Raster::Gray(_) => panic!("expected a color reference"),
        }
    }

    #[test]
    fn test_unknown_raster_has_no_ground_truth() {
        let dir = TempDir::new().unwrap();
        save_rgb(&example(), &dir.path().join("102.png")).unwrap();

        let mut other = example();
        other[[0, 0, 0]] ^= 0xff; // one pixel off: no longer the example
        assert!(lookup_with(&dir).find(&Raster::Multi(other)).is_none());
    }

    #[test]
    fn test_matched_stem_without_a_file_yields_none() {
        let dir = TempDir::new().unwrap();
        assert!(lookup_with(&dir).find(&Raster::Multi(example())).is_none());
    }

    #[test]
    fn test_extension_probe_prefers_png_over_jpg() {
        let dir = TempDir::new().unwrap();
        let png_truth = Array3::from_elem((4, 4, 3), 250);
        let jpg_truth = Array3::from_elem((4, 4, 3), 5);
        save_rgb(&png_truth, &dir.path().join("102.png")).unwrap();
        save_rgb(&jpg_truth, &dir.path().join("102.jpg")).unwrap();

        let found = lookup_with(&dir).find(&Raster::Multi(example())).unwrap();
        match found {
            Raster::Multi(rgb) => assert_eq!(rgb, png_truth),
            Raster::Gray(_) => panic!("expected a color reference"),
        }
    }

    #[test]
    fn test_gray_upload_matching_an_example_is_canonicalized_first() {
        // A gray raster whose replicated form equals a known example
        // still matches, since comparison happens in canonical space.
        let dir = TempDir::new().unwrap();
        let gray_example = ndarray::Array2::from_shape_fn((6, 6), |(y, x)| (y * 6 + x) as u8);
        let canonical = to_rgb(&Raster::Gray(gray_example.clone())).unwrap();
        let truth = Array3::from_elem((6, 6, 3), 77);
        save_rgb(&truth, &dir.path().join("door.png")).unwrap();

        let mut table = ExampleTable::new();
        table.insert("door", canonical);
        let lookup = ReferenceLookup::new(table, dir.path());
        assert!(lookup.find(&Raster::Gray(gray_example)).is_some());
    }
}
