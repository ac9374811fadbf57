//! One image at one resolution, reduced to a grid of cell brightnesses.

use crate::chunk;
use crate::matcher::CharMatcher;
use crate::{AsciiArtError, CharGrid, Result};
use rayon::prelude::*;
use std::path::Path;

/// Precomputed cell brightnesses for a padded image split into `resolution` columns.
///
/// The matcher is passed to [`run`](Self::run) rather than stored, so palette
/// edits made between runs show up without rebuilding the algorithm.
#[derive(Debug, Clone)]
pub struct AsciiArtAlgorithm {
    brightness: Vec<Vec<f64>>,
}

impl AsciiArtAlgorithm {
    pub fn new(image_path: impl AsRef<Path>, resolution: u32) -> Result<Self> {
        let image_path = image_path.as_ref();
        let padded = chunk::pad(&chunk::load(image_path)?);
        let (width, height) = padded.dimensions();

        let (min, max) = resolution_bounds(width, height);
        if resolution < min || resolution > max {
            return Err(AsciiArtError::ResolutionOutOfBounds { resolution, min, max });
        }

        let cell_size = width / resolution;
        let rows = height / cell_size;

        let cells = chunk::partition(&padded, rows, resolution);
        let brightness: Vec<Vec<f64>> = cells
            .par_iter()
            .map(|row| row.iter().map(chunk::brightness).collect::<Vec<f64>>())
            .collect();

        log::info!(
            "Prepared {} at {resolution}×{rows} cells of {cell_size}px",
            image_path.display()
        );
        Ok(Self { brightness })
    }

    /// Number of output rows.
    pub fn rows(&self) -> usize {
        self.brightness.len()
    }

    /// Number of output columns.
    pub fn cols(&self) -> usize {
        self.brightness.first().map_or(0, Vec::len)
    }

    pub fn run(&self, matcher: &mut CharMatcher) -> Result<CharGrid> {
        self.brightness
            .iter()
            .map(|row| row.iter().map(|&b| matcher.char_for(b)).collect::<Result<Vec<char>>>())
            .collect()
    }
}

/// Inclusive column-count range a `width × height` padded image supports.
pub fn resolution_bounds(width: u32, height: u32) -> (u32, u32) {
    ((width / height).max(1), width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::Font8x8Renderer;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn save(dir: &TempDir, name: &str, image: &RgbImage) -> std::path::PathBuf {
        let path = dir.path().join(name);
        image.save(&path).unwrap();
        path
    }

    /// 16×8, left half black, right half white.
    fn split_image(dir: &TempDir) -> std::path::PathBuf {
        let image = RgbImage::from_fn(16, 8, |x, _| {
            if x < 8 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        save(dir, "split.png", &image)
    }

    #[test]
    fn bounds_follow_padded_aspect() {
        assert_eq!(resolution_bounds(16, 8), (2, 16));
        assert_eq!(resolution_bounds(8, 16), (1, 8));
        assert_eq!(resolution_bounds(4, 4), (1, 4));
    }

    #[test]
    fn grid_dimensions_follow_resolution() {
        let dir = TempDir::new().unwrap();
        let path = split_image(&dir);

        for (res, rows) in [(2, 1), (4, 2), (16, 8)] {
            let algorithm = AsciiArtAlgorithm::new(&path, res).unwrap();
            assert_eq!((algorithm.cols(), algorithm.rows()), (res as usize, rows));
        }
    }

    #[test]
    fn out_of_bounds_resolution_fails() {
        let dir = TempDir::new().unwrap();
        let path = split_image(&dir);

        for res in [0, 1, 32] {
            let err = AsciiArtAlgorithm::new(&path, res).unwrap_err();
            assert!(matches!(
                err,
                AsciiArtError::ResolutionOutOfBounds { resolution, min: 2, max: 16 }
                    if resolution == res
            ));
        }
    }

    #[test]
    fn missing_image_fails() {
        let dir = TempDir::new().unwrap();
        let err = AsciiArtAlgorithm::new(dir.path().join("missing.png"), 4).unwrap_err();
        assert!(matches!(err, AsciiArtError::Image(_)));
    }

    #[test]
    fn run_tracks_palette_changes() {
        let dir = TempDir::new().unwrap();
        let algorithm = AsciiArtAlgorithm::new(split_image(&dir), 4).unwrap();
        let mut matcher = CharMatcher::new(Box::new(Font8x8Renderer)).with_chars(['#', ' ']);

        let grid = algorithm.run(&mut matcher).unwrap();
        assert_eq!(grid, vec![vec!['#', '#', ' ', ' ']; 2]);

        matcher.add_char('█');
        let grid = algorithm.run(&mut matcher).unwrap();
        assert_eq!(grid, vec![vec!['█', '█', ' ', ' ']; 2]);
    }

    #[test]
    fn run_with_empty_palette_fails() {
        let dir = TempDir::new().unwrap();
        let algorithm = AsciiArtAlgorithm::new(split_image(&dir), 2).unwrap();
        let mut matcher = CharMatcher::new(Box::new(Font8x8Renderer));
        assert!(matches!(algorithm.run(&mut matcher), Err(AsciiArtError::EmptyPalette)));
    }
}
