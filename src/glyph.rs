//! Glyph rasterization and per-character brightness.
//!
//! A glyph is drawn as dark ink on white paper. Its brightness is the share of
//! paper left showing, so it compares directly with image brightness where
//! white is 1.0: a space scores 1.0 and dense glyphs approach 0.

use crate::{AsciiArtError, Result};
use font8x8::{UnicodeFonts, BASIC_FONTS, BLOCK_FONTS, BOX_FONTS, LATIN_FONTS};
use fontdue::{Font, FontSettings};
use std::path::Path;

/// Monochrome glyph raster; `true` marks a lit (paper) pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphBitmap {
    width: usize,
    height: usize,
    lit: Vec<bool>,
}

impl GlyphBitmap {
    /// A bitmap with no ink at all.
    pub fn blank(width: usize, height: usize) -> Self {
        Self { width, height, lit: vec![true; width * height] }
    }

    /// Build from row-major lit flags. Returns `None` if `lit` is not `width * height` long.
    pub fn from_lit(width: usize, height: usize, lit: Vec<bool>) -> Option<Self> {
        (lit.len() == width * height && !lit.is_empty()).then_some(Self { width, height, lit })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        self.lit[y * self.width + x]
    }

    /// Fraction of lit pixels, in [0, 1].
    pub fn brightness(&self) -> f64 {
        let lit = self.lit.iter().filter(|&&p| p).count();
        lit as f64 / self.lit.len() as f64
    }

    fn set_ink(&mut self, x: usize, y: usize) {
        self.lit[y * self.width + x] = false;
    }
}

/// Renders a character to a fixed-size bitmap. Must be deterministic per character.
pub trait GlyphRenderer {
    fn render(&self, c: char) -> GlyphBitmap;
}

/// Un-normalized brightness of `c` as drawn by `renderer`.
pub fn glyph_brightness(renderer: &dyn GlyphRenderer, c: char) -> f64 {
    renderer.render(c).brightness()
}

const FONT8X8_SIDE: usize = 8;

/// Built-in 8×8 bitmap font covering ASCII, Latin-1, box drawing and block elements.
#[derive(Debug, Default, Clone, Copy)]
pub struct Font8x8Renderer;

impl GlyphRenderer for Font8x8Renderer {
    fn render(&self, c: char) -> GlyphBitmap {
        let rows = BASIC_FONTS
            .get(c)
            .or_else(|| LATIN_FONTS.get(c))
            .or_else(|| BOX_FONTS.get(c))
            .or_else(|| BLOCK_FONTS.get(c));

        let mut bitmap = GlyphBitmap::blank(FONT8X8_SIDE, FONT8X8_SIDE);
        let Some(rows) = rows else {
            log::warn!("No 8×8 glyph for {c:?}, treating it as blank");
            return bitmap;
        };

        // Bit 0 is the leftmost pixel
        for (y, row) in rows.iter().enumerate() {
            for x in 0..FONT8X8_SIDE {
                if row & (1u8 << x) != 0 {
                    bitmap.set_ink(x, y);
                }
            }
        }
        bitmap
    }
}

const CELL_SIDE: u32 = 16;
const INK_THRESHOLD: u8 = 128;

/// TrueType glyphs rasterized into a 16×16 cell.
pub struct FontdueRenderer {
    font: Font,
    font_size: f32,
}

impl FontdueRenderer {
    pub fn new(font_path: impl AsRef<Path>) -> Result<Self> {
        let font_data = std::fs::read(font_path)?;
        Self::from_bytes(font_data)
    }

    pub fn from_bytes(font_data: Vec<u8>) -> Result<Self> {
        let font = Font::from_bytes(font_data, FontSettings::default())
            .map_err(|e| AsciiArtError::Font(e.to_string()))?;
        // ~87.5% to fit with baseline
        let font_size = CELL_SIDE as f32 * 0.875;
        Ok(Self { font, font_size })
    }
}

impl GlyphRenderer for FontdueRenderer {
    fn render(&self, c: char) -> GlyphBitmap {
        let side = CELL_SIDE as usize;
        let mut bitmap = GlyphBitmap::blank(side, side);

        // Index 0 is .notdef, drawn as a replacement box
        if self.font.lookup_glyph_index(c) == 0 {
            log::warn!("Font has no glyph for {c:?}, treating it as blank");
            return bitmap;
        }

        let (metrics, coverage) = self.font.rasterize(c, self.font_size);
        if metrics.width == 0 || metrics.height == 0 {
            return bitmap;
        }

        // Baseline at ~75% down
        let baseline_y = (CELL_SIDE as f32 * 0.75) as i32;
        let y_offset = baseline_y - metrics.height as i32 - metrics.ymin;

        // Center horizontally
        let x_offset = (CELL_SIDE as i32 - metrics.width as i32) / 2;

        for sy in 0..metrics.height {
            for sx in 0..metrics.width {
                let tx = x_offset + sx as i32;
                let ty = y_offset + sy as i32;
                let side = CELL_SIDE as i32;
                let inside = (0..side).contains(&tx) && (0..side).contains(&ty);
                if inside && coverage[sy * metrics.width + sx] >= INK_THRESHOLD {
                    bitmap.set_ink(tx as usize, ty as usize);
                }
            }
        }
        bitmap
    }
}
