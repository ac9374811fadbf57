//! Brightness-based character matcher over a mutable palette.

use crate::glyph::{glyph_brightness, GlyphRenderer};
use crate::{AsciiArtError, Result};
use std::collections::BTreeMap;

/// Whether the normalized lookup reflects the current palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LookupState {
    Clean,
    Dirty,
}

/// Maps a brightness in [0, 1] to the palette character whose normalized
/// glyph brightness is closest.
///
/// The normalized lookup is rebuilt on the first query after any palette change.
pub struct CharMatcher {
    renderer: Box<dyn GlyphRenderer>,
    palette: BTreeMap<char, f64>,
    /// Sorted by normalized brightness, one character per distinct value
    lookup: Vec<(f64, char)>,
    state: LookupState,
}

impl CharMatcher {
    pub fn new(renderer: Box<dyn GlyphRenderer>) -> Self {
        Self { renderer, palette: BTreeMap::new(), lookup: Vec::new(), state: LookupState::Dirty }
    }

    pub fn with_chars(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        for c in chars {
            self.add_char(c);
        }
        self
    }

    /// Add `c` to the palette. Returns `true` if it was not already present.
    pub fn add_char(&mut self, c: char) -> bool {
        let brightness = glyph_brightness(self.renderer.as_ref(), c);
        let added = self.palette.insert(c, brightness).is_none();
        if added {
            self.state = LookupState::Dirty;
        }
        added
    }

    /// Remove `c` from the palette. Returns `true` if it was present.
    pub fn remove_char(&mut self, c: char) -> bool {
        let removed = self.palette.remove(&c).is_some();
        if removed {
            self.state = LookupState::Dirty;
        }
        removed
    }

    pub fn contains(&self, c: char) -> bool {
        self.palette.contains_key(&c)
    }

    /// Palette characters in ascending code order.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.palette.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.palette.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palette.is_empty()
    }

    /// Closest palette character for `brightness`.
    ///
    /// Equal distances resolve toward the darker entry.
    pub fn char_for(&mut self, brightness: f64) -> Result<char> {
        if self.palette.is_empty() {
            return Err(AsciiArtError::EmptyPalette);
        }
        if self.state == LookupState::Dirty {
            self.rebuild();
        }

        let idx = self.lookup.partition_point(|&(key, _)| key < brightness);
        let below = idx.checked_sub(1).map(|i| self.lookup[i]);
        let above = self.lookup.get(idx).copied();

        let (_, c) = match (below, above) {
            (Some(lo), Some(hi)) => {
                if brightness - lo.0 <= hi.0 - brightness {
                    lo
                } else {
                    hi
                }
            }
            (Some(entry), None) | (None, Some(entry)) => entry,
            (None, None) => return Err(AsciiArtError::EmptyPalette),
        };
        Ok(c)
    }

    /// Min/max-scale the palette into the lookup. Keys collide when glyphs
    /// share a brightness; the lowest character code keeps the slot.
    fn rebuild(&mut self) {
        let (min, max) = self
            .palette
            .values()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let range = max - min;

        let mut lookup: Vec<(f64, char)> = self
            .palette
            .iter()
            .map(|(&c, &value)| {
                // A single distinct brightness collapses every glyph onto 0
                let normalized = if range > 0.0 { (value - min) / range } else { 0.0 };
                (normalized, c)
            })
            .collect();

        lookup.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        lookup.dedup_by(|later, kept| later.0 == kept.0);

        log::debug!(
            "Rebuilt brightness lookup: {} chars, {} levels",
            self.palette.len(),
            lookup.len()
        );
        self.lookup = lookup;
        self.state = LookupState::Clean;
    }
}
