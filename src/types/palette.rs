//! Ordered, duplicate-free colour palettes.

use std::collections::HashSet;

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::error::{RetroError, Result};

use super::Colour;

/// Maximum number of entries in a palette.
pub const MAX_COLOURS: usize = 256;

/// An ordered sequence of unique opaque colours, at most 256 long.
///
/// A palette round-trips through a 1xN bitmap with one pixel per entry, which
/// is how palettes are stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Colour>", into = "Vec<Colour>")]
pub struct Palette {
    colours: Vec<Colour>,
}

impl Palette {
    /// Build a palette, dropping duplicates while keeping first-seen order.
    ///
    /// Entries past the 256th unique colour are ignored. Fails on an empty
    /// input.
    pub fn from_colours(colours: impl IntoIterator<Item = Colour>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();

        for colour in colours {
            let colour = Colour::rgb(colour.r, colour.g, colour.b);
            if unique.len() == MAX_COLOURS {
                break;
            }
            if seen.insert(colour) {
                unique.push(colour);
            }
        }

        if unique.is_empty() {
            return Err(RetroError::Input {
                message: "Palette has no colours".to_string(),
                help: None,
            });
        }

        Ok(Self { colours: unique })
    }

    /// Wrap colours already known to be unique, opaque and at most 256.
    pub(crate) fn from_unique(colours: Vec<Colour>) -> Self {
        debug_assert!(!colours.is_empty() && colours.len() <= MAX_COLOURS);
        Self { colours }
    }

    /// Read a palette from the pixels of a bitmap in raster order.
    ///
    /// Returns `None` when the bitmap holds more than 256 unique colours;
    /// callers reduce those with the palette extractor.
    pub fn from_bitmap(image: &RgbImage) -> Option<Self> {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();

        for px in image.pixels() {
            let colour = Colour::from(*px);
            if seen.insert(colour) {
                if unique.len() == MAX_COLOURS {
                    return None;
                }
                unique.push(colour);
            }
        }

        if unique.is_empty() {
            None
        } else {
            Some(Self { colours: unique })
        }
    }

    /// Render the palette as a 1xN bitmap.
    pub fn to_bitmap(&self) -> RgbImage {
        RgbImage::from_fn(self.colours.len() as u32, 1, |x, _| {
            self.colours[x as usize].to_rgb()
        })
    }

    /// The colours in index order.
    pub fn colours(&self) -> &[Colour] {
        &self.colours
    }

    pub fn get(&self, index: usize) -> Option<Colour> {
        self.colours.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.colours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }

    /// Index of the colour nearest to `value` by squared RGB distance.
    ///
    /// Ties resolve to the lowest index.
    pub fn nearest(&self, value: [f32; 3]) -> usize {
        let mut best = 0;
        let mut best_dist = f32::MAX;

        for (i, c) in self.colours.iter().enumerate() {
            let dr = value[0] - c.r as f32;
            let dg = value[1] - c.g as f32;
            let db = value[2] - c.b as f32;
            let dist = dr * dr + dg * dg + db * db;
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }

        best
    }

    /// One `#RRGGBB` line per entry.
    pub fn to_hex_lines(&self) -> String {
        self.colours
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TryFrom<Vec<Colour>> for Palette {
    type Error = RetroError;

    fn try_from(colours: Vec<Colour>) -> Result<Self> {
        Self::from_colours(colours)
    }
}

impl From<Palette> for Vec<Colour> {
    fn from(palette: Palette) -> Self {
        palette.colours
    }
}
