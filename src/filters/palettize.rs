//! Palettization: remap an image onto an external palette.

use crate::error::{RetroError, Result};
use crate::filters::quantize::{adaptive_palette, QuantizeMethod};
use crate::filters::{dither, extract_palette};
use crate::palettes::PaletteLibrary;
use crate::types::{Bitmap, Palette, MAX_COLOURS};

#[derive(Debug, Clone, PartialEq)]
pub struct PalettizeOptions {
    /// Reduce to 256 colours with `method` before matching.
    pub prequantize: bool,
    pub method: QuantizeMethod,
    pub dither: bool,
}

impl Default for PalettizeOptions {
    fn default() -> Self {
        Self {
            prequantize: false,
            method: QuantizeMethod::FastOctree,
            dither: false,
        }
    }
}

/// Map every pixel to its nearest palette colour.
pub fn palettize(image: &Bitmap, palette: &Palette, options: &PalettizeOptions) -> Bitmap {
    tracing::debug!(
        colours = palette.len(),
        prequantize = options.prequantize,
        method = %options.method,
        dither = options.dither,
        "palettize"
    );

    let source = if options.prequantize {
        match adaptive_palette(image, MAX_COLOURS, options.method, 0) {
            Some(reduced) => dither::nearest_colour(image, &reduced),
            None => image.clone(),
        }
    } else {
        image.clone()
    };

    dither::remap(&source, palette, options.dither)
}

/// Pick the palette for a palettize call.
///
/// A non-empty `reference` (path or library name) wins over `image`. With
/// neither, fails with an input error.
pub fn resolve_palette(
    image: Option<&Bitmap>,
    reference: Option<&str>,
    library: &PaletteLibrary,
) -> Result<Palette> {
    let reference = reference
        .map(|r| r.replace('"', ""))
        .filter(|r| !r.trim().is_empty());

    if let Some(reference) = reference {
        return library.load(&reference);
    }

    match image {
        Some(image) => match Palette::from_bitmap(image) {
            Some(palette) => Ok(palette),
            None => extract_palette(image),
        },
        None => Err(RetroError::Input {
            message: "No palette image or path was specified".to_string(),
            help: Some("Pass --palette <NAME|PATH>".to_string()),
        }),
    }
}
