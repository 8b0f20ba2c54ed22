//! Palette extraction.

use crate::error::{RetroError, Result};
use crate::filters::quantize::{adaptive_palette, QuantizeMethod};
use crate::types::{Bitmap, Palette, MAX_COLOURS};

/// Extract a duplicate-free palette of at most 256 colours from an image.
///
/// The image is reduced with the adaptive median-cut quantizer and its
/// colour table is returned in index order. Only an empty image fails.
pub fn extract_palette(image: &Bitmap) -> Result<Palette> {
    tracing::debug!(width = image.width(), height = image.height(), "extract palette");

    adaptive_palette(image, MAX_COLOURS, QuantizeMethod::MedianCut, 0).ok_or_else(|| {
        RetroError::Input {
            message: "Cannot extract a palette from an empty image".to_string(),
            help: None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::collections::HashSet;

    #[test]
    fn test_small_image_keeps_every_colour() {
        let img = Bitmap::from_fn(3, 2, |x, _| Rgb([x as u8 * 100, 0, 0]));
        let palette = extract_palette(&img).unwrap();
        assert_eq!(palette.len(), 3);
    }

    #[test]
    fn test_bounded_and_unique() {
        let img = Bitmap::from_fn(64, 64, |x, y| Rgb([(x * 4) as u8, (y * 4) as u8, ((x ^ y) * 3) as u8]));
        let palette = extract_palette(&img).unwrap();
        assert!(palette.len() <= MAX_COLOURS);
        let unique: HashSet<_> = palette.colours().iter().collect();
        assert_eq!(unique.len(), palette.len());
    }

    #[test]
    fn test_empty_image_fails() {
        assert!(extract_palette(&Bitmap::new(0, 0)).is_err());
    }
}
