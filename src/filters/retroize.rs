//! The combined retro pipeline.

use crate::filters::dither::ditherize_palette;
use crate::filters::palettize::{palettize, PalettizeOptions};
use crate::filters::pixelize::pixelize;
use crate::filters::quantize::{quantize, QuantizeMethod, QuantizeOptions};
use crate::types::{Bitmap, Palette};

#[derive(Debug, Clone, PartialEq)]
pub struct RetroizeOptions {
    /// Pixelize factor, clamped to 1..=30.
    pub downsample: u32,
    /// Scale back up to the input size after pixelizing.
    pub upsample: bool,
    /// Remap onto this palette after pixelizing.
    pub palette: Option<Palette>,
    /// Quantize to this many colours.
    pub colors: Option<usize>,
    /// Finish with a web-palette dither.
    pub dither: bool,
}

impl Default for RetroizeOptions {
    fn default() -> Self {
        Self {
            downsample: 4,
            upsample: true,
            palette: None,
            colors: None,
            dither: false,
        }
    }
}

/// Pixelize, then palettize, then quantize, then dither.
///
/// The palette and quantize stages run only when configured; neither
/// dithers, so the final dither stage is the only diffusion.
pub fn retroize(image: &Bitmap, options: &RetroizeOptions) -> Bitmap {
    tracing::debug!(
        downsample = options.downsample,
        upsample = options.upsample,
        palette = options.palette.as_ref().map(Palette::len),
        colors = options.colors,
        dither = options.dither,
        "retroize"
    );

    let mut out = pixelize(image, options.downsample, options.upsample);

    if let Some(palette) = &options.palette {
        out = palettize(&out, palette, &PalettizeOptions::default());
    }

    if let Some(colors) = options.colors {
        let quantize_options = QuantizeOptions {
            colors,
            method: QuantizeMethod::MedianCut,
            kmeans: 0,
            dither: false,
        };
        out = quantize(&out, &quantize_options);
    }

    if options.dither {
        out = ditherize_palette(&out);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Colour;
    use image::Rgb;
    use std::collections::HashSet;

    fn photo() -> Bitmap {
        Bitmap::from_fn(40, 24, |x, y| Rgb([(x * 6) as u8, (y * 10) as u8, ((x + y) * 3) as u8]))
    }

    #[test]
    fn test_defaults_only_pixelize() {
        let img = photo();
        assert_eq!(retroize(&img, &RetroizeOptions::default()), pixelize(&img, 4, true));
    }

    #[test]
    fn test_palette_stage_limits_colours() {
        let palette = Palette::from_colours([Colour::BLACK, Colour::WHITE, Colour::rgb(200, 40, 40)]).unwrap();
        let out = retroize(
            &photo(),
            &RetroizeOptions { palette: Some(palette.clone()), ..Default::default() },
        );
        let allowed: HashSet<[u8; 3]> = palette.colours().iter().map(|c| [c.r, c.g, c.b]).collect();
        assert!(out.pixels().all(|p| allowed.contains(&p.0)));
    }

    #[test]
    fn test_colour_stage_and_dither() {
        let out = retroize(&photo(), &RetroizeOptions { colors: Some(4), ..Default::default() });
        let distinct: HashSet<_> = out.pixels().map(|p| p.0).collect();
        assert!(distinct.len() <= 4);

        let dithered = retroize(&photo(), &RetroizeOptions { dither: true, ..Default::default() });
        assert!(dithered.pixels().all(|p| p.0.iter().all(|c| c % 51 == 0)));
        assert_eq!(dithered.dimensions(), (40, 24));
    }
}
