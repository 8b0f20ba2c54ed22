//! Colour quantization: reduce an image to at most N colours.
//!
//! Three methods choose the palette:
//!
//! - **Median cut** splits the most populated colour box.
//! - **Max coverage** splits the box spanning the most colour space.
//! - **Fast octree** keeps the most populated 4-bit colour cubes.
//!
//! The chosen palette can be refined with k-means. When dithering, the
//! palette comes from a clean, undithered pass first so diffusion noise does
//! not bias the colour selection.

mod kmeans;
mod median_cut;
mod octree;

use std::collections::HashMap;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::filters::{dither, extract_palette};
use crate::types::{Bitmap, Colour, Palette, MAX_COLOURS};

use median_cut::SplitRule;

/// A distinct colour and how many pixels carry it.
pub(super) type HistEntry = ([u8; 3], u32);

/// Palette selection strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuantizeMethod {
    #[default]
    MedianCut,
    MaxCoverage,
    FastOctree,
}

impl fmt::Display for QuantizeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantizeMethod::MedianCut => write!(f, "median-cut"),
            QuantizeMethod::MaxCoverage => write!(f, "max-coverage"),
            QuantizeMethod::FastOctree => write!(f, "fast-octree"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuantizeOptions {
    /// Target colour count, clamped to 1..=256.
    pub colors: usize,
    pub method: QuantizeMethod,
    /// K-means refinement rounds; 0 disables refinement.
    pub kmeans: u32,
    pub dither: bool,
}

impl Default for QuantizeOptions {
    fn default() -> Self {
        Self {
            colors: 64,
            method: QuantizeMethod::MedianCut,
            kmeans: 0,
            dither: true,
        }
    }
}

/// Count distinct colours, sorted by colour for deterministic results.
pub(super) fn histogram(image: &Bitmap) -> Vec<HistEntry> {
    let mut counts: HashMap<[u8; 3], u32> = HashMap::new();
    for px in image.pixels() {
        *counts.entry(px.0).or_insert(0) += 1;
    }
    let mut hist: Vec<HistEntry> = counts.into_iter().collect();
    hist.sort_unstable_by_key(|(colour, _)| *colour);
    hist
}

/// Choose up to `colors` representative colours for an image.
///
/// Images that already have no more than `colors` distinct colours keep them
/// all, most common first. Returns `None` for an empty image.
pub fn adaptive_palette(
    image: &Bitmap,
    colors: usize,
    method: QuantizeMethod,
    kmeans: u32,
) -> Option<Palette> {
    let colors = colors.clamp(1, MAX_COLOURS);
    let hist = histogram(image);
    if hist.is_empty() {
        return None;
    }

    let chosen: Vec<Colour> = if hist.len() <= colors {
        let mut exact = hist.clone();
        exact.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        exact.into_iter().map(|(c, _)| c.into()).collect()
    } else {
        match method {
            QuantizeMethod::MedianCut => median_cut::median_cut(&hist, colors, SplitRule::Population),
            QuantizeMethod::MaxCoverage => median_cut::median_cut(&hist, colors, SplitRule::Volume),
            QuantizeMethod::FastOctree => octree::fast_octree(&hist, colors),
        }
    };

    let palette = Palette::from_colours(chosen).ok()?;
    if kmeans == 0 {
        return Some(palette);
    }
    Palette::from_colours(kmeans::refine(&hist, &palette, kmeans)).ok()
}

/// Reduce an image to at most `options.colors` colours.
pub fn quantize(image: &Bitmap, options: &QuantizeOptions) -> Bitmap {
    let colors = options.colors.clamp(1, MAX_COLOURS);
    tracing::debug!(
        colors,
        method = %options.method,
        kmeans = options.kmeans,
        dither = options.dither,
        "quantize"
    );

    if !options.dither {
        return match adaptive_palette(image, colors, options.method, options.kmeans) {
            Some(palette) => dither::nearest_colour(image, &palette),
            None => image.clone(),
        };
    }

    let Some(clean) = adaptive_palette(image, colors, options.method, 0) else {
        return image.clone();
    };
    let flat = dither::nearest_colour(image, &clean);
    let Ok(extracted) = extract_palette(&flat) else {
        return image.clone();
    };

    let palette = if options.kmeans > 0 {
        let refined = kmeans::refine(&histogram(image), &extracted, options.kmeans);
        Palette::from_colours(refined).unwrap_or(extracted)
    } else {
        extracted
    };

    dither::floyd_steinberg(image, &palette)
}
