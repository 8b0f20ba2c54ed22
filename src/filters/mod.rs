//! Image filters.
//!
//! Every filter is a free function taking a source bitmap and an options
//! struct and returning a new bitmap. Filters that reject parameters return
//! `Result`; the rest clamp silently.
//!
//! - `extract` - palette extraction
//! - `quantize` - adaptive colour reduction
//! - `palettize` - remap onto an external palette
//! - `dither` - 1-bit and web-palette Floyd-Steinberg
//! - `pixelize` - box downsample, nearest upsample
//! - `halftone` - luminance-filled shapes per cell
//! - `voronoi` - cell images and image fracture
//! - `crt` - curved screen emulation
//! - `scanlines` - plain line overlay
//! - `retroize` - the combined pipeline

pub mod crt;
pub mod dither;
pub mod extract;
pub mod halftone;
pub mod palettize;
pub mod pixelize;
pub mod quantize;
pub mod retroize;
pub mod scanlines;
pub mod voronoi;

use rand::rngs::StdRng;
use rand::SeedableRng;

pub use crt::{crt_emulate, CrtParams};
pub use dither::{ditherize_1bit, ditherize_palette, floyd_steinberg, web_palette};
pub use extract::extract_palette;
pub use halftone::{halftone, HalftoneOptions, Shape};
pub use palettize::{palettize, resolve_palette, PalettizeOptions};
pub use pixelize::pixelize;
pub use quantize::{adaptive_palette, quantize, QuantizeMethod, QuantizeOptions};
pub use retroize::{retroize, RetroizeOptions};
pub use scanlines::{scanlines, ScanlineOptions};
pub use voronoi::{
    fracture, voronoi_cells, BorderStyle, CellStyle, Fracture, FractureOptions, VoronoiCellOptions,
};

/// A reproducible generator when seeded, an entropy-seeded one otherwise.
pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
