//! retroize - Retro image filters
//!
//! A library of old-school image effects: palette extraction, adaptive
//! quantization, palettization, Floyd-Steinberg dithering, pixelization,
//! halftoning, Voronoi cells and fracture, CRT emulation and scan lines.

pub mod cli;
pub mod config;
pub mod error;
pub mod filters;
pub mod output;
pub mod palettes;
pub mod render;
pub mod store;
pub mod types;

pub use config::Config;
pub use error::{RetroError, Result};
pub use filters::{
    crt_emulate, ditherize_1bit, ditherize_palette, extract_palette, fracture, halftone,
    palettize, pixelize, quantize, retroize, scanlines, voronoi_cells, CrtParams,
    HalftoneOptions, PalettizeOptions, QuantizeMethod, QuantizeOptions, RetroizeOptions,
    ScanlineOptions, VoronoiCellOptions,
};
pub use palettes::PaletteLibrary;
pub use store::{FsImageStore, ImageStore, MemoryStore, SavedImage};
pub use types::{Bitmap, Colour, Palette};
