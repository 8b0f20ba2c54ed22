//! Palette storage on disk.

mod library;

pub use library::{
    increment_filename, load_palette_file, numberize_filename, PaletteLibrary, NUMBER_TOKEN,
};
