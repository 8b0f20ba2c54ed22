//! Core domain types for retroize.
//!
//! - `Bitmap` - 8-bit RGB image, the input and output of every filter
//! - `Colour` - RGBA colour values
//! - `Palette` - ordered, duplicate-free colour lists

mod colour;
mod palette;

pub use colour::{luma, Colour};
pub use palette::{Palette, MAX_COLOURS};

/// An 8-bit RGB bitmap.
pub type Bitmap = image::RgbImage;
