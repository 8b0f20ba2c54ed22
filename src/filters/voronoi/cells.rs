//! Standalone Voronoi cell images.

use std::fmt;

use clap::ValueEnum;
use image::Rgb;
use rand::Rng;

use crate::error::{RetroError, Result};
use crate::filters::seeded_rng;
use crate::render::draw;
use crate::types::{luma, Bitmap};

use super::{cell_count, random_sites, Diagram};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum CellStyle {
    /// White cells.
    White,
    /// A random colour per cell.
    Color,
    /// A random colour per cell, reduced to gray.
    #[default]
    Grayscale,
}

impl fmt::Display for CellStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellStyle::White => write!(f, "white"),
            CellStyle::Color => write!(f, "color"),
            CellStyle::Grayscale => write!(f, "grayscale"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiCellOptions {
    /// Canvas width, rounded down to a multiple of 8.
    pub width: u32,
    /// Canvas height, rounded down to a multiple of 8.
    pub height: u32,
    /// Cell size; the site count is `round(1000 / size)`.
    pub size: f32,
    /// Border line width in pixels.
    pub interstice_width: u32,
    pub style: CellStyle,
    pub invert: bool,
    pub seed: Option<u64>,
}

impl Default for VoronoiCellOptions {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            size: 0.1,
            interstice_width: 3,
            style: CellStyle::Grayscale,
            invert: false,
            seed: None,
        }
    }
}

fn trim_to_8(v: u32) -> u32 {
    v - v % 8
}

/// Draw a fresh Voronoi cell image.
pub fn voronoi_cells(options: &VoronoiCellOptions) -> Result<Bitmap> {
    let (w, h) = (trim_to_8(options.width), trim_to_8(options.height));
    if w == 0 || h == 0 {
        return Err(RetroError::config(
            format!("Canvas {}x{} is smaller than 8x8", options.width, options.height),
            "Width and height are rounded down to multiples of 8",
        ));
    }
    let count = cell_count(options.size)?;
    tracing::debug!(width = w, height = h, cells = count, style = %options.style, "voronoi cells");

    let mut rng = seeded_rng(options.seed);
    let sites = random_sites(w as f64, h as f64, count, &mut rng);
    let diagram = Diagram::new(&sites, w as f64, h as f64);

    let black = Rgb([0, 0, 0]);
    let mut canvas = Bitmap::from_pixel(w, h, black);

    for region in diagram.bounded() {
        let fill = match options.style {
            CellStyle::White => Rgb([255, 255, 255]),
            CellStyle::Color | CellStyle::Grayscale => {
                Rgb([rng.gen_range(0..255), rng.gen_range(0..255), rng.gen_range(0..255)])
            }
        };

        draw::fill_polygon(&mut canvas, &region.polygon(), fill);
        for (a, b) in region.edges() {
            let (a, b) = ((a.0 as f32, a.1 as f32), (b.0 as f32, b.1 as f32));
            draw::draw_line(&mut canvas, a, b, 1, black);
            draw::draw_line(&mut canvas, a, b, options.interstice_width, black);
        }
    }

    if options.style == CellStyle::Grayscale {
        for px in canvas.pixels_mut() {
            let v = luma(px[0], px[1], px[2]);
            *px = Rgb([v, v, v]);
        }
    }
    if options.invert {
        for px in canvas.pixels_mut() {
            *px = Rgb(px.0.map(|c| 255 - c));
        }
    }

    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> VoronoiCellOptions {
        VoronoiCellOptions {
            width: 100,
            height: 61,
            size: 40.0,
            interstice_width: 1,
            style: CellStyle::White,
            invert: false,
            seed: Some(5),
        }
    }

    #[test]
    fn test_dimensions_trimmed_to_multiples_of_8() {
        let out = voronoi_cells(&opts()).unwrap();
        assert_eq!(out.dimensions(), (96, 56));
    }

    #[test]
    fn test_white_style_is_black_and_white() {
        let out = voronoi_cells(&opts()).unwrap();
        let white = out.pixels().filter(|p| p.0 == [255, 255, 255]).count();
        assert!(white > 0);
        assert!(out.pixels().all(|p| p.0 == [255, 255, 255] || p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_grayscale_style_is_gray() {
        let out = voronoi_cells(&VoronoiCellOptions { style: CellStyle::Grayscale, ..opts() }).unwrap();
        assert!(out.pixels().all(|p| p[0] == p[1] && p[1] == p[2]));
    }

    #[test]
    fn test_invert_flips_every_pixel() {
        let plain = voronoi_cells(&VoronoiCellOptions { style: CellStyle::Color, ..opts() }).unwrap();
        let inverted =
            voronoi_cells(&VoronoiCellOptions { style: CellStyle::Color, invert: true, ..opts() }).unwrap();
        for (a, b) in plain.pixels().zip(inverted.pixels()) {
            assert_eq!(a.0.map(|c| 255 - c), b.0);
        }
    }

    #[test]
    fn test_cell_styles_parse_from_cli_values() {
        assert_eq!(CellStyle::from_str("color", true), Ok(CellStyle::Color));
        assert_eq!(CellStyle::from_str("white", true), Ok(CellStyle::White));
        assert!(CellStyle::from_str("sepia", true).is_err());
    }

    #[test]
    fn test_too_small_canvas_rejected() {
        let err = voronoi_cells(&VoronoiCellOptions { width: 7, ..opts() }).unwrap_err();
        assert!(matches!(err, RetroError::Configuration { .. }));
    }

    #[test]
    fn test_bad_size_rejected() {
        let err = voronoi_cells(&VoronoiCellOptions { size: 0.0, ..opts() }).unwrap_err();
        assert!(matches!(err, RetroError::Configuration { .. }));
    }
}
