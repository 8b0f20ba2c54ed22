//! Halftone rendering.
//!
//! The image is tiled into square cells. Each cell gets one shape, filled
//! with the cell's mean luminance on a black background. Shape size does not
//! depend on the luminance; only the fill value does.

use std::fmt;

use clap::ValueEnum;
use image::{GrayImage, Luma, Rgb};
use rand::Rng;
use rayon::prelude::*;

use crate::error::{RetroError, Result};
use crate::filters::seeded_rng;
use crate::render::draw;
use crate::types::{luma, Bitmap};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Shape {
    #[default]
    Circle,
    Square,
    Triangle,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Circle => write!(f, "circle"),
            Shape::Square => write!(f, "square"),
            Shape::Triangle => write!(f, "triangle"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HalftoneOptions {
    pub shape: Shape,
    /// Cell edge in pixels. Must be positive.
    pub cell_size: u32,
    /// Fixed rotation in degrees for squares and triangles.
    pub rotation: f32,
    /// Rotate each shape by a random whole angle in
    /// `[-rotation_threshold, rotation_threshold]` instead.
    pub random_rotation: bool,
    pub rotation_threshold: u32,
    /// Random size change per cell in `[-jitter, jitter]`.
    pub jitter: u32,
    /// Blend 50/50 over the colour original.
    pub overlay: bool,
    pub seed: Option<u64>,
}

impl Default for HalftoneOptions {
    fn default() -> Self {
        Self {
            shape: Shape::Circle,
            cell_size: 16,
            rotation: 0.0,
            random_rotation: false,
            rotation_threshold: 0,
            jitter: 0,
            overlay: false,
            seed: None,
        }
    }
}

/// One planned cell: origin, jittered size and rotation.
#[derive(Debug, Clone, Copy)]
struct Cell {
    x: u32,
    y: u32,
    size: u32,
    angle: f32,
}

fn grayscale(image: &Bitmap) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let p = image.get_pixel(x, y);
        Luma([luma(p[0], p[1], p[2])])
    })
}

fn cell_mean(gray: &GrayImage, cell: &Cell) -> u8 {
    let x2 = (cell.x + cell.size).min(gray.width());
    let y2 = (cell.y + cell.size).min(gray.height());

    let mut sum = 0u64;
    let mut n = 0u64;
    for y in cell.y..y2 {
        for x in cell.x..x2 {
            sum += gray.get_pixel(x, y).0[0] as u64;
            n += 1;
        }
    }
    if n == 0 {
        return 0;
    }
    ((sum as f64 / n as f64).round()) as u8
}

/// Rotate `points` about `centre` by `degrees`, counter-clockwise on screen.
fn rotate(points: &mut [(f32, f32)], centre: (f32, f32), degrees: f32) {
    if degrees == 0.0 {
        return;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    for p in points.iter_mut() {
        let dx = p.0 - centre.0;
        let dy = p.1 - centre.1;
        *p = (centre.0 + cos * dx + sin * dy, centre.1 - sin * dx + cos * dy);
    }
}

/// Render a halftone version of `image`.
pub fn halftone(image: &Bitmap, options: &HalftoneOptions) -> Result<Bitmap> {
    if options.cell_size == 0 {
        return Err(RetroError::config(
            "Halftone cell size must be positive",
            "Use --size 1 or larger",
        ));
    }

    let (w, h) = image.dimensions();
    let size = options.cell_size;
    tracing::debug!(
        width = w,
        height = h,
        shape = %options.shape,
        size,
        jitter = options.jitter,
        overlay = options.overlay,
        "halftone"
    );

    let gray = grayscale(image);
    let mut rng = seeded_rng(options.seed);
    let jitter = options.jitter as i64;
    let threshold = options.rotation_threshold as i64;

    let cells: Vec<Cell> = (0..h)
        .step_by(size as usize)
        .flat_map(|y| (0..w).step_by(size as usize).map(move |x| (x, y)))
        .filter_map(|(x, y)| {
            let adjusted = if jitter > 0 {
                (size as i64 + rng.gen_range(-jitter..=jitter)).max(0) as u32
            } else {
                size
            };
            if adjusted == 0 {
                return None;
            }
            let angle = match options.shape {
                Shape::Circle => 0.0,
                _ if options.random_rotation => rng.gen_range(-threshold..=threshold) as f32,
                _ => options.rotation,
            };
            Some(Cell { x, y, size: adjusted, angle })
        })
        .collect();

    let means: Vec<u8> = cells.par_iter().map(|cell| cell_mean(&gray, cell)).collect();

    let mut layer = GrayImage::new(w, h);
    for (cell, &mean) in cells.iter().zip(&means) {
        let fill = Luma([mean]);
        let (x, y, a) = (cell.x as f32, cell.y as f32, cell.size as f32);
        let centre = (x + size as f32 / 2.0, y + size as f32 / 2.0);

        match options.shape {
            Shape::Circle => draw::fill_circle(
                &mut layer,
                (cell.x + size / 2) as i32,
                (cell.y + size / 2) as i32,
                (cell.size / 2) as i32,
                fill,
            ),
            Shape::Square => {
                let mut quad = [(x, y), (x + a, y), (x + a, y + a), (x, y + a)];
                rotate(&mut quad, centre, cell.angle);
                draw::fill_polygon(&mut layer, &quad, fill);
            }
            Shape::Triangle => {
                let mut tri = [(x, y), (x + a, y), (x, y + a)];
                rotate(&mut tri, centre, cell.angle);
                draw::fill_polygon(&mut layer, &tri, fill);
            }
        }
    }

    Ok(Bitmap::from_fn(w, h, |x, y| {
        let v = layer.get_pixel(x, y).0[0];
        if options.overlay {
            let p = image.get_pixel(x, y);
            Rgb(p.0.map(|c| ((c as u16 + v as u16 + 1) / 2) as u8))
        } else {
            Rgb([v, v, v])
        }
    }))
}
