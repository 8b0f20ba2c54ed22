//! Image fracturing: repaint an image as flat Voronoi shards.
//!
//! Each bounded region takes the source colour under its centroid. A
//! companion mask marks shard interiors white and borders black (or the
//! reverse), drawn with exactly the same operations as the colour image so
//! both share one partition.

use clap::ValueEnum;
use image::Rgb;

use crate::error::{RetroError, Result};
use crate::filters::seeded_rng;
use crate::render::draw;
use crate::types::{Bitmap, Colour};

use super::{cell_count, random_sites, Diagram, Point};

/// How borders, and shards centred off-canvas, are coloured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BorderStyle {
    #[default]
    Black,
    White,
    /// The custom colour.
    Color,
    /// The source pixel under the point.
    Rgb,
    /// The source pixel with red and blue swapped.
    Bgr,
    /// The inverted source pixel.
    Inverse,
    /// The mean colour of the whole image.
    Average,
    /// The channel mean of the source pixel.
    Grayscale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FractureOptions {
    /// Cell size; the site count is `round(1000 / size)`.
    pub size: f32,
    /// Border line width in pixels.
    pub interstice_width: u32,
    pub border: BorderStyle,
    /// Used by [`BorderStyle::Color`].
    pub custom_colour: Colour,
    /// Black shards on white instead of white on black.
    pub invert_mask: bool,
    pub seed: Option<u64>,
}

impl Default for FractureOptions {
    fn default() -> Self {
        Self {
            size: 0.1,
            interstice_width: 3,
            border: BorderStyle::Black,
            custom_colour: Colour::BLACK,
            invert_mask: false,
            seed: None,
        }
    }
}

/// A fractured image and its shard mask.
#[derive(Debug, Clone, PartialEq)]
pub struct Fracture {
    pub image: Bitmap,
    pub mask: Bitmap,
}

/// Resolves border colours against the source image.
struct BorderPainter<'a> {
    image: &'a Bitmap,
    style: BorderStyle,
    custom: Colour,
    average: Colour,
}

impl<'a> BorderPainter<'a> {
    fn new(image: &'a Bitmap, style: BorderStyle, custom: Colour) -> Self {
        let average = if style == BorderStyle::Average {
            mean_colour(image)
        } else {
            Colour::BLACK
        };
        Self {
            image,
            style,
            custom,
            average,
        }
    }

    fn sample(&self, (x, y): Point) -> Colour {
        let (w, h) = self.image.dimensions();
        let x = (x as i64).clamp(0, w as i64 - 1) as u32;
        let y = (y as i64).clamp(0, h as i64 - 1) as u32;
        Colour::from(*self.image.get_pixel(x, y))
    }

    fn colour_at(&self, point: Point) -> Colour {
        match self.style {
            BorderStyle::Black => Colour::BLACK,
            BorderStyle::White => Colour::WHITE,
            BorderStyle::Color => self.custom,
            BorderStyle::Average => self.average,
            BorderStyle::Rgb => self.sample(point),
            BorderStyle::Bgr => self.sample(point).swap_rb(),
            BorderStyle::Inverse => self.sample(point).inverse(),
            BorderStyle::Grayscale => {
                let c = self.sample(point);
                Colour::gray(((c.r as u32 + c.g as u32 + c.b as u32) / 3) as u8)
            }
        }
    }
}

fn mean_colour(image: &Bitmap) -> Colour {
    let n = (image.width() as u64 * image.height() as u64).max(1);
    let mut sum = [0u64; 3];
    for p in image.pixels() {
        for c in 0..3 {
            sum[c] += p[c] as u64;
        }
    }
    Colour::rgb((sum[0] / n) as u8, (sum[1] / n) as u8, (sum[2] / n) as u8)
}

/// Fracture `image` into Voronoi shards.
pub fn fracture(image: &Bitmap, options: &FractureOptions) -> Result<Fracture> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return Err(RetroError::Input {
            message: "Cannot fracture an empty image".to_string(),
            help: None,
        });
    }
    let count = cell_count(options.size)?;
    tracing::debug!(
        width = w,
        height = h,
        cells = count,
        border = ?options.border,
        invert_mask = options.invert_mask,
        "fracture"
    );

    let mut rng = seeded_rng(options.seed);
    let sites = random_sites(w as f64, h as f64, count, &mut rng);
    let diagram = Diagram::new(&sites, w as f64, h as f64);
    let painter = BorderPainter::new(image, options.border, options.custom_colour);

    let (on, off) = if options.invert_mask {
        (Rgb([0, 0, 0]), Rgb([255, 255, 255]))
    } else {
        (Rgb([255, 255, 255]), Rgb([0, 0, 0]))
    };

    let mut shards = Bitmap::new(w, h);
    let mut mask = Bitmap::from_pixel(w, h, off);

    for region in diagram.bounded() {
        let polygon = region.polygon();
        let (cx, cy) = region.centroid();

        let fill = if cx >= 0.0 && cy >= 0.0 && cx < w as f64 && cy < h as f64 {
            *image.get_pixel(cx as u32, cy as u32)
        } else {
            painter.colour_at((cx, cy)).to_rgb()
        };

        draw::fill_polygon(&mut shards, &polygon, fill);
        draw::fill_polygon(&mut mask, &polygon, on);

        for (a, b) in region.edges() {
            let midpoint = ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
            let line = painter.colour_at(midpoint).to_rgb();
            let (a, b) = ((a.0 as f32, a.1 as f32), (b.0 as f32, b.1 as f32));
            draw::draw_line(&mut shards, a, b, options.interstice_width, line);
            draw::draw_line(&mut mask, a, b, options.interstice_width, off);
        }
    }

    Ok(Fracture {
        image: shards,
        mask,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> Bitmap {
        Bitmap::from_fn(120, 90, |x, y| Rgb([(x * 2) as u8, (y * 2) as u8, 100]))
    }

    fn opts(border: BorderStyle) -> FractureOptions {
        FractureOptions {
            size: 20.0,
            interstice_width: 2,
            border,
            custom_colour: Colour::rgb(255, 0, 255),
            invert_mask: false,
            seed: Some(42),
        }
    }

    #[test]
    fn test_mask_and_image_share_partition() {
        let green = Rgb([10, 200, 30]);
        let magenta = Rgb([255, 0, 255]);
        let img = Bitmap::from_pixel(120, 90, green);
        let out = fracture(&img, &opts(BorderStyle::Color)).unwrap();

        assert_eq!(out.image.dimensions(), out.mask.dimensions());
        let mut shard_pixels = 0;
        for (p, m) in out.image.pixels().zip(out.mask.pixels()) {
            if m.0 == [255, 255, 255] {
                assert!(*p == green || *p == magenta);
                shard_pixels += 1;
            } else {
                assert_eq!(m.0, [0, 0, 0]);
                assert!(*p == magenta || p.0 == [0, 0, 0]);
            }
            if *p == green {
                assert_eq!(m.0, [255, 255, 255]);
            }
        }
        assert!(shard_pixels > 0);
    }

    #[test]
    fn test_invert_mask_swaps_colours() {
        let img = gradient();
        let plain = fracture(&img, &opts(BorderStyle::Black)).unwrap();
        let inverted = fracture(&img, &FractureOptions { invert_mask: true, ..opts(BorderStyle::Black) }).unwrap();

        assert_eq!(plain.image, inverted.image);
        for (a, b) in plain.mask.pixels().zip(inverted.mask.pixels()) {
            assert_eq!(a.0.map(|c| 255 - c), b.0);
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let img = gradient();
        let a = fracture(&img, &opts(BorderStyle::Inverse)).unwrap();
        let b = fracture(&img, &opts(BorderStyle::Inverse)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_border_colours() {
        let img = Bitmap::from_fn(4, 2, |x, _| if x < 2 { Rgb([10, 20, 30]) } else { Rgb([50, 60, 70]) });
        let paint = |style| BorderPainter::new(&img, style, Colour::rgb(1, 2, 3));

        assert_eq!(paint(BorderStyle::Black).colour_at((0.0, 0.0)), Colour::BLACK);
        assert_eq!(paint(BorderStyle::White).colour_at((0.0, 0.0)), Colour::WHITE);
        assert_eq!(paint(BorderStyle::Color).colour_at((0.0, 0.0)), Colour::rgb(1, 2, 3));
        assert_eq!(paint(BorderStyle::Average).colour_at((0.0, 0.0)), Colour::rgb(30, 40, 50));
        assert_eq!(paint(BorderStyle::Rgb).colour_at((-5.0, 9.0)), Colour::rgb(10, 20, 30));
        assert_eq!(paint(BorderStyle::Bgr).colour_at((3.5, 0.0)), Colour::rgb(70, 60, 50));
        assert_eq!(paint(BorderStyle::Inverse).colour_at((0.0, 0.0)), Colour::rgb(245, 235, 225));
        assert_eq!(paint(BorderStyle::Grayscale).colour_at((99.0, 0.0)), Colour::gray(60));
    }

    #[test]
    fn test_border_styles_parse_from_cli_values() {
        assert_eq!(BorderStyle::from_str("inverse", true), Ok(BorderStyle::Inverse));
        assert_eq!(BorderStyle::from_str("grayscale", true), Ok(BorderStyle::Grayscale));
    }

    #[test]
    fn test_empty_image_rejected() {
        let err = fracture(&Bitmap::new(0, 0), &FractureOptions::default()).unwrap_err();
        assert!(matches!(err, RetroError::Input { .. }));
    }
}
