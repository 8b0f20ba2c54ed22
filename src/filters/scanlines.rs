//! Simple scan line overlay.

use rand::Rng;

use crate::error::{RetroError, Result};
use crate::filters::seeded_rng;
use crate::types::{Bitmap, Colour};

#[derive(Debug, Clone, PartialEq)]
pub struct ScanlineOptions {
    /// Line thickness in pixels.
    pub line_size: u32,
    /// Distance from one line to the next.
    pub line_spacing: u32,
    /// Line colour; alpha sets the opacity.
    pub colour: Colour,
    pub size_jitter: u32,
    pub space_jitter: u32,
    pub vertical: bool,
    pub seed: Option<u64>,
}

impl Default for ScanlineOptions {
    fn default() -> Self {
        Self {
            line_size: 1,
            line_spacing: 4,
            colour: Colour::BLACK,
            size_jitter: 0,
            space_jitter: 0,
            vertical: false,
            seed: None,
        }
    }
}

/// `v` jittered by a uniform offset in `[-jitter, jitter]`.
fn jittered(rng: &mut impl Rng, v: u32, jitter: u32) -> f32 {
    if jitter == 0 {
        return v as f32;
    }
    let j = jitter as f32;
    v as f32 + rng.gen_range(-j..=j)
}

/// Overlay evenly spaced lines.
///
/// The first line sits one spacing in from the edge. Each band covers its
/// start row plus `size` more, and bands are composited with the colour's
/// alpha.
pub fn scanlines(image: &Bitmap, options: &ScanlineOptions) -> Result<Bitmap> {
    if options.line_size == 0 || options.line_spacing == 0 {
        return Err(RetroError::config(
            "Scan line size and spacing must be positive",
            "Use --size 1 or larger and --spacing 1 or larger",
        ));
    }

    let (w, h) = image.dimensions();
    tracing::debug!(
        width = w,
        height = h,
        size = options.line_size,
        spacing = options.line_spacing,
        vertical = options.vertical,
        "scanlines"
    );

    let extent = if options.vertical { w } else { h };
    let mut covered = vec![false; extent as usize];
    let mut rng = seeded_rng(options.seed);

    let mut pos = 0i64;
    while pos < extent as i64 {
        let size = jittered(&mut rng, options.line_size, options.size_jitter).max(0.0) as i64;
        let step = jittered(&mut rng, options.line_spacing, options.space_jitter) as i64;
        pos += step.max(1);

        if pos < extent as i64 {
            let end = (pos + size).min(extent as i64 - 1);
            for i in pos..=end {
                covered[i as usize] = true;
            }
        }
    }

    let alpha = options.colour.a as u32;
    let line = [options.colour.r, options.colour.g, options.colour.b];

    let mut out = image.clone();
    for (x, y, px) in out.enumerate_pixels_mut() {
        let i = if options.vertical { x } else { y };
        if !covered[i as usize] {
            continue;
        }
        for c in 0..3 {
            let blended = (line[c] as u32 * alpha + px[c] as u32 * (255 - alpha) + 127) / 255;
            px[c] = blended as u8;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn white(w: u32, h: u32) -> Bitmap {
        Bitmap::from_pixel(w, h, Rgb([255, 255, 255]))
    }

    fn dark_rows(img: &Bitmap) -> Vec<u32> {
        (0..img.height()).filter(|&y| img.get_pixel(0, y).0 == [0, 0, 0]).collect()
    }

    #[test]
    fn test_horizontal_pattern() {
        let out = scanlines(&white(4, 12), &ScanlineOptions::default()).unwrap();
        assert_eq!(dark_rows(&out), vec![4, 5, 8, 9]);
    }

    #[test]
    fn test_vertical_lines_run_down_columns() {
        let opts = ScanlineOptions { vertical: true, line_spacing: 3, ..Default::default() };
        let out = scanlines(&white(8, 3), &opts).unwrap();
        for y in 0..3 {
            assert_eq!(out.get_pixel(3, y).0, [0, 0, 0]);
            assert_eq!(out.get_pixel(0, y).0, [255, 255, 255]);
        }
    }

    #[test]
    fn test_alpha_blends() {
        let opts = ScanlineOptions { colour: Colour::new(0, 0, 0, 128), line_spacing: 1, ..Default::default() };
        let out = scanlines(&white(2, 3), &opts).unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(out.get_pixel(0, 1).0, [127, 127, 127]);
    }

    #[test]
    fn test_zero_size_or_spacing_rejected() {
        for opts in [
            ScanlineOptions { line_size: 0, ..Default::default() },
            ScanlineOptions { line_spacing: 0, ..Default::default() },
        ] {
            let err = scanlines(&white(4, 4), &opts).unwrap_err();
            assert!(matches!(err, RetroError::Configuration { .. }));
        }
    }

    #[test]
    fn test_seeded_jitter_is_reproducible() {
        let opts = ScanlineOptions { size_jitter: 2, space_jitter: 3, seed: Some(11), ..Default::default() };
        let img = white(16, 64);
        assert_eq!(scanlines(&img, &opts).unwrap(), scanlines(&img, &opts).unwrap());
    }
}
