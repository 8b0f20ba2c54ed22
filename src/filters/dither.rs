//! Floyd-Steinberg error diffusion, 1-bit and fixed-palette dithering, and
//! nearest-colour remapping.
//!
//! Error diffusion walks the image left-to-right, top-to-bottom. After each
//! pixel is quantized the error is spread to the unvisited neighbours:
//!
//! ```text
//!        *   7/16
//!  3/16 5/16 1/16
//! ```
//!
//! The accumulated value is clamped to `[0, 255]` before the output is
//! chosen, so the result is a pure function of the input.

use image::Rgb;
use rayon::prelude::*;

use crate::types::{luma, Bitmap, Colour, Palette};

/// Neighbour offsets and weights for Floyd-Steinberg.
const FS_WEIGHTS: [(isize, isize, f32); 4] = [
    (1, 0, 7.0 / 16.0),
    (-1, 1, 3.0 / 16.0),
    (0, 1, 5.0 / 16.0),
    (1, 1, 1.0 / 16.0),
];

/// Channel levels of the 216-colour web-safe palette.
const WEB_STEP: f32 = 51.0;

/// Luma threshold for 1-bit conversion.
const THRESHOLD: u8 = 128;

/// Diffuse quantization error over a row-major buffer of `N`-channel values.
///
/// `choose` maps a clamped value to its quantized output. Strictly
/// sequential: each pixel depends on the error of every earlier one.
fn diffuse<const N: usize>(
    mut buf: Vec<[f32; N]>,
    width: usize,
    mut choose: impl FnMut([f32; N]) -> [u8; N],
) -> Vec<[u8; N]> {
    if width == 0 {
        return Vec::new();
    }
    let height = buf.len() / width;
    let mut out = vec![[0u8; N]; buf.len()];

    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            let mut value = buf[i];
            for v in value.iter_mut() {
                *v = v.clamp(0.0, 255.0);
            }

            let chosen = choose(value);
            out[i] = chosen;

            let mut err = [0.0f32; N];
            for c in 0..N {
                err[c] = value[c] - chosen[c] as f32;
            }

            for (dx, dy, weight) in FS_WEIGHTS {
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if nx < 0 || nx >= width as isize || ny >= height as isize {
                    continue;
                }
                let n = ny as usize * width + nx as usize;
                for c in 0..N {
                    buf[n][c] += err[c] * weight;
                }
            }
        }
    }

    out
}

fn rgb_values(image: &Bitmap) -> Vec<[f32; 3]> {
    image
        .pixels()
        .map(|p| [p[0] as f32, p[1] as f32, p[2] as f32])
        .collect()
}

fn from_rgb_values(width: u32, height: u32, values: &[[u8; 3]]) -> Bitmap {
    Bitmap::from_fn(width, height, |x, y| Rgb(values[(y * width + x) as usize]))
}

/// Floyd-Steinberg dither onto an arbitrary palette.
pub fn floyd_steinberg(image: &Bitmap, palette: &Palette) -> Bitmap {
    let (w, h) = image.dimensions();
    let out = diffuse(rgb_values(image), w as usize, |value| {
        let c = palette.colours()[palette.nearest(value)];
        [c.r, c.g, c.b]
    });
    from_rgb_values(w, h, &out)
}

/// Map every pixel to its nearest palette colour without diffusion.
///
/// Rows are processed in parallel; the mapping is per-pixel and
/// order-independent.
pub fn nearest_colour(image: &Bitmap, palette: &Palette) -> Bitmap {
    let mut out = image.clone();
    let stride = image.width() as usize * 3;
    if stride == 0 {
        return out;
    }

    out.par_chunks_mut(stride).for_each(|row| {
        for px in row.chunks_exact_mut(3) {
            let c = palette.colours()[palette.nearest([px[0] as f32, px[1] as f32, px[2] as f32])];
            px.copy_from_slice(&[c.r, c.g, c.b]);
        }
    });

    out
}

/// Remap onto a palette, with or without Floyd-Steinberg diffusion.
pub fn remap(image: &Bitmap, palette: &Palette, dither: bool) -> Bitmap {
    if dither {
        floyd_steinberg(image, palette)
    } else {
        nearest_colour(image, palette)
    }
}

/// Crush an image to black and white.
///
/// Pixels are converted to luma first. With `dither` the luma channel is
/// error-diffused, otherwise values at or above 128 become white.
pub fn ditherize_1bit(image: &Bitmap, dither: bool) -> Bitmap {
    let (w, h) = image.dimensions();
    tracing::debug!(width = w, height = h, dither, "ditherize 1-bit");

    let gray: Vec<[f32; 1]> = image
        .pixels()
        .map(|p| [luma(p[0], p[1], p[2]) as f32])
        .collect();

    let bits: Vec<[u8; 1]> = if dither {
        diffuse(gray, w as usize, |[v]| [if v >= THRESHOLD as f32 { 255 } else { 0 }])
    } else {
        gray.iter()
            .map(|&[v]| [if v >= THRESHOLD as f32 { 255 } else { 0 }])
            .collect()
    };

    Bitmap::from_fn(w, h, |x, y| {
        let v = bits[(y * w + x) as usize][0];
        Rgb([v, v, v])
    })
}

/// Dither onto the fixed 216-colour web-safe palette.
pub fn ditherize_palette(image: &Bitmap) -> Bitmap {
    let (w, h) = image.dimensions();
    tracing::debug!(width = w, height = h, "ditherize to web palette");

    let out = diffuse(rgb_values(image), w as usize, |value| {
        value.map(|v| ((v / WEB_STEP).round() * WEB_STEP) as u8)
    });
    from_rgb_values(w, h, &out)
}

/// The 216-colour web-safe palette, red varying slowest.
pub fn web_palette() -> Palette {
    let levels = || (0..6u8).map(|i| i * WEB_STEP as u8);
    let colours = levels()
        .flat_map(move |r| levels().flat_map(move |g| levels().map(move |b| Colour::rgb(r, g, b))))
        .collect();
    Palette::from_unique(colours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn gradient(w: u32, h: u32) -> Bitmap {
        Bitmap::from_fn(w, h, |x, y| {
            Rgb([(x * 255 / w.max(1)) as u8, (y * 255 / h.max(1)) as u8, ((x + y) * 7 % 256) as u8])
        })
    }

    #[test]
    fn test_1bit_outputs_only_black_and_white() {
        let img = gradient(32, 16);
        for dither in [true, false] {
            let out = ditherize_1bit(&img, dither);
            assert_eq!(out.dimensions(), img.dimensions());
            for p in out.pixels() {
                assert!(p.0 == [0, 0, 0] || p.0 == [255, 255, 255]);
            }
        }
    }

    #[test]
    fn test_1bit_threshold_without_dither() {
        let img = Bitmap::from_fn(2, 1, |x, _| if x == 0 { Rgb([127, 127, 127]) } else { Rgb([128, 128, 128]) });
        let out = ditherize_1bit(&img, false);
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(out.get_pixel(1, 0).0, [255, 255, 255]);
    }

    #[test]
    fn test_1bit_dither_preserves_mean_gray() {
        let img = Bitmap::from_pixel(64, 64, Rgb([128, 128, 128]));
        let out = ditherize_1bit(&img, true);
        let white = out.pixels().filter(|p| p.0[0] == 255).count();
        let ratio = white as f32 / (64.0 * 64.0);
        assert!((ratio - 0.5).abs() < 0.05, "white ratio {}", ratio);
    }

    #[test]
    fn test_error_goes_right_first() {
        // 100 -> 0 leaves +100 error; 7/16 of it lands on the right pixel
        let img = Bitmap::from_fn(2, 1, |x, _| if x == 0 { Rgb([100, 100, 100]) } else { Rgb([90, 90, 90]) });
        let out = ditherize_1bit(&img, true);
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0]);
        // 90 + 43.75 = 133.75 crosses the threshold
        assert_eq!(out.get_pixel(1, 0).0, [255, 255, 255]);
    }

    #[test]
    fn test_dither_is_deterministic() {
        let img = gradient(40, 30);
        let palette = Palette::from_colours([Colour::BLACK, Colour::WHITE, Colour::rgb(255, 0, 0)]).unwrap();
        assert_eq!(floyd_steinberg(&img, &palette), floyd_steinberg(&img, &palette));
        assert_eq!(ditherize_palette(&img), ditherize_palette(&img));
        assert_eq!(ditherize_1bit(&img, true), ditherize_1bit(&img, true));
    }

    #[test]
    fn test_palette_dither_stays_in_web_palette() {
        let img = gradient(50, 20);
        let web: HashSet<Colour> = web_palette().colours().iter().copied().collect();
        assert_eq!(web.len(), 216);
        for p in ditherize_palette(&img).pixels() {
            assert!(web.contains(&Colour::from(*p)), "{:?}", p);
        }
    }

    #[test]
    fn test_nearest_colour_exact_matches_untouched() {
        let palette = Palette::from_colours([Colour::rgb(255, 0, 0), Colour::rgb(0, 0, 255)]).unwrap();
        let img = Bitmap::from_fn(3, 1, |x, _| match x {
            0 => Rgb([255, 0, 0]),
            1 => Rgb([0, 0, 255]),
            _ => Rgb([200, 10, 40]),
        });
        let out = remap(&img, &palette, false);
        assert_eq!(out.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(out.get_pixel(1, 0).0, [0, 0, 255]);
        assert_eq!(out.get_pixel(2, 0).0, [255, 0, 0]);
    }

    #[test]
    fn test_empty_width_is_handled() {
        let img = Bitmap::new(0, 0);
        assert_eq!(ditherize_palette(&img).dimensions(), (0, 0));
        assert_eq!(ditherize_1bit(&img, true).dimensions(), (0, 0));
    }
}
