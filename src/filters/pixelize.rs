//! Pixelization: box downsample, then optional nearest-neighbour upsample.

use image::Rgb;

use crate::types::Bitmap;

/// Largest accepted downsample factor.
pub const MAX_FACTOR: u32 = 30;

/// Source pixels and coverage weights contributing to each output pixel.
fn box_weights(src: u32, dst: u32) -> Vec<Vec<(usize, f32)>> {
    let scale = src as f64 / dst as f64;
    (0..dst)
        .map(|o| {
            let start = o as f64 * scale;
            let end = start + scale;
            let first = start.floor() as u32;
            let last = (end.ceil() as u32).min(src);
            (first..last)
                .filter_map(|i| {
                    let overlap = end.min(i as f64 + 1.0) - start.max(i as f64);
                    (overlap > 1e-9).then_some((i as usize, overlap as f32))
                })
                .collect()
        })
        .collect()
}

/// Area-averaging resize.
fn box_resize(image: &Bitmap, width: u32, height: u32) -> Bitmap {
    let (sw, sh) = image.dimensions();
    let xw = box_weights(sw, width);
    let yw = box_weights(sh, height);

    // horizontal pass
    let mut rows = vec![[0.0f32; 3]; (width * sh) as usize];
    for y in 0..sh {
        for (x, taps) in xw.iter().enumerate() {
            let mut acc = [0.0f32; 3];
            let mut total = 0.0;
            for &(sx, w) in taps {
                let p = image.get_pixel(sx as u32, y);
                for c in 0..3 {
                    acc[c] += p[c] as f32 * w;
                }
                total += w;
            }
            rows[(y * width) as usize + x] = acc.map(|v| v / total);
        }
    }

    Bitmap::from_fn(width, height, |x, y| {
        let mut acc = [0.0f32; 3];
        let mut total = 0.0;
        for &(sy, w) in &yw[y as usize] {
            let v = rows[sy * width as usize + x as usize];
            for c in 0..3 {
                acc[c] += v[c] * w;
            }
            total += w;
        }
        Rgb(acc.map(|v| (v / total).round().clamp(0.0, 255.0) as u8))
    })
}

/// Nearest-neighbour resize sampling pixel centres.
fn nearest_resize(image: &Bitmap, width: u32, height: u32) -> Bitmap {
    let (sw, sh) = image.dimensions();
    Bitmap::from_fn(width, height, |x, y| {
        let sx = (((x as u64 * 2 + 1) * sw as u64) / (width as u64 * 2)) as u32;
        let sy = (((y as u64 * 2 + 1) * sh as u64) / (height as u64 * 2)) as u32;
        *image.get_pixel(sx.min(sw - 1), sy.min(sh - 1))
    })
}

/// Shrink by `factor` with area averaging, then optionally blow back up to
/// the original size with hard pixel edges.
///
/// `factor` is clamped to `1..=30`; a factor of 1 is a plain copy.
pub fn pixelize(image: &Bitmap, factor: u32, upsample: bool) -> Bitmap {
    let factor = factor.clamp(1, MAX_FACTOR);
    let (w, h) = image.dimensions();
    tracing::debug!(width = w, height = h, factor, upsample, "pixelize");

    if w == 0 || h == 0 {
        return image.clone();
    }

    let small = if factor == 1 {
        image.clone()
    } else {
        box_resize(image, (w / factor).max(1), (h / factor).max(1))
    };

    if upsample && small.dimensions() != (w, h) {
        nearest_resize(&small, w, h)
    } else {
        small
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(w: u32, h: u32) -> Bitmap {
        Bitmap::from_fn(w, h, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        })
    }

    #[test]
    fn test_factor_one_is_identity() {
        let img = Bitmap::from_fn(7, 5, |x, y| Rgb([x as u8 * 30, y as u8 * 40, 99]));
        assert_eq!(pixelize(&img, 1, false), img);
        assert_eq!(pixelize(&img, 0, true), img);
    }

    #[test]
    fn test_upsample_keeps_dimensions() {
        let img = checker(37, 23);
        for f in [1, 2, 3, 7, 30, 99] {
            assert_eq!(pixelize(&img, f, true).dimensions(), (37, 23), "factor {}", f);
        }
    }

    #[test]
    fn test_downsample_only_size() {
        let img = checker(37, 23);
        assert_eq!(pixelize(&img, 4, false).dimensions(), (9, 5));
        assert_eq!(pixelize(&img, 30, false).dimensions(), (1, 1));
    }

    #[test]
    fn test_box_filter_averages_blocks() {
        let out = pixelize(&checker(8, 8), 2, false);
        for p in out.pixels() {
            assert_eq!(p.0, [128, 128, 128]);
        }
    }

    #[test]
    fn test_upsample_makes_hard_blocks() {
        let img = Bitmap::from_fn(4, 4, |x, y| Rgb([(x / 2 * 200) as u8, (y / 2 * 200) as u8, 0]));
        let out = pixelize(&img, 2, true);
        assert_eq!(out, img);
    }
}
