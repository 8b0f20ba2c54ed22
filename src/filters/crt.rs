//! CRT display emulation: barrel curvature, scan lines and vignette.
//!
//! Every destination pixel is computed independently, so rows are rendered
//! in parallel.

use std::f32::consts::PI;

use rayon::prelude::*;

use crate::error::{RetroError, Result};
use crate::types::Bitmap;

/// Parameters of the emulated screen.
#[derive(Debug, Clone, PartialEq)]
pub struct CrtParams {
    /// Horizontal resolution of the virtual screen; smaller is coarser.
    pub virtual_width: f32,
    /// Vertical resolution of the virtual screen.
    pub virtual_height: f32,
    /// Curvature divisor; smaller bends harder. Must be positive.
    pub curvature: f32,
    pub scanline_opacity: f32,
    pub vignette_opacity: f32,
    pub vignette_roundness: f32,
    /// Final gain; ignored when not positive.
    pub brightness: f32,
}

impl Default for CrtParams {
    fn default() -> Self {
        Self {
            virtual_width: 240.0,
            virtual_height: 160.0,
            curvature: 3.0,
            scanline_opacity: 1.0,
            vignette_opacity: 0.5,
            vignette_roundness: 5.0,
            brightness: 1.2,
        }
    }
}

/// Evenly spaced samples over `[0, 1]`, endpoints included.
fn linspace(i: u32, n: u32) -> f32 {
    if n <= 1 {
        0.0
    } else {
        i as f32 / (n - 1) as f32
    }
}

/// Barrel distortion of a normalized coordinate.
fn curve(u: f32, v: f32, curvature: f32) -> (f32, f32) {
    let (cx, cy) = (u * 2.0 - 1.0, v * 2.0 - 1.0);
    let (ox, oy) = (cy.abs() / curvature, cx.abs() / curvature);
    let (cx, cy) = (cx + cx * ox * ox, cy + cy * oy * oy);
    (cx * 0.5 + 0.5, cy * 0.5 + 0.5)
}

fn scanline(t: f32, resolution: f32, opacity: f32) -> f32 {
    let wave = (t * resolution * PI * 2.0).sin();
    ((0.5 * wave + 0.5) * 0.9 + 0.1).powf(opacity)
}

fn vignette(u: f32, v: f32, params: &CrtParams) -> f32 {
    let raw = u * v * (1.0 - u) * (1.0 - v);
    let scaled = (params.virtual_width / params.vignette_roundness * raw).clamp(0.0, 1.0);
    scaled.powf(params.vignette_opacity)
}

/// Render `image` as seen on a curved CRT.
pub fn crt_emulate(image: &Bitmap, params: &CrtParams) -> Result<Bitmap> {
    if params.curvature <= 0.0 {
        return Err(RetroError::config(
            format!("CRT curvature must be positive, got {}", params.curvature),
            "Typical values are between 2 and 10",
        ));
    }

    let (w, h) = image.dimensions();
    tracing::debug!(width = w, height = h, ?params, "crt");

    let mut out = Bitmap::new(w, h);
    let stride = w as usize * 3;
    if stride == 0 {
        return Ok(out);
    }

    out.par_chunks_mut(stride).enumerate().for_each(|(y, row)| {
        let v = linspace(y as u32, h);
        for (x, px) in row.chunks_exact_mut(3).enumerate() {
            let u = linspace(x as u32, w);
            let (cu, cv) = curve(u, v, params.curvature);

            if !(0.0..=1.0).contains(&cu) || !(0.0..=1.0).contains(&cv) {
                px.copy_from_slice(&[0, 0, 0]);
                continue;
            }

            let sx = (cu * (w - 1) as f32).clamp(0.0, (w - 1) as f32) as u32;
            let sy = (cv * (h - 1) as f32).clamp(0.0, (h - 1) as f32) as u32;
            let mut colour = image.get_pixel(sx, sy).0.map(|c| c as f32 / 255.0);

            if params.vignette_opacity > 0.0 {
                let k = vignette(cu, cv, params);
                colour = colour.map(|c| c * k);
            }
            if params.scanline_opacity > 0.0 {
                colour[0] *= scanline(cu, params.virtual_height, params.scanline_opacity);
                let vertical = scanline(cv, params.virtual_width, params.scanline_opacity);
                colour[1] *= vertical;
                colour[2] *= vertical;
            }
            if params.brightness > 0.0 {
                colour = colour.map(|c| c * params.brightness);
            }

            // the epsilon absorbs f32 round-off on unmodulated channels
            for (dst, c) in px.iter_mut().zip(colour) {
                *dst = (c.clamp(0.0, 1.0) * 255.0 + 1e-3) as u8;
            }
        }
    });

    Ok(out)
}
