//! Rasterization primitives used by the halftone and Voronoi filters.
//!
//! All functions clip against the image bounds, so callers can pass shapes
//! that extend past the edges. Filled polygons sample pixel centres, which
//! makes polygons that share an edge tile without gaps or overlap.

use image::GenericImage;

/// Set a pixel if it lies inside the image.
#[inline]
pub fn put<I: GenericImage>(img: &mut I, x: i32, y: i32, colour: I::Pixel) {
    let (w, h) = img.dimensions();
    if x >= 0 && y >= 0 && (x as u32) < w && (y as u32) < h {
        img.put_pixel(x as u32, y as u32, colour);
    }
}

/// Draw a horizontal span from `x1` to `x2` inclusive.
pub fn hline<I: GenericImage>(img: &mut I, x1: i32, x2: i32, y: i32, colour: I::Pixel) {
    let (w, h) = img.dimensions();
    if y < 0 || y >= h as i32 {
        return;
    }
    let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
    let start = x1.max(0);
    let end = x2.min(w as i32 - 1);
    for x in start..=end {
        img.put_pixel(x as u32, y as u32, colour);
    }
}

/// Fill a circle using horizontal spans (midpoint algorithm).
///
/// A radius of 0 plots the centre pixel only.
pub fn fill_circle<I: GenericImage>(img: &mut I, cx: i32, cy: i32, radius: i32, colour: I::Pixel) {
    if radius <= 0 {
        if radius == 0 {
            put(img, cx, cy, colour);
        }
        return;
    }

    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;

    while x >= y {
        hline(img, cx - x, cx + x, cy + y, colour);
        if y != 0 {
            hline(img, cx - x, cx + x, cy - y, colour);
        }
        if x != y {
            hline(img, cx - y, cx + y, cy + x, colour);
            if y != 0 {
                hline(img, cx - y, cx + y, cy - x, colour);
            }
        }

        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

/// Fill a polygon with the even-odd scanline rule.
///
/// A pixel is covered when its centre lies inside the polygon.
pub fn fill_polygon<I: GenericImage>(img: &mut I, vertices: &[(f32, f32)], colour: I::Pixel) {
    if vertices.len() < 3 {
        return;
    }

    let (w, h) = img.dimensions();
    let (min_y, max_y) = vertices
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));

    let min_y = (min_y.floor() as i32).max(0);
    let max_y = (max_y.ceil() as i32).min(h as i32 - 1);
    if w == 0 || min_y > max_y {
        return;
    }

    let mut crossings: Vec<f32> = Vec::with_capacity(vertices.len());
    let n = vertices.len();

    for y in min_y..=max_y {
        crossings.clear();
        let yc = y as f32 + 0.5;

        for i in 0..n {
            let (x1, y1) = vertices[i];
            let (x2, y2) = vertices[(i + 1) % n];
            if (y1 <= yc && y2 > yc) || (y2 <= yc && y1 > yc) {
                crossings.push(x1 + (yc - y1) / (y2 - y1) * (x2 - x1));
            }
        }

        crossings.sort_by(|a, b| a.total_cmp(b));
        for pair in crossings.chunks_exact(2) {
            let start = (pair[0] - 0.5).ceil() as i32;
            let end = (pair[1] - 0.5).ceil() as i32 - 1;
            if start <= end {
                hline(img, start, end, y, colour);
            }
        }
    }
}

/// Draw a straight line `width` pixels wide.
///
/// Widths of 0 and 1 both produce a one-pixel Bresenham line; wider lines
/// are filled as a rectangle around the segment, without end caps.
pub fn draw_line<I: GenericImage>(
    img: &mut I,
    from: (f32, f32),
    to: (f32, f32),
    width: u32,
    colour: I::Pixel,
) {
    if width <= 1 {
        bresenham(
            img,
            (from.0.round() as i32, from.1.round() as i32),
            (to.0.round() as i32, to.1.round() as i32),
            colour,
        );
        return;
    }

    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-3 {
        fill_circle(img, from.0.round() as i32, from.1.round() as i32, width as i32 / 2, colour);
        return;
    }

    let half = width as f32 / 2.0;
    let (nx, ny) = (-dy / len * half, dx / len * half);
    let quad = [
        (from.0 + nx, from.1 + ny),
        (to.0 + nx, to.1 + ny),
        (to.0 - nx, to.1 - ny),
        (from.0 - nx, from.1 - ny),
    ];
    fill_polygon(img, &quad, colour);
}

fn bresenham<I: GenericImage>(img: &mut I, from: (i32, i32), to: (i32, i32), colour: I::Pixel) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put(img, x, y, colour);
        if x == to.0 && y == to.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
