//! Voronoi diagram construction by half-plane clipping.
//!
//! Each site starts with a box far larger than the canvas. Every nearby
//! site cuts it with the perpendicular bisector between the two, keeping the
//! half closer to the owner. Sites are bucketed into a grid and visited in
//! rings of growing distance; the search stops once the ring is further than
//! twice the region's reach, since no bisector that far out can cut it.
//! A region that still touches the outer box is unbounded. Regions are
//! independent and built in parallel.

use rand::Rng;
use rayon::prelude::*;

pub type Point = (f64, f64);

/// Extra room around the canvas for the outer box, in canvas sizes.
const BOX_MARGIN: f64 = 16.0;

const EPSILON: f64 = 1e-6;

/// The convex cell belonging to one site.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub site: Point,
    /// Polygon vertices in order.
    pub vertices: Vec<Point>,
    /// False when the cell reaches the outer box.
    pub bounded: bool,
}

impl Region {
    /// Mean of the vertices.
    pub fn centroid(&self) -> Point {
        let n = self.vertices.len().max(1) as f64;
        let (sx, sy) = self
            .vertices
            .iter()
            .fold((0.0, 0.0), |(ax, ay), &(x, y)| (ax + x, ay + y));
        (sx / n, sy / n)
    }

    /// Consecutive vertex pairs, closing back to the first.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Vertices as `f32` pairs for rasterization.
    pub fn polygon(&self) -> Vec<(f32, f32)> {
        self.vertices.iter().map(|&(x, y)| (x as f32, y as f32)).collect()
    }
}

#[derive(Debug, Clone)]
pub struct Diagram {
    pub regions: Vec<Region>,
}

/// `count` uniformly random points in `[0, width) x [0, height)`.
pub fn random_sites(width: f64, height: f64, count: usize, rng: &mut impl Rng) -> Vec<Point> {
    (0..count)
        .map(|_| (rng.gen::<f64>() * width, rng.gen::<f64>() * height))
        .collect()
}

struct SiteGrid {
    cell: f64,
    cols: usize,
    rows: usize,
    buckets: Vec<Vec<usize>>,
}

impl SiteGrid {
    fn new(sites: &[Point], width: f64, height: f64) -> Self {
        let area = (width * height).max(1.0);
        let cell = (area / sites.len().max(1) as f64).sqrt().max(1.0);
        let cols = ((width / cell).ceil() as usize).max(1);
        let rows = ((height / cell).ceil() as usize).max(1);

        let mut buckets = vec![Vec::new(); cols * rows];
        for (i, &(x, y)) in sites.iter().enumerate() {
            let (c, r) = Self::locate(cell, cols, rows, (x, y));
            buckets[r * cols + c].push(i);
        }

        Self {
            cell,
            cols,
            rows,
            buckets,
        }
    }

    fn locate(cell: f64, cols: usize, rows: usize, (x, y): Point) -> (usize, usize) {
        let c = ((x / cell).floor().max(0.0) as usize).min(cols - 1);
        let r = ((y / cell).floor().max(0.0) as usize).min(rows - 1);
        (c, r)
    }

    /// Site indices in the cells exactly `ring` steps from `(c, r)`.
    fn ring(&self, c: usize, r: usize, ring: usize) -> Vec<usize> {
        let (c, r, k) = (c as isize, r as isize, ring as isize);
        let mut out = Vec::new();
        for dy in -k..=k {
            for dx in -k..=k {
                if dx.abs() != k && dy.abs() != k {
                    continue;
                }
                let (x, y) = (c + dx, r + dy);
                if x < 0 || y < 0 || x >= self.cols as isize || y >= self.rows as isize {
                    continue;
                }
                out.extend_from_slice(&self.buckets[y as usize * self.cols + x as usize]);
            }
        }
        out
    }
}

/// Keep the part of `polygon` closer to `site` than to `other`.
fn clip(polygon: &[Point], site: Point, other: Point) -> Vec<Point> {
    let d = (other.0 - site.0, other.1 - site.1);
    let mid = ((site.0 + other.0) / 2.0, (site.1 + other.1) / 2.0);
    let side = |p: Point| (p.0 - mid.0) * d.0 + (p.1 - mid.1) * d.1;

    let mut out = Vec::with_capacity(polygon.len() + 1);
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        let (sa, sb) = (side(a), side(b));

        if sa <= 0.0 {
            out.push(a);
        }
        if (sa < 0.0 && sb > 0.0) || (sa > 0.0 && sb < 0.0) {
            let t = sa / (sa - sb);
            out.push((a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t));
        }
    }
    out
}

impl Diagram {
    /// Build the diagram of `sites` over a `width x height` canvas.
    pub fn new(sites: &[Point], width: f64, height: f64) -> Self {
        let span = width.max(height).max(1.0);
        let margin = span * BOX_MARGIN;
        let (x0, y0, x1, y1) = (-margin, -margin, width + margin, height + margin);
        let outer = [(x0, y0), (x1, y0), (x1, y1), (x0, y1)];

        let grid = SiteGrid::new(sites, width, height);
        let max_ring = grid.cols.max(grid.rows);

        let regions = sites
            .par_iter()
            .enumerate()
            .map(|(index, &site)| {
                let (c, r) = SiteGrid::locate(grid.cell, grid.cols, grid.rows, site);
                let mut polygon = outer.to_vec();

                for ring in 0..=max_ring {
                    let reach = polygon
                        .iter()
                        .map(|&(x, y)| ((x - site.0).powi(2) + (y - site.1).powi(2)).sqrt())
                        .fold(0.0f64, f64::max);
                    let nearest_possible = ring.saturating_sub(1) as f64 * grid.cell;
                    if nearest_possible > 2.0 * reach {
                        break;
                    }

                    for other in grid.ring(c, r, ring) {
                        if other == index || sites[other] == site {
                            continue;
                        }
                        polygon = clip(&polygon, site, sites[other]);
                        if polygon.is_empty() {
                            break;
                        }
                    }
                }

                let bounded = !polygon.is_empty()
                    && polygon.iter().all(|&(x, y)| {
                        x > x0 + EPSILON && x < x1 - EPSILON && y > y0 + EPSILON && y < y1 - EPSILON
                    });

                Region {
                    site,
                    vertices: polygon,
                    bounded,
                }
            })
            .collect();

        Self { regions }
    }

    pub fn bounded(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|r| r.bounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn area(poly: &[Point]) -> f64 {
        let n = poly.len();
        (0..n)
            .map(|i| {
                let (a, b) = (poly[i], poly[(i + 1) % n]);
                a.0 * b.1 - b.0 * a.1
            })
            .sum::<f64>()
            .abs()
            / 2.0
    }

    #[test]
    fn test_two_sites_are_unbounded() {
        let d = Diagram::new(&[(10.0, 10.0), (30.0, 10.0)], 40.0, 20.0);
        assert_eq!(d.regions.len(), 2);
        assert!(d.regions.iter().all(|r| !r.bounded));
        // the bisector is x = 20
        assert!(d.regions[0].vertices.iter().all(|&(x, _)| x <= 20.0 + EPSILON));
    }

    #[test]
    fn test_centre_of_ring_is_bounded_square() {
        let sites = [
            (50.0, 50.0),
            (40.0, 50.0),
            (60.0, 50.0),
            (50.0, 40.0),
            (50.0, 60.0),
        ];
        let d = Diagram::new(&sites, 100.0, 100.0);
        let centre = &d.regions[0];
        assert!(centre.bounded);
        assert!((area(&centre.vertices) - 100.0).abs() < 1e-6);
        let (cx, cy) = centre.centroid();
        assert!((cx - 50.0).abs() < 1e-9 && (cy - 50.0).abs() < 1e-9);
        assert_eq!(d.bounded().count(), 1);
    }

    #[test]
    fn test_every_point_lies_in_its_nearest_sites_region() {
        let mut rng = StdRng::seed_from_u64(3);
        let sites = random_sites(200.0, 120.0, 150, &mut rng);
        let d = Diagram::new(&sites, 200.0, 120.0);

        for region in d.bounded() {
            let (cx, cy) = region.centroid();
            let nearest = sites
                .iter()
                .map(|&(x, y)| (x - cx).powi(2) + (y - cy).powi(2))
                .fold(f64::MAX, f64::min);
            let own = (region.site.0 - cx).powi(2) + (region.site.1 - cy).powi(2);
            assert!((own - nearest).abs() < 1e-6);
        }
        assert!(d.bounded().count() > 50);
    }
}
