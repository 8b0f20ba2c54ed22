//! K-means refinement of a seed palette against a colour histogram.

use crate::types::{Colour, Palette};

use super::HistEntry;

/// Run `iterations` rounds of Lloyd's algorithm.
///
/// Each histogram colour joins its nearest centroid, then every centroid
/// moves to the population-weighted mean of its members. Centroids that
/// attract no colours stay where they are. Stops early once nothing moves.
pub(super) fn refine(hist: &[HistEntry], seed: &Palette, iterations: u32) -> Vec<Colour> {
    let mut centroids: Vec<Colour> = seed.colours().to_vec();
    if hist.is_empty() {
        return centroids;
    }

    for round in 0..iterations {
        let current = match Palette::from_colours(centroids.iter().copied()) {
            Ok(p) => p,
            Err(_) => break,
        };

        let mut sums = vec![[0u64; 4]; current.len()];
        for &(colour, count) in hist {
            let k = current.nearest(colour.map(|c| c as f32));
            for c in 0..3 {
                sums[k][c] += colour[c] as u64 * count as u64;
            }
            sums[k][3] += count as u64;
        }

        let next: Vec<Colour> = current
            .colours()
            .iter()
            .zip(&sums)
            .map(|(&old, s)| {
                let n = s[3];
                if n == 0 {
                    old
                } else {
                    let avg = [0, 1, 2].map(|c| ((s[c] + n / 2) / n) as u8);
                    Colour::rgb(avg[0], avg[1], avg[2])
                }
            })
            .collect();

        let settled = next.as_slice() == current.colours();
        centroids = next;
        if settled {
            tracing::trace!(round, "k-means converged");
            break;
        }
    }

    centroids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_iterations_is_identity() {
        let seed = Palette::from_colours([Colour::rgb(10, 10, 10)]).unwrap();
        let hist = vec![([200, 200, 200], 3)];
        assert_eq!(refine(&hist, &seed, 0), vec![Colour::rgb(10, 10, 10)]);
    }

    #[test]
    fn test_centroids_move_to_cluster_means() {
        let seed = Palette::from_colours([Colour::rgb(0, 0, 0), Colour::rgb(255, 255, 255)]).unwrap();
        let hist = vec![
            ([20, 20, 20], 1),
            ([40, 40, 40], 1),
            ([200, 200, 200], 3),
            ([220, 220, 220], 1),
        ];
        let out = refine(&hist, &seed, 5);
        assert_eq!(out, vec![Colour::rgb(30, 30, 30), Colour::rgb(205, 205, 205)]);
    }

    #[test]
    fn test_empty_cluster_keeps_position() {
        let seed = Palette::from_colours([Colour::rgb(0, 0, 0), Colour::rgb(0, 0, 255)]).unwrap();
        let hist = vec![([10, 0, 0], 4)];
        let out = refine(&hist, &seed, 3);
        assert_eq!(out, vec![Colour::rgb(10, 0, 0), Colour::rgb(0, 0, 255)]);
    }
}
