//! Fast octree quantization.
//!
//! Colours are bucketed into the fourth level of an RGB octree (4 bits per
//! channel, 4096 cubes). The most populated cubes win and each contributes
//! its population-weighted average colour.

use std::collections::HashMap;

use crate::types::Colour;

use super::HistEntry;

const LEVEL_SHIFT: u8 = 4;

#[derive(Default)]
struct Cube {
    sum: [u64; 3],
    count: u64,
}

fn cube_key(colour: [u8; 3]) -> u16 {
    let [r, g, b] = colour.map(|c| (c >> LEVEL_SHIFT) as u16);
    r << 8 | g << 4 | b
}

pub(super) fn fast_octree(hist: &[HistEntry], colors: usize) -> Vec<Colour> {
    let mut cubes: HashMap<u16, Cube> = HashMap::new();

    for &(colour, count) in hist {
        let cube = cubes.entry(cube_key(colour)).or_default();
        for c in 0..3 {
            cube.sum[c] += colour[c] as u64 * count as u64;
        }
        cube.count += count as u64;
    }

    let mut ranked: Vec<(u16, Cube)> = cubes.into_iter().collect();
    ranked.sort_by(|a, b| b.1.count.cmp(&a.1.count).then(a.0.cmp(&b.0)));

    ranked
        .iter()
        .take(colors)
        .map(|(_, cube)| {
            let n = cube.count.max(1);
            let avg = cube.sum.map(|s| ((s + n / 2) / n) as u8);
            Colour::rgb(avg[0], avg[1], avg[2])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colours_in_same_cube_merge() {
        let hist = vec![([0, 0, 0], 1), ([15, 15, 15], 1), ([200, 0, 0], 5)];
        let out = fast_octree(&hist, 8);
        assert_eq!(out, vec![Colour::rgb(200, 0, 0), Colour::rgb(8, 8, 8)]);
    }

    #[test]
    fn test_most_populated_cubes_win() {
        let hist = vec![([0, 0, 0], 1), ([128, 0, 0], 50), ([0, 128, 0], 20)];
        let out = fast_octree(&hist, 2);
        assert_eq!(out, vec![Colour::rgb(128, 0, 0), Colour::rgb(0, 128, 0)]);
    }
}
