//! Box-splitting quantizers: median cut and maximum coverage.
//!
//! Both start from one box holding the whole colour histogram and split boxes
//! at the population median of their widest channel. They differ only in
//! which box is split next.

use crate::types::Colour;

use super::HistEntry;

/// Which box to split on each round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SplitRule {
    /// The box holding the most pixels.
    Population,
    /// The box spanning the largest colour-space volume.
    Volume,
}

#[derive(Debug)]
struct ColourBox {
    entries: Vec<HistEntry>,
    min: [u8; 3],
    max: [u8; 3],
    population: u64,
}

impl ColourBox {
    fn new(entries: Vec<HistEntry>) -> Self {
        let mut min = [255u8; 3];
        let mut max = [0u8; 3];
        let mut population = 0u64;

        for (colour, count) in &entries {
            for c in 0..3 {
                min[c] = min[c].min(colour[c]);
                max[c] = max[c].max(colour[c]);
            }
            population += *count as u64;
        }

        Self {
            entries,
            min,
            max,
            population,
        }
    }

    fn volume(&self) -> u64 {
        (0..3)
            .map(|c| (self.max[c] - self.min[c]) as u64 + 1)
            .product()
    }

    fn widest_channel(&self) -> usize {
        let ranges = [0, 1, 2].map(|c| self.max[c] - self.min[c]);
        let mut best = 0;
        for c in 1..3 {
            if ranges[c] > ranges[best] {
                best = c;
            }
        }
        best
    }

    fn priority(&self, rule: SplitRule) -> u64 {
        match rule {
            SplitRule::Population => self.population,
            SplitRule::Volume => self.volume(),
        }
    }

    /// Split at the population median along the widest channel.
    fn split(mut self) -> (ColourBox, ColourBox) {
        let channel = self.widest_channel();
        self.entries
            .sort_by_key(|(colour, _)| (colour[channel], *colour));

        let half = self.population.div_ceil(2);
        let mut running = 0u64;
        let mut at = self.entries.len() - 1;
        for (i, (_, count)) in self.entries.iter().enumerate() {
            running += *count as u64;
            if running >= half {
                at = i + 1;
                break;
            }
        }
        let at = at.clamp(1, self.entries.len() - 1);

        let upper = self.entries.split_off(at);
        (ColourBox::new(self.entries), ColourBox::new(upper))
    }

    fn average(&self) -> Colour {
        let mut sum = [0u64; 3];
        for (colour, count) in &self.entries {
            for c in 0..3 {
                sum[c] += colour[c] as u64 * *count as u64;
            }
        }
        let n = self.population.max(1);
        let avg = sum.map(|s| ((s + n / 2) / n) as u8);
        Colour::rgb(avg[0], avg[1], avg[2])
    }
}

/// Reduce a histogram to at most `colors` box averages.
pub(super) fn median_cut(hist: &[HistEntry], colors: usize, rule: SplitRule) -> Vec<Colour> {
    if hist.is_empty() {
        return Vec::new();
    }

    let mut boxes = vec![ColourBox::new(hist.to_vec())];

    while boxes.len() < colors {
        let candidate = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.entries.len() > 1)
            .fold(None::<(usize, u64)>, |best, (i, b)| {
                let p = b.priority(rule);
                match best {
                    Some((_, bp)) if bp >= p => best,
                    _ => Some((i, p)),
                }
            });

        let Some((index, _)) = candidate else {
            break;
        };

        let target = boxes.swap_remove(index);
        let (lower, upper) = target.split();
        boxes.push(lower);
        boxes.push(upper);
    }

    boxes.iter().map(ColourBox::average).collect()
}
