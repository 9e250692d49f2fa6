//! Patch voting: rebuild each target pixel from the source patches that cover it
//!
//! Every patch overlapping a target pixel proposes the source pixel aligned
//! with it, weighted by how well that patch matched. The proposals form one
//! weighted histogram per channel, and the new value is the weighted mean of
//! the central band of each histogram.

use ndarray::Array2;
use rayon::prelude::*;

use crate::algorithm::field::Correspondence;
use crate::io::configuration::{MIN_VOTING_WEIGHT, VOTING_HIGH_QUANTILE, VOTING_LOW_QUANTILE};
use crate::math::similarity::similarity;
use crate::spatial::MaskedImage;

const BINS: usize = 256;

/// Slack for accumulated float error before truncating a mean to a sample
const MEAN_TOLERANCE: f64 = 1e-9;

/// Trimming and evidence thresholds for the vote
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VotingBand {
    /// Cumulative-weight fraction below which bins are skipped
    pub low: f64,
    /// Cumulative-weight fraction after which accumulation stops
    pub high: f64,
    /// Minimum total weight for a pixel to be rewritten
    pub min_weight: f64,
}

impl Default for VotingBand {
    fn default() -> Self {
        Self {
            low: VOTING_LOW_QUANTILE,
            high: VOTING_HIGH_QUANTILE,
            min_weight: MIN_VOTING_WEIGHT,
        }
    }
}

/// Pixel-local weighted histograms, one per channel
#[derive(Debug, Clone)]
pub struct ChannelHistograms {
    bins: [[f64; BINS]; 3],
    total: f64,
}

impl Default for ChannelHistograms {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelHistograms {
    /// Empty histograms
    pub const fn new() -> Self {
        Self {
            bins: [[0.0; BINS]; 3],
            total: 0.0,
        }
    }

    /// Add one weighted vote for a pixel value
    pub fn add(&mut self, pixel: [u8; 3], weight: f64) {
        for (channel, sample) in self.bins.iter_mut().zip(pixel) {
            if let Some(bin) = channel.get_mut(sample as usize) {
                *bin += weight;
            }
        }
        self.total += weight;
    }

    /// Accumulated weight over all votes
    pub const fn total(&self) -> f64 {
        self.total
    }

    /// Weighted mean of the bins whose cumulative weight lies in the band
    ///
    /// Bins are skipped until the cumulative weight reaches `low * total`;
    /// accumulation stops at the first bin that takes it past `high * total`.
    /// The mean is truncated to a sample value.
    pub fn trimmed_mean(&self, channel: usize, low: f64, high: f64) -> Option<u8> {
        let bins = self.bins.get(channel)?;
        let (low, high) = (low * self.total, high * self.total);

        let mut cdf = 0.0;
        let mut value_sum = 0.0;
        let mut weight_sum = 0.0;
        for (value, &weight) in bins.iter().enumerate() {
            cdf += weight;
            if cdf < low {
                continue;
            }
            value_sum += value as f64 * weight;
            weight_sum += weight;
            if cdf > high {
                break;
            }
        }

        (weight_sum > 0.0).then(|| (value_sum / weight_sum + MEAN_TOLERANCE) as u8)
    }
}

/// Collect the votes for target pixel (x, y)
///
/// With `upscaled`, the target is twice the field's resolution: the radius is
/// doubled and each covering patch center is looked up at half coordinates.
pub fn gather_votes(
    links: &Array2<Correspondence>,
    radius: usize,
    source: &MaskedImage,
    x: i32,
    y: i32,
    upscaled: bool,
) -> ChannelHistograms {
    let (rows, cols) = links.dim();
    let scale = if upscaled { 2 } else { 1 };
    let reach = radius as i32 * scale;
    let (width, height) = (cols as i32 * scale, rows as i32 * scale);

    let mut histograms = ChannelHistograms::new();

    for dy in -reach..=reach {
        for dx in -reach..=reach {
            // Center of a target patch that covers (x, y)
            let (xpt, ypt) = (x + dx, y + dy);
            if xpt < 0 || ypt < 0 || xpt >= width || ypt >= height {
                continue;
            }

            let Some(link) = links
                .get([(ypt / scale) as usize, (xpt / scale) as usize])
                .copied()
            else {
                continue;
            };
            let (xst, yst) = if upscaled {
                (2 * link.x + xpt % 2, 2 * link.y + ypt % 2)
            } else {
                (link.x, link.y)
            };

            // Source pixel aligned with (x, y) inside the matched patch
            let Some(pixel) = source.known_pixel(xst - dx, yst - dy) else {
                continue;
            };
            histograms.add(pixel, similarity(link.distance));
        }
    }

    histograms
}

/// New value for one pixel, or its previous value when evidence is too thin
fn resolve_pixel(histograms: &ChannelHistograms, previous: [u8; 3], band: VotingBand) -> [u8; 3] {
    if histograms.total() < band.min_weight {
        return previous;
    }

    let mut value = previous;
    for (channel, sample) in value.iter_mut().enumerate() {
        if let Some(mean) = histograms.trimmed_mean(channel, band.low, band.high) {
            *sample = mean;
        }
    }
    value
}

/// Rewrite every pixel of `target` by voting over the field's matches
///
/// Pixels are independent of each other, so rows are voted in parallel and
/// written back afterwards; the result matches a sequential pass.
pub fn reconstruct(
    links: &Array2<Correspondence>,
    radius: usize,
    source: &MaskedImage,
    target: &mut MaskedImage,
    upscaled: bool,
    band: VotingBand,
) {
    let (width, height) = (target.width(), target.height());
    let snapshot: &MaskedImage = target;

    let rows: Vec<Vec<[u8; 3]>> = (0..height)
        .into_par_iter()
        .map(|y| {
            (0..width)
                .map(|x| {
                    let histograms =
                        gather_votes(links, radius, source, x as i32, y as i32, upscaled);
                    resolve_pixel(&histograms, snapshot.pixel(x, y), band)
                })
                .collect()
        })
        .collect();

    for (y, row) in rows.into_iter().enumerate() {
        for (x, value) in row.into_iter().enumerate() {
            target.set_pixel(x, y, value);
        }
    }
}
