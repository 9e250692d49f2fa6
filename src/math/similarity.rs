//! Conversion from patch distance to voting weight
//!
//! The curve is `w(t) = 0.5 - 0.5 * tanh(coef * (t - t_half))` over the
//! distance fraction `t = d / DSCALE`. It is tuned so identical patches weigh
//! 0.999 and patches at 10% of the maximum distance weigh 0.5.

use std::sync::LazyLock;

use crate::math::distance::DSCALE;

/// Weight given to a zero-distance match
pub const SIMILARITY_AT_ZERO: f64 = 0.999;

/// Distance fraction at which the weight falls to one half
pub const HALF_WEIGHT_FRACTION: f64 = 0.10;

static SIMILARITY_TABLE: LazyLock<Vec<f64>> = LazyLock::new(|| {
    let coef = curve_coefficient();
    (0..=DSCALE)
        .map(|d| evaluate(coef, f64::from(d) / f64::from(DSCALE)))
        .collect()
});

/// Steepness solving `w(0) = SIMILARITY_AT_ZERO`
pub fn curve_coefficient() -> f64 {
    (2.0f64.mul_add(SIMILARITY_AT_ZERO, -1.0)).atanh() / HALF_WEIGHT_FRACTION
}

fn evaluate(coef: f64, fraction: f64) -> f64 {
    0.5f64.mul_add(-(coef * (fraction - HALF_WEIGHT_FRACTION)).tanh(), 0.5)
}

/// Evaluate the curve at a distance fraction in `[0, 1]`
pub fn similarity_curve(fraction: f64) -> f64 {
    evaluate(curve_coefficient(), fraction)
}

/// Voting weight for a scaled distance, read from the precomputed table
///
/// Distances beyond `DSCALE` are treated as `DSCALE`.
pub fn similarity(distance: u32) -> f64 {
    let index = distance.min(DSCALE) as usize;
    SIMILARITY_TABLE.get(index).copied().unwrap_or(0.0)
}
