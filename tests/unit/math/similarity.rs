//! Tests for the distance-to-weight curve
#[cfg(test)]
mod tests {
    use patchfill::math::distance::DSCALE;
    use patchfill::math::similarity::{
        HALF_WEIGHT_FRACTION, SIMILARITY_AT_ZERO, similarity, similarity_curve,
    };

    // Tests the curve anchors: 0.999 at zero and one half at ten percent
    // Verified against the closed-form curve and the table lookup
    #[test]
    fn test_curve_anchors() {
        assert!((similarity_curve(0.0) - SIMILARITY_AT_ZERO).abs() < 1e-9);
        assert!((similarity_curve(HALF_WEIGHT_FRACTION) - 0.5).abs() < 1e-9);
        assert!((similarity(0) - 0.999).abs() < 1e-9);
        assert!((similarity(6554) - 0.5).abs() < 1e-3);
    }

    // Tests that the weight decreases with distance and stays in [0, 1]
    // Verified over a sweep of the full distance range
    #[test]
    fn test_monotone_and_bounded() {
        let mut previous = f64::INFINITY;
        for distance in (0..=DSCALE).step_by(97) {
            let weight = similarity(distance);
            assert!((0.0..=1.0).contains(&weight));
            assert!(weight <= previous);
            previous = weight;
        }
        assert!(similarity(DSCALE) < 1e-6);
    }

    // Tests that distances past the scale clamp to the last entry
    // Verified by comparing the maximum u32 with DSCALE
    #[test]
    fn test_out_of_range_clamps() {
        assert!((similarity(u32::MAX) - similarity(DSCALE)).abs() < f64::EPSILON);
    }
}
