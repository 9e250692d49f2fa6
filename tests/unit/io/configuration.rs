//! Tests for configuration constants

#[cfg(test)]
mod tests {
    use patchfill::io::configuration::{
        DEFAULT_PATCH_RADIUS, MASK_SUFFIX, MASKED_NEIGHBOR_THRESHOLD, MAX_EM_ITERATIONS,
        MAX_NNF_PASSES, OUTPUT_SUFFIX, PREVIEW_SUFFIX, SUPPORTED_EXTENSIONS, VISUALIZATION_SUFFIX,
        VOTING_HIGH_QUANTILE, VOTING_LOW_QUANTILE,
    };

    // Tests the iteration caps of the coarse-to-fine schedule
    // Verified by changing constant values
    #[test]
    fn test_iteration_caps() {
        assert_eq!(MAX_EM_ITERATIONS, 4);
        assert_eq!(MAX_NNF_PASSES, 5);
        assert_eq!(DEFAULT_PATCH_RADIUS, 2);
    }

    // Tests that the voting band is a proper sub-range of [0, 1]
    // Verified by swapping the quantiles
    #[test]
    fn test_voting_band_ordering() {
        assert!(0.0 < VOTING_LOW_QUANTILE);
        assert!(VOTING_LOW_QUANTILE < VOTING_HIGH_QUANTILE);
        assert!(VOTING_HIGH_QUANTILE < 1.0);
        assert!((0.0..=1.0).contains(&MASKED_NEIGHBOR_THRESHOLD));
    }

    // Tests that derived file suffixes are distinct
    // Verified by duplicating a suffix
    #[test]
    fn test_suffixes_distinct() {
        let suffixes = [MASK_SUFFIX, OUTPUT_SUFFIX, PREVIEW_SUFFIX, VISUALIZATION_SUFFIX];
        for (i, a) in suffixes.iter().enumerate() {
            for b in suffixes.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
        assert!(SUPPORTED_EXTENSIONS.contains(&"png"));
    }
}
