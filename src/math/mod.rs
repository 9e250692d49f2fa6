//! Mathematical utilities for patch comparison

/// Weighted, normalized patch distance
pub mod distance;
/// Distance-to-weight curve used in voting
pub mod similarity;
