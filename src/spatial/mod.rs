//! Image data structures for hole filling
//!
//! This module contains:
//! - The masked image (pixels plus hole mask) with resampling
//! - The resolution pyramid built from it

/// Pixel grid with an occlusion mask
pub mod masked_image;
/// Coarse-to-fine image pyramid
pub mod pyramid;

pub use masked_image::MaskedImage;
pub use pyramid::Pyramid;
