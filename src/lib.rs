//! Image hole filling with the PatchMatch randomized correspondence algorithm
//!
//! A resolution pyramid is built from the masked input. Starting at the
//! coarsest level, a nearest-neighbor field maps every target patch to a
//! similar source patch, and overlapping matches vote on each pixel. The
//! last vote at every level is cast at twice the resolution, seeding the next
//! finer level until the input size is reached.

#![forbid(unsafe_code)]

/// Nearest-neighbor field search, voting and the coarse-to-fine driver
pub mod algorithm;
/// Input/output operations, configuration and error handling
pub mod io;
/// Patch distance and similarity weighting
pub mod math;
/// Masked images and resolution pyramids
pub mod spatial;

pub use algorithm::executor::{InpaintConfig, Inpainter, inpaint};
pub use io::error::{InpaintError, Result};
pub use spatial::MaskedImage;
