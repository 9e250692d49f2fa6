//! Boundary layer: files, command line, progress and errors

/// Command-line interface and batch processing
pub mod cli;
/// Algorithm constants and defaults
pub mod configuration;
/// Error types
pub mod error;
/// Image and mask loading and export
pub mod image;
/// Terminal progress display
pub mod progress;
/// Per-level animation export
pub mod visualization;
