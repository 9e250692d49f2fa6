//! Frame capture and GIF generation for the coarse-to-fine reconstruction

use crate::io::error::{InpaintError, Result};
use crate::spatial::MaskedImage;
use image::{Delay, Frame, RgbaImage, imageops};
use std::path::Path;

/// Records the reconstruction produced at each pyramid level
///
/// Every frame is resized to the output resolution so the animation shows
/// detail emerging as the levels get finer.
pub struct LevelCapture {
    width: u32,
    height: u32,
    frames: Vec<(usize, RgbaImage)>,
}

impl LevelCapture {
    /// Capture frames at the given output size
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frames: Vec::new(),
        }
    }

    /// Record a reconstruction, tagged with the level it came from
    pub fn record(&mut self, level: usize, image: &MaskedImage) {
        let rgba = image::DynamicImage::ImageRgb8(image.pixels().clone()).to_rgba8();
        let frame = if rgba.dimensions() == (self.width, self.height) {
            rgba
        } else {
            imageops::resize(
                &rgba,
                self.width,
                self.height,
                imageops::FilterType::Nearest,
            )
        };
        self.frames.push((level, frame));
    }

    /// Levels recorded so far, in capture order
    pub fn levels(&self) -> Vec<usize> {
        self.frames.iter().map(|(level, _)| *level).collect()
    }

    /// Number of captured frames
    pub const fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Export the captured levels as an animated GIF
    ///
    /// The last frame is held for `final_hold` frame delays.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No frames were captured
    /// - File system operations fail
    /// - GIF encoding fails
    pub fn export_gif(&self, output_path: &Path, frame_delay_ms: u32, final_hold: u32) -> Result<()> {
        if self.frames.is_empty() {
            return Err(InpaintError::InvalidSourceData {
                reason: "No pyramid levels captured for visualization".to_string(),
            });
        }

        let last = self.frames.len() - 1;
        let frames = self.frames.iter().enumerate().map(|(i, (_, img))| {
            let delay = if i == last {
                frame_delay_ms.saturating_mul(final_hold.max(1))
            } else {
                frame_delay_ms
            };
            Frame::from_parts(img.clone(), 0, 0, Delay::from_numer_denom_ms(delay, 1))
        });

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| InpaintError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }

        let file = std::fs::File::create(output_path).map_err(|e| InpaintError::FileSystem {
            path: output_path.to_path_buf(),
            operation: "create file",
            source: e,
        })?;

        let mut encoder = image::codecs::gif::GifEncoder::new(file);
        encoder
            .encode_frames(frames)
            .map_err(|e| InpaintError::ImageExport {
                path: output_path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }
}
