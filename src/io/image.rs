//! Image and mask file handling with hole preview rendering

use std::path::Path;

use bitvec::prelude::*;
use image::{Rgb, RgbImage, RgbaImage};

use crate::io::error::{InpaintError, Result};
use crate::spatial::MaskedImage;

/// Color painted over hole pixels in previews
pub const HOLE_PREVIEW_COLOR: [u8; 3] = [255, 0, 0];

/// Load an image file as 8-bit RGB
///
/// # Errors
///
/// Returns `ImageLoad` if the file cannot be opened or decoded
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    let img = image::open(path).map_err(|e| InpaintError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(img.to_rgb8())
}

/// Convert a mask image to a row-major hole bitset
///
/// Any pixel that is not opaque black marks a hole.
pub fn mask_from_image(mask: &RgbaImage) -> BitVec {
    mask.pixels().map(|p| p.0 != [0, 0, 0, 255]).collect()
}

/// Load an image together with its mask file
///
/// # Errors
///
/// Returns an error if either file cannot be loaded or their sizes differ
pub fn load_masked_image(image_path: &Path, mask_path: &Path) -> Result<MaskedImage> {
    let pixels = load_rgb(image_path)?;
    let mask_img = image::open(mask_path)
        .map_err(|e| InpaintError::ImageLoad {
            path: mask_path.to_path_buf(),
            source: e,
        })?
        .to_rgba8();

    if mask_img.dimensions() != pixels.dimensions() {
        return Err(InpaintError::DimensionMismatch {
            image: (pixels.width() as usize, pixels.height() as usize),
            mask: (mask_img.width() as usize, mask_img.height() as usize),
        });
    }

    MaskedImage::new(pixels, mask_from_image(&mask_img))
}

/// Copy of the image with every hole painted in `HOLE_PREVIEW_COLOR`
pub fn overlay_mask(image: &MaskedImage) -> RgbImage {
    let mut preview = image.pixels().clone();
    for (pixel, hole) in preview.pixels_mut().zip(image.mask().iter().by_vals()) {
        if hole {
            *pixel = Rgb(HOLE_PREVIEW_COLOR);
        }
    }
    preview
}

/// Save an RGB image, creating parent directories as needed
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the image
/// cannot be encoded to the path
pub fn export_rgb(image: &RgbImage, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| InpaintError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    image
        .save(output_path)
        .map_err(|e| InpaintError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}
