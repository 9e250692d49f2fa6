//! Unit tests mirroring the `src/` tree, one file per source file

mod spatial;

use image::{Rgb, RgbImage};
use patchfill::MaskedImage;

/// Single-color image with holes at the listed pixels
fn solid_with_holes(width: u32, height: u32, color: [u8; 3], holes: &[(usize, usize)]) -> MaskedImage {
    let mut image = MaskedImage::unmasked(RgbImage::from_pixel(width, height, Rgb(color)));
    for &(x, y) in holes {
        image.set_mask(x, y, true);
    }
    image
}

/// Hole-free image where every pixel differs from its neighbors
fn gradient(width: u32, height: u32) -> MaskedImage {
    MaskedImage::unmasked(RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            ((x * 29 + y * 7) % 256) as u8,
            ((y * 31 + x * 3) % 256) as u8,
            ((x * y * 13 + 50) % 256) as u8,
        ])
    }))
}
