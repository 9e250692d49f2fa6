//! RGB pixel grid paired with a same-shaped occlusion mask
//!
//! Holes are tracked per pixel in a row-major bitset. Every derived image
//! (`clone`, `downsample`, `upscale`) owns fresh pixel and mask storage.

use bitvec::prelude::*;
use image::{Rgb, RgbImage, imageops};

use crate::io::error::{InpaintError, Result};

/// Binomial smoothing kernel for axes of even length
const KERNEL_EVEN: [u64; 6] = [1, 5, 10, 10, 5, 1];
/// Binomial smoothing kernel for axes of odd length
const KERNEL_ODD: [u64; 5] = [1, 4, 6, 4, 1];
/// Offset of the kernel's first tap relative to the sampled input pixel
const KERNEL_ORIGIN: usize = 2;

/// Image whose pixels may be marked unknown ("holes")
///
/// A set mask bit means the pixel value is unknown and must be synthesized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedImage {
    pixels: RgbImage,
    mask: BitVec,
}

impl MaskedImage {
    /// Pair an image with a row-major mask (`true` = hole)
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the mask does not hold exactly one
    /// bit per pixel
    pub fn new(pixels: RgbImage, mask: BitVec) -> Result<Self> {
        let (width, height) = (pixels.width() as usize, pixels.height() as usize);
        if mask.len() != width * height {
            return Err(InpaintError::DimensionMismatch {
                image: (width, height),
                mask: (mask.len(), 1),
            });
        }
        Ok(Self { pixels, mask })
    }

    /// Wrap an image with no holes
    pub fn unmasked(pixels: RgbImage) -> Self {
        let cells = pixels.width() as usize * pixels.height() as usize;
        Self {
            pixels,
            mask: bitvec![0; cells],
        }
    }

    /// Black canvas with no holes
    pub fn blank(width: usize, height: usize) -> Self {
        Self::unmasked(RgbImage::new(width as u32, height as u32))
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.pixels.width() as usize
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.pixels.height() as usize
    }

    /// Borrow the pixel data
    pub const fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Borrow the row-major hole mask
    pub fn mask(&self) -> &BitSlice {
        &self.mask
    }

    /// Consume the image, keeping only the pixel data
    pub fn into_pixels(self) -> RgbImage {
        self.pixels
    }

    /// Check whether signed coordinates fall inside the image
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width() && (y as usize) < self.height()
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width() && y < self.height()).then(|| y * self.width() + x)
    }

    /// Channel samples at a pixel, black outside the image
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        self.pixels
            .get_pixel_checked(x as u32, y as u32)
            .map_or([0, 0, 0], |p| p.0)
    }

    /// Overwrite a pixel's channel samples; ignored outside the image
    pub fn set_pixel(&mut self, x: usize, y: usize, value: [u8; 3]) {
        if let Some(pixel) = self.pixels.get_pixel_mut_checked(x as u32, y as u32) {
            *pixel = Rgb(value);
        }
    }

    /// Whether the pixel is a hole (out-of-bounds pixels are not)
    pub fn is_masked(&self, x: usize, y: usize) -> bool {
        self.index(x, y)
            .is_some_and(|i| self.mask.get(i).as_deref() == Some(&true))
    }

    /// Mark or unmark a pixel as a hole; ignored outside the image
    pub fn set_mask(&mut self, x: usize, y: usize, value: bool) {
        if let Some(i) = self.index(x, y) {
            self.mask.set(i, value);
        }
    }

    /// Mark every pixel as known
    pub fn clear_mask(&mut self) {
        self.mask.fill(false);
    }

    /// Channel samples of an in-bounds, known pixel
    ///
    /// Returns `None` for holes and coordinates outside the image, which are
    /// exactly the pixels that cannot serve as evidence.
    pub fn known_pixel(&self, x: i32, y: i32) -> Option<[u8; 3]> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (!self.is_masked(x, y)).then(|| self.pixel(x, y))
    }

    /// Number of hole pixels
    pub fn count_masked(&self) -> usize {
        self.mask.count_ones()
    }

    /// Half-resolution copy smoothed with a binomial kernel
    ///
    /// Hole pixels never contribute color. An output pixel becomes a hole when
    /// none of its neighborhood is known, or when more than
    /// `masked_threshold` of the sampled neighborhood is masked.
    pub fn downsample(&self, masked_threshold: f64) -> Self {
        let (width, height) = (self.width(), self.height());
        let kernel_x = binomial_kernel(width);
        let kernel_y = binomial_kernel(height);

        let mut reduced = Self::blank(width / 2, height / 2);

        for ny in 0..height / 2 {
            for nx in 0..width / 2 {
                let (x, y) = (2 * nx, 2 * ny);
                let mut sums = [0u64; 3];
                let mut kernel_sum = 0u64;
                let mut masked = 0usize;
                let mut total = 0usize;

                for (dy, &ky) in kernel_y.iter().enumerate() {
                    let Some(yk) = (y + dy).checked_sub(KERNEL_ORIGIN).filter(|&v| v < height)
                    else {
                        continue;
                    };
                    for (dx, &kx) in kernel_x.iter().enumerate() {
                        let Some(xk) = (x + dx).checked_sub(KERNEL_ORIGIN).filter(|&v| v < width)
                        else {
                            continue;
                        };

                        total += 1;
                        if self.is_masked(xk, yk) {
                            masked += 1;
                            continue;
                        }

                        let k = kx * ky;
                        for (sum, sample) in sums.iter_mut().zip(self.pixel(xk, yk)) {
                            *sum += k * u64::from(sample);
                        }
                        kernel_sum += k;
                    }
                }

                if kernel_sum > 0 {
                    let value = sums.map(|s| (s as f64 / kernel_sum as f64 + 0.5) as u8);
                    reduced.set_pixel(nx, ny, value);
                }

                let hidden = kernel_sum == 0 || masked as f64 > masked_threshold * total as f64;
                reduced.set_mask(nx, ny, hidden);
            }
        }

        reduced
    }

    /// Resample to a new size with a bilinear filter
    ///
    /// The result carries no holes: the driver treats it as a fully known seed.
    pub fn upscale(&self, width: usize, height: usize) -> Self {
        if width == 0 || height == 0 || self.width() == 0 || self.height() == 0 {
            return Self::blank(width, height);
        }
        let resized = imageops::resize(
            &self.pixels,
            width as u32,
            height as u32,
            imageops::FilterType::Triangle,
        );
        Self::unmasked(resized)
    }
}

fn binomial_kernel(axis_len: usize) -> &'static [u64] {
    if axis_len % 2 == 0 {
        &KERNEL_EVEN
    } else {
        &KERNEL_ODD
    }
}
