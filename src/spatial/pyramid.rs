//! Multi-resolution stack of masked images for coarse-to-fine reconstruction

use crate::spatial::masked_image::MaskedImage;

/// Ordered resolution levels, finest first
///
/// Level 0 is the input; each further level is a half-size downsample of the
/// previous one. Levels are never modified once the pyramid is built.
#[derive(Debug, Clone)]
pub struct Pyramid {
    levels: Vec<MaskedImage>,
}

impl Pyramid {
    /// Downsample repeatedly until no hole remains or a side reaches the radius
    pub fn build(image: &MaskedImage, radius: usize, masked_threshold: f64) -> Self {
        let mut levels = vec![image.clone()];

        while let Some(current) = levels.last() {
            if current.width() <= radius
                || current.height() <= radius
                || current.count_masked() == 0
            {
                break;
            }
            let reduced = current.downsample(masked_threshold);
            levels.push(reduced);
        }

        Self { levels }
    }

    /// Number of levels, including the input
    pub const fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false: a pyramid holds at least the input level
    pub const fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Image at a level index (0 = input resolution)
    pub fn level(&self, index: usize) -> Option<&MaskedImage> {
        self.levels.get(index)
    }

    /// All levels, finest first
    pub fn levels(&self) -> &[MaskedImage] {
        &self.levels
    }

    /// The input resolution level
    pub fn finest(&self) -> Option<&MaskedImage> {
        self.levels.first()
    }

    /// The smallest level
    pub fn coarsest(&self) -> Option<&MaskedImage> {
        self.levels.last()
    }
}
