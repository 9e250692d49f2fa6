use bitvec::vec::BitVec;
use image::RgbImage;
use log::{debug, info};
use rand::{SeedableRng, rngs::StdRng};

use crate::algorithm::field::NearestNeighborField;
use crate::algorithm::voting::{VotingBand, reconstruct};
use crate::io::configuration::{
    DEFAULT_PATCH_RADIUS, DEFAULT_SEED, MASKED_NEIGHBOR_THRESHOLD, MAX_EM_ITERATIONS,
    MAX_NNF_PASSES, MAX_RANDOM_RETRIES,
};
use crate::io::error::{InpaintError, Result, invalid_parameter};
use crate::spatial::{MaskedImage, Pyramid};

/// Parameters controlling pyramid construction, field search and voting
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InpaintConfig {
    /// Patch radius (patches are `2 * radius + 1` pixels wide)
    pub radius: usize,
    /// Seed given to the generator of every nearest-neighbor field
    pub seed: u64,
    /// Random candidates tried for a link with no comparable pixel
    pub max_retries: usize,
    /// Masked fraction above which a downsampled pixel stays a hole
    pub masked_neighbor_threshold: f64,
    /// Upper bound on EM iterations per level
    pub max_em_iterations: usize,
    /// Upper bound on minimization passes per EM iteration
    pub max_nnf_passes: usize,
    /// Trimmed-mean band and evidence threshold for voting
    pub voting: VotingBand,
}

impl Default for InpaintConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_PATCH_RADIUS,
            seed: DEFAULT_SEED,
            max_retries: MAX_RANDOM_RETRIES,
            masked_neighbor_threshold: MASKED_NEIGHBOR_THRESHOLD,
            max_em_iterations: MAX_EM_ITERATIONS,
            max_nnf_passes: MAX_NNF_PASSES,
            voting: VotingBand::default(),
        }
    }
}

impl InpaintConfig {
    /// Default configuration with a given patch radius
    pub fn with_radius(radius: usize) -> Self {
        Self {
            radius,
            ..Self::default()
        }
    }

    /// EM iterations and minimization passes used at a pyramid level
    pub fn iterations_for_level(&self, level: usize) -> (usize, usize) {
        (
            (2 * level).min(self.max_em_iterations),
            level.min(self.max_nnf_passes),
        )
    }

    /// Check every parameter against its valid range
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming the first offending field
    pub fn validate(&self) -> Result<()> {
        if self.radius == 0 {
            return Err(invalid_parameter(
                "radius",
                &self.radius,
                &"patch radius must be positive",
            ));
        }
        if !(0.0..=1.0).contains(&self.masked_neighbor_threshold) {
            return Err(invalid_parameter(
                "masked_neighbor_threshold",
                &self.masked_neighbor_threshold,
                &"must lie in [0, 1]",
            ));
        }
        if self.max_em_iterations == 0 {
            return Err(invalid_parameter(
                "max_em_iterations",
                &self.max_em_iterations,
                &"each level needs at least one EM iteration to reach the next",
            ));
        }
        let VotingBand { low, high, .. } = self.voting;
        if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) || low > high {
            return Err(invalid_parameter(
                "voting",
                &format!("[{low}, {high}]"),
                &"band must satisfy 0 <= low <= high <= 1",
            ));
        }
        Ok(())
    }
}

/// Hooks for following a reconstruction as it runs
///
/// All methods default to doing nothing.
pub trait ReconstructionObserver {
    /// The pyramid has been built with `levels` levels
    fn pyramid_built(&mut self, _levels: usize) {}

    /// An EM iteration at `level` finished (`iteration` counts from 1)
    fn em_iteration(&mut self, _level: usize, _iteration: usize, _total: usize) {}

    /// The seed for `level - 1` has been reconstructed from `level`
    fn level_finished(&mut self, _level: usize, _reconstructed: &MaskedImage) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl ReconstructionObserver for SilentObserver {}

/// Total EM iterations a run over a pyramid of `levels` levels performs
pub fn total_em_iterations(config: &InpaintConfig, levels: usize) -> usize {
    (1..levels)
        .map(|level| config.iterations_for_level(level).0)
        .sum()
}

/// Coarse-to-fine PatchMatch hole filling
#[derive(Debug, Clone, Copy, Default)]
pub struct Inpainter {
    config: InpaintConfig,
}

impl Inpainter {
    /// Create an inpainter with the given configuration
    pub const fn new(config: InpaintConfig) -> Self {
        Self { config }
    }

    /// The configuration in use
    pub const fn config(&self) -> &InpaintConfig {
        &self.config
    }

    /// Build the pyramid this configuration would use for an image
    pub fn build_pyramid(&self, image: &MaskedImage) -> Pyramid {
        Pyramid::build(
            image,
            self.config.radius,
            self.config.masked_neighbor_threshold,
        )
    }

    /// Validate the configuration and input, then fill the holes
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the image is empty
    pub fn try_inpaint(&self, image: &MaskedImage) -> Result<MaskedImage> {
        self.try_inpaint_observed(image, &mut SilentObserver)
    }

    /// Validating variant of [`Inpainter::inpaint_observed`]
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the image is empty
    pub fn try_inpaint_observed(
        &self,
        image: &MaskedImage,
        observer: &mut impl ReconstructionObserver,
    ) -> Result<MaskedImage> {
        self.config.validate()?;
        if image.width() == 0 || image.height() == 0 {
            return Err(InpaintError::InvalidSourceData {
                reason: "image has no pixels".to_string(),
            });
        }
        Ok(self.inpaint_observed(image, observer))
    }

    /// Fill the holes of `image`, returning a hole-free image of the same size
    pub fn inpaint(&self, image: &MaskedImage) -> MaskedImage {
        self.inpaint_observed(image, &mut SilentObserver)
    }

    /// Fill the holes of `image`, reporting progress to `observer`
    pub fn inpaint_observed(
        &self,
        image: &MaskedImage,
        observer: &mut impl ReconstructionObserver,
    ) -> MaskedImage {
        let pyramid = self.build_pyramid(image);
        info!(
            "Built pyramid of {} levels for {}x{} image with {} hole pixels",
            pyramid.len(),
            image.width(),
            image.height(),
            image.count_masked()
        );
        observer.pyramid_built(pyramid.len());

        // The coarsest level is small enough to treat as hole-free
        let mut target = pyramid.coarsest().cloned().unwrap_or_else(|| image.clone());
        target.clear_mask();

        let mut previous: Option<NearestNeighborField<'_, StdRng>> = None;

        for level in (1..pyramid.len()).rev() {
            let (Some(source), Some(finer)) = (pyramid.level(level), pyramid.level(level - 1))
            else {
                break;
            };
            debug!(
                "Level {level}: {}x{} source, target {}x{}",
                source.width(),
                source.height(),
                target.width(),
                target.height()
            );

            let mut field = NearestNeighborField::new(
                target,
                source,
                self.config.radius,
                StdRng::seed_from_u64(self.config.seed),
            )
            .with_retry_limit(self.config.max_retries);

            match &previous {
                None => field.randomize(),
                Some(coarser) => field.initialize(coarser),
            }

            target = self.expectation_maximization(&mut field, level, finer, observer);
            observer.level_finished(level, &target);
            previous = Some(field);
        }

        info!("Reconstruction finished at {}x{}", target.width(), target.height());
        target
    }

    /// Alternate field minimization and voting at one level
    ///
    /// The last iteration votes at double resolution against the next finer
    /// source, producing the seed target for that level directly.
    fn expectation_maximization(
        &self,
        field: &mut NearestNeighborField<'_, StdRng>,
        level: usize,
        finer: &MaskedImage,
        observer: &mut impl ReconstructionObserver,
    ) -> MaskedImage {
        let (em_iterations, nnf_passes) = self.config.iterations_for_level(level);
        debug!("Level {level}: {em_iterations} EM iterations, {nnf_passes} passes each");

        let mut reconstructed: Option<MaskedImage> = None;

        for iteration in 1..=em_iterations {
            if let Some(next) = reconstructed.take() {
                field.replace_target(next);
            }

            field.minimize(nnf_passes);

            let upscaled = iteration == em_iterations;
            let (source, mut next) = if upscaled {
                (finer, field.target().upscale(finer.width(), finer.height()))
            } else {
                (field.source(), field.target().clone())
            };

            reconstruct(
                field.links(),
                field.radius(),
                source,
                &mut next,
                upscaled,
                self.config.voting,
            );

            debug!(
                "Level {level}: EM iteration {iteration}/{em_iterations} voted {}x{}",
                next.width(),
                next.height()
            );
            observer.em_iteration(level, iteration, em_iterations);
            reconstructed = Some(next);
        }

        reconstructed.unwrap_or_else(|| field.target().upscale(finer.width(), finer.height()))
    }
}

/// Fill holes in an RGB image given a row-major hole mask
///
/// # Errors
///
/// Returns an error if the mask size differs from the image, the image is
/// empty, or the radius is zero
pub fn inpaint(pixels: RgbImage, mask: BitVec, radius: usize) -> Result<RgbImage> {
    let masked = MaskedImage::new(pixels, mask)?;
    let inpainter = Inpainter::new(InpaintConfig::with_radius(radius));
    Ok(inpainter.try_inpaint(&masked)?.into_pixels())
}
