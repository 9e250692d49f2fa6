//! Command-line interface for batch hole filling of image files

use crate::algorithm::executor::{
    InpaintConfig, Inpainter, ReconstructionObserver, total_em_iterations,
};
use crate::io::configuration::{
    DEFAULT_PATCH_RADIUS, DEFAULT_SEED, GIF_FINAL_FRAME_HOLD, GIF_FRAME_DELAY_MS, MASK_SUFFIX,
    OUTPUT_SUFFIX, PREVIEW_SUFFIX, SUPPORTED_EXTENSIONS, VISUALIZATION_SUFFIX,
};
use crate::io::error::{InpaintError, Result};
use crate::io::image::{export_rgb, load_masked_image, overlay_mask};
use crate::io::progress::ProgressManager;
use crate::io::visualization::LevelCapture;
use crate::spatial::MaskedImage;
use clap::Parser;
use log::{LevelFilter, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "patchfill")]
#[command(
    author,
    version,
    about = "Fill masked holes in images using PatchMatch"
)]
/// Command-line arguments for the hole filling tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input image file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Mask image for a single input (defaults to <input>_mask.png)
    #[arg(short, long)]
    pub mask: Option<PathBuf>,

    /// Patch radius in pixels
    #[arg(short, long, default_value_t = DEFAULT_PATCH_RADIUS)]
    pub radius: usize,

    /// Random seed for reproducible reconstruction
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Export an animated GIF of every pyramid level
    #[arg(long)]
    pub visualize: bool,

    /// Export the input with holes painted red
    #[arg(short, long)]
    pub preview: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Log algorithm details
    #[arg(short, long)]
    pub verbose: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Log filter implied by the flags, before `RUST_LOG` overrides
    pub const fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Error
        } else {
            LevelFilter::Warn
        }
    }

    /// Install the terminal logger
    pub fn init_logging(&self) {
        // A host or test harness may already have installed a logger
        let _ = env_logger::Builder::new()
            .filter_level(self.log_level())
            .parse_default_env()
            .try_init();
    }

    /// Inpainting configuration selected by the flags
    pub fn config(&self) -> InpaintConfig {
        InpaintConfig {
            radius: self.radius,
            seed: self.seed,
            ..InpaintConfig::default()
        }
    }
}

/// Forwards reconstruction events to the progress display and level capture
struct RunObserver<'a> {
    progress: Option<&'a mut ProgressManager>,
    capture: Option<&'a mut LevelCapture>,
    config: InpaintConfig,
    index: usize,
}

impl ReconstructionObserver for RunObserver<'_> {
    fn pyramid_built(&mut self, levels: usize) {
        let total = total_em_iterations(&self.config, levels);
        if let Some(pm) = self.progress.as_deref_mut() {
            pm.set_total(self.index, total);
        }
    }

    fn em_iteration(&mut self, level: usize, _iteration: usize, _total: usize) {
        if let Some(pm) = self.progress.as_deref_mut() {
            pm.advance(self.index, level);
        }
    }

    fn level_finished(&mut self, level: usize, reconstructed: &MaskedImage) {
        if let Some(capture) = self.capture.as_deref_mut() {
            capture.record(level, reconstructed);
        }
    }
}

/// Orchestrates batch processing of images with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, target validation
    /// fails, or any file cannot be loaded, reconstructed or exported
    pub fn process(&mut self) -> Result<()> {
        self.cli.config().validate()?;
        let jobs = self.collect_jobs()?;

        if jobs.is_empty() {
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(jobs.len());
        }

        for (index, (input, mask)) in jobs.iter().enumerate() {
            self.process_file(input, mask, index)?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    /// Pair every input with its mask, dropping those that should be skipped
    fn collect_jobs(&self) -> Result<Vec<(PathBuf, PathBuf)>> {
        let target = &self.cli.target;

        if target.is_file() {
            if !is_supported_image(target) {
                return Err(crate::io::error::io_error(
                    "Target file must be a PNG, JPEG or BMP image",
                ));
            }
            let mask = self
                .cli
                .mask
                .clone()
                .unwrap_or_else(|| Self::get_mask_path(target));
            if !mask.exists() {
                return Err(InpaintError::FileSystem {
                    path: mask,
                    operation: "locate mask",
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                });
            }
            Ok(if self.should_process_file(target) {
                vec![(target.clone(), mask)]
            } else {
                vec![]
            })
        } else if target.is_dir() {
            let mut jobs = Vec::new();
            for entry in std::fs::read_dir(target)? {
                let path = entry?.path();
                if !is_supported_image(&path) || is_derived_file(&path) {
                    continue;
                }
                let mask = Self::get_mask_path(&path);
                if !mask.exists() {
                    info!("Skipping {}: no mask at {}", path.display(), mask.display());
                    continue;
                }
                if self.should_process_file(&path) {
                    jobs.push((path, mask));
                }
            }
            jobs.sort();
            Ok(jobs)
        } else {
            Err(crate::io::error::io_error(
                "Target must be an image file or directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = Self::get_output_path(input_path);
        if output_path.exists() {
            warn!("Skipping: {} (output exists)", input_path.display());
            false
        } else {
            true
        }
    }

    fn process_file(&mut self, input_path: &Path, mask_path: &Path, index: usize) -> Result<()> {
        let start_time = Instant::now();

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path);
        }

        let image = load_masked_image(input_path, mask_path)?;

        if self.cli.preview {
            export_rgb(&overlay_mask(&image), &Self::get_preview_path(input_path))?;
        }

        let config = self.cli.config();
        let mut capture = self
            .cli
            .visualize
            .then(|| LevelCapture::new(image.width() as u32, image.height() as u32));

        let result = {
            let mut observer = RunObserver {
                progress: self.progress_manager.as_mut(),
                capture: capture.as_mut(),
                config,
                index,
            };
            Inpainter::new(config).try_inpaint_observed(&image, &mut observer)?
        };

        export_rgb(result.pixels(), &Self::get_output_path(input_path))?;

        if let Some(capture) = capture {
            if capture.frame_count() > 0 {
                capture.export_gif(
                    &Self::get_visualization_path(input_path),
                    GIF_FRAME_DELAY_MS,
                    GIF_FINAL_FRAME_HOLD,
                )?;
            } else {
                info!(
                    "{} has no holes to reconstruct; no animation written",
                    input_path.display()
                );
            }
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index);
        }
        info!(
            "Filled {} in {:.2?}",
            input_path.display(),
            start_time.elapsed()
        );

        Ok(())
    }

    fn sibling_path(input_path: &Path, suffix: &str, extension: &str) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let name = format!("{}{suffix}.{extension}", stem.to_string_lossy());

        if let Some(parent) = input_path.parent() {
            parent.join(name)
        } else {
            PathBuf::from(name)
        }
    }

    /// Default mask location for an input
    pub fn get_mask_path(input_path: &Path) -> PathBuf {
        Self::sibling_path(input_path, MASK_SUFFIX, "png")
    }

    /// Output location for an input, keeping its extension
    pub fn get_output_path(input_path: &Path) -> PathBuf {
        let extension = input_path.extension().unwrap_or_default().to_string_lossy();
        Self::sibling_path(input_path, OUTPUT_SUFFIX, &extension)
    }

    fn get_preview_path(input_path: &Path) -> PathBuf {
        Self::sibling_path(input_path, PREVIEW_SUFFIX, "png")
    }

    fn get_visualization_path(input_path: &Path) -> PathBuf {
        Self::sibling_path(input_path, VISUALIZATION_SUFFIX, "gif")
    }
}

/// Whether the file extension is one the tool reads
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// Masks and outputs written next to inputs are not inputs themselves
pub fn is_derived_file(path: &Path) -> bool {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    [MASK_SUFFIX, OUTPUT_SUFFIX, PREVIEW_SUFFIX, VISUALIZATION_SUFFIX]
        .iter()
        .any(|suffix| stem.ends_with(suffix))
}
