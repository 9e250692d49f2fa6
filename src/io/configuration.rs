//! Algorithm constants and runtime configuration defaults

// Patch geometry
/// Default patch radius (patches are `2 * radius + 1` pixels wide)
pub const DEFAULT_PATCH_RADIUS: usize = 2;

/// Fixed seed for reproducible reconstruction
pub const DEFAULT_SEED: u64 = 0;

// Nearest-neighbor field tuning
/// Random candidates tried for a pixel whose correspondence is fully invalid
pub const MAX_RANDOM_RETRIES: usize = 20;

/// Upper bound on EM iterations per pyramid level
pub const MAX_EM_ITERATIONS: usize = 4;

/// Upper bound on minimization passes per EM iteration
pub const MAX_NNF_PASSES: usize = 5;

// Pyramid construction
/// Fraction of masked neighbors above which a downsampled pixel stays a hole
pub const MASKED_NEIGHBOR_THRESHOLD: f64 = 0.75;

// Voting
/// Lower cumulative-weight quantile kept by the trimmed mean
pub const VOTING_LOW_QUANTILE: f64 = 0.40;
/// Upper cumulative-weight quantile kept by the trimmed mean
pub const VOTING_HIGH_QUANTILE: f64 = 0.60;
/// Total weight below which a pixel keeps its previous value
pub const MIN_VOTING_WEIGHT: f64 = 1.0;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_result";
/// Suffix identifying mask images next to their input
pub const MASK_SUFFIX: &str = "_mask";
/// Suffix for the red hole preview
pub const PREVIEW_SUFFIX: &str = "_masked";
/// Suffix for the per-level animation
pub const VISUALIZATION_SUFFIX: &str = "_levels";
/// Image extensions picked up in directory mode
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 400;
/// How many frame delays the final frame is held for
pub const GIF_FINAL_FRAME_HOLD: u32 = 5;
