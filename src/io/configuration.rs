//! Sampling constants and runtime configuration defaults

// Rejection sampling budget
/// Number of valid locations targeted per volume unless configured otherwise
pub const DEFAULT_PATCH_PER_VOLUME: usize = 1;
/// Maximum number of candidate batches drawn per volume
pub const MAX_TRIALS: usize = 10;
/// Candidates drawn per trial for every requested patch
pub const CANDIDATES_PER_PATCH: usize = 10;

// Augmentation ranges
/// Lower bound of the random rotation angle in degrees
pub const ROTATION_MIN_ANGLE: f64 = -10.0;
/// Upper bound of the random rotation angle in degrees
pub const ROTATION_MAX_ANGLE: f64 = 10.0;
/// Maximum zoom deviation of the spatial scaling layer in percent
pub const SCALING_MAX_PERCENTAGE: f64 = 10.0;

/// Augmentation methods enabled when none are specified
pub const DEFAULT_AUGMENTATION_METHODS: [&str; 2] = ["rotation", "spatial_scaling"];

/// Largest supported spatial rank
pub const MAX_SPATIAL_RANK: usize = 4;

// Default values for the command-line demo
/// Fixed seed for reproducible sampling
pub const DEFAULT_SEED: u64 = 42;
/// Number of synthetic volumes generated
pub const DEFAULT_VOLUME_COUNT: usize = 4;
/// Edge length of each synthetic volume
pub const DEFAULT_VOLUME_EXTENT: usize = 64;
/// Edge length of each sampled patch
pub const DEFAULT_PATCH_SIZE: usize = 32;
/// Number of label classes painted into synthetic volumes
pub const DEFAULT_LABEL_CLASSES: usize = 3;
/// Minimum distinct labels a patch must contain
pub const DEFAULT_MIN_LABELS: usize = 2;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
