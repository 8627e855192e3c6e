/// Default integer downsample factor applied to incoming luma frames.
/// Every 4th row and column is kept, cutting per-frame work by 16x.
pub const DEFAULT_DOWNSAMPLE: usize = 4;

/// Default absolute luma difference (8-bit scale) that marks a pixel as moving.
pub const DEFAULT_MOTION_THRESHOLD: u8 = 18;

/// Default minimum size (downsampled pixels) of the largest motion blob.
pub const DEFAULT_MIN_BLOB_PX: usize = 25;

/// Default path capacity. About 3.6 s of history at 25 fps.
pub const DEFAULT_PATH_BUFFER_SIZE: usize = 90;

/// Default number of path points required before a circle fit is attempted.
pub const DEFAULT_MIN_FIT_POINTS: usize = 16;

/// Default maximum single-frame centroid jump, as a fraction of the short side.
pub const DEFAULT_MAX_JUMP_FRAC: f64 = 0.20;

/// Default number of consecutive missed frames that clears the path.
pub const DEFAULT_MAX_MISS_FRAMES: u32 = 10;

/// Default smallest plausible circle radius (fraction of the short side).
pub const DEFAULT_MIN_RADIUS_FRAC: f64 = 0.07;

/// Default largest plausible circle radius (fraction of the short side).
pub const DEFAULT_MAX_RADIUS_FRAC: f64 = 0.60;

/// Default upper bound on RMS radial residual divided by the fitted radius.
pub const DEFAULT_MAX_RESIDUAL_RATIO: f64 = 0.32;

/// Default unwrapped angular sweep (degrees) required for a detection.
pub const DEFAULT_MIN_ARC_DEGREES: f64 = 260.0;

/// Default number of net positive frames before a detection counts as confirmed.
pub const DEFAULT_CONFIRM_STREAK: u32 = 3;

/// Default time a confirmed gesture must be held before the gate triggers.
pub const DEFAULT_HOLD_MS: u64 = 2000;

/// Extra headroom above the confirmation streak that the streak counter may
/// accumulate, so a single negative frame does not drop confirmation.
pub const CONFIRM_STREAK_HEADROOM: u32 = 2;

/// Pivots with smaller magnitude than this mark a linear system as singular.
pub const PIVOT_EPSILON: f64 = 1e-12;

/// Floor applied to the fitted radius when computing the residual ratio.
pub const MIN_RADIUS_EPSILON: f64 = 1e-6;

/// Largest unwrapped sweep ever reported, in degrees.
pub const MAX_SWEEP_DEGREES: f64 = 360.0;

/// Frame rate assumed for recordings that carry no per-frame timestamps.
pub const DEFAULT_FRAME_RATE: f64 = 25.0;

/// SER timestamps count 100 ns ticks.
pub const SER_TICKS_PER_MICROSECOND: u64 = 10;
