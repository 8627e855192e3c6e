use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_CONFIRM_STREAK, DEFAULT_DOWNSAMPLE, DEFAULT_HOLD_MS, DEFAULT_MAX_JUMP_FRAC,
    DEFAULT_MAX_MISS_FRAMES, DEFAULT_MAX_RADIUS_FRAC, DEFAULT_MAX_RESIDUAL_RATIO,
    DEFAULT_MIN_ARC_DEGREES, DEFAULT_MIN_BLOB_PX, DEFAULT_MIN_FIT_POINTS,
    DEFAULT_MIN_RADIUS_FRAC, DEFAULT_MOTION_THRESHOLD, DEFAULT_PATH_BUFFER_SIZE,
    MAX_SWEEP_DEGREES,
};
use crate::error::{GestureError, Result};

/// Tuning for the circular-gesture detector.
///
/// All fractions are relative to the shorter side of the downsampled frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Keep every n-th row and column of the source frame.
    #[serde(default = "default_downsample")]
    pub downsample: usize,
    /// Absolute luma difference at which a pixel counts as moving.
    #[serde(default = "default_motion_threshold")]
    pub motion_threshold: u8,
    /// Minimum pixel count of the largest motion blob.
    #[serde(default = "default_min_blob_px")]
    pub min_blob_px: usize,
    /// Path capacity; the oldest point is evicted beyond this.
    #[serde(default = "default_path_buffer_size")]
    pub path_buffer_size: usize,
    /// Points required before a circle fit is attempted.
    #[serde(default = "default_min_fit_points")]
    pub min_fit_points: usize,
    /// Largest accepted step between consecutive path points.
    #[serde(default = "default_max_jump_frac")]
    pub max_jump_frac: f64,
    /// Consecutive missed frames after which the path is cleared.
    #[serde(default = "default_max_miss_frames")]
    pub max_miss_frames: u32,
    #[serde(default = "default_min_radius_frac")]
    pub min_radius_frac: f64,
    #[serde(default = "default_max_radius_frac")]
    pub max_radius_frac: f64,
    /// Upper bound on RMS radial residual divided by radius.
    #[serde(default = "default_max_residual_ratio")]
    pub max_residual_ratio: f64,
    /// Unwrapped sweep required around the fitted center, in degrees.
    #[serde(default = "default_min_arc_degrees")]
    pub min_arc_degrees: f64,
}

fn default_downsample() -> usize {
    DEFAULT_DOWNSAMPLE
}
fn default_motion_threshold() -> u8 {
    DEFAULT_MOTION_THRESHOLD
}
fn default_min_blob_px() -> usize {
    DEFAULT_MIN_BLOB_PX
}
fn default_path_buffer_size() -> usize {
    DEFAULT_PATH_BUFFER_SIZE
}
fn default_min_fit_points() -> usize {
    DEFAULT_MIN_FIT_POINTS
}
fn default_max_jump_frac() -> f64 {
    DEFAULT_MAX_JUMP_FRAC
}
fn default_max_miss_frames() -> u32 {
    DEFAULT_MAX_MISS_FRAMES
}
fn default_min_radius_frac() -> f64 {
    DEFAULT_MIN_RADIUS_FRAC
}
fn default_max_radius_frac() -> f64 {
    DEFAULT_MAX_RADIUS_FRAC
}
fn default_max_residual_ratio() -> f64 {
    DEFAULT_MAX_RESIDUAL_RATIO
}
fn default_min_arc_degrees() -> f64 {
    DEFAULT_MIN_ARC_DEGREES
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            downsample: DEFAULT_DOWNSAMPLE,
            motion_threshold: DEFAULT_MOTION_THRESHOLD,
            min_blob_px: DEFAULT_MIN_BLOB_PX,
            path_buffer_size: DEFAULT_PATH_BUFFER_SIZE,
            min_fit_points: DEFAULT_MIN_FIT_POINTS,
            max_jump_frac: DEFAULT_MAX_JUMP_FRAC,
            max_miss_frames: DEFAULT_MAX_MISS_FRAMES,
            min_radius_frac: DEFAULT_MIN_RADIUS_FRAC,
            max_radius_frac: DEFAULT_MAX_RADIUS_FRAC,
            max_residual_ratio: DEFAULT_MAX_RESIDUAL_RATIO,
            min_arc_degrees: DEFAULT_MIN_ARC_DEGREES,
        }
    }
}

impl DetectorConfig {
    /// Reject settings the detector cannot operate with.
    pub fn validated(self) -> Result<Self> {
        if self.downsample < 2 {
            return Err(invalid(format!(
                "downsample must be >= 2, got {}",
                self.downsample
            )));
        }
        if self.path_buffer_size == 0 {
            return Err(invalid("path_buffer_size must be > 0".into()));
        }
        if self.min_fit_points < 3 || self.min_fit_points > self.path_buffer_size {
            return Err(invalid(format!(
                "min_fit_points must be in [3, {}], got {}",
                self.path_buffer_size, self.min_fit_points
            )));
        }
        if self.max_miss_frames == 0 {
            return Err(invalid("max_miss_frames must be > 0".into()));
        }
        if !(self.max_jump_frac > 0.0) {
            return Err(invalid(format!(
                "max_jump_frac must be positive, got {}",
                self.max_jump_frac
            )));
        }
        if !(self.min_radius_frac >= 0.0 && self.min_radius_frac <= self.max_radius_frac) {
            return Err(invalid(format!(
                "radius bounds [{}, {}] are inverted or negative",
                self.min_radius_frac, self.max_radius_frac
            )));
        }
        if !(self.max_residual_ratio > 0.0) {
            return Err(invalid(format!(
                "max_residual_ratio must be positive, got {}",
                self.max_residual_ratio
            )));
        }
        if !(self.min_arc_degrees > 0.0 && self.min_arc_degrees <= MAX_SWEEP_DEGREES) {
            return Err(invalid(format!(
                "min_arc_degrees must be in (0, 360], got {}",
                self.min_arc_degrees
            )));
        }
        Ok(self)
    }
}

fn invalid(msg: String) -> GestureError {
    GestureError::InvalidConfig(msg)
}

/// Streak and hold policy applied on top of per-frame detections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfirmConfig {
    /// Net positive frames needed before a detection is confirmed.
    #[serde(default = "default_confirm_streak")]
    pub confirm_streak: u32,
    /// How long a confirmed gesture must persist before triggering.
    #[serde(default = "default_hold_ms")]
    pub hold_ms: u64,
}

fn default_confirm_streak() -> u32 {
    DEFAULT_CONFIRM_STREAK
}
fn default_hold_ms() -> u64 {
    DEFAULT_HOLD_MS
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        Self {
            confirm_streak: DEFAULT_CONFIRM_STREAK,
            hold_ms: DEFAULT_HOLD_MS,
        }
    }
}

impl ConfirmConfig {
    /// Reject settings the gate cannot operate with.
    pub fn validated(self) -> Result<Self> {
        if self.confirm_streak == 0 {
            return Err(invalid("confirm_streak must be > 0".into()));
        }
        Ok(self)
    }
}

/// Top-level settings document, as stored in a TOML file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoopsenseConfig {
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub confirm: ConfirmConfig,
}

impl LoopsenseConfig {
    /// Validate every section of the document.
    pub fn validated(self) -> Result<Self> {
        Ok(Self {
            detector: self.detector.validated()?,
            confirm: self.confirm.validated()?,
        })
    }
}
