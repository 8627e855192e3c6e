use ndarray::Array2;
use tracing::{debug, trace, warn};

use crate::config::DetectorConfig;
use crate::detection::{largest_motion_blob, Blob};
use crate::error::Result;
use crate::fit::check_circle;
use crate::frame::{LumaFrame, Point2};
use crate::preprocess::downsample;

use super::path::{square_normalize, PathAccumulator, PathUpdate};
use super::report::{Diagnostics, FitStatus, FrameReport, Observation};

/// Motion-based circular-gesture detector.
///
/// Feed one luma frame per call. The detector differences it against the
/// previous frame, tracks the centroid of the largest moving blob in
/// square-normalized space, and reports a detection once the recent path
/// fits a plausibly sized circle that was traced in one direction.
///
/// All temporal state lives in this struct and is mutated in place; callers
/// must serialize calls.
#[derive(Clone, Debug)]
pub struct CircleGestureDetector {
    config: DetectorConfig,
    prev_luma: Option<Array2<u8>>,
    path: PathAccumulator,
    diagnostics: Diagnostics,
}

impl CircleGestureDetector {
    pub fn new(config: DetectorConfig) -> Result<Self> {
        let config = config.validated()?;
        let path = PathAccumulator::new(&config);
        Ok(Self {
            config,
            prev_luma: None,
            path,
            diagnostics: Diagnostics::default(),
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Process one frame and return whether a circle is detected on it.
    pub fn process_frame(&mut self, frame: &LumaFrame<'_>) -> bool {
        self.process(frame).detected
    }

    /// Process one frame and return the full per-frame report.
    pub fn process(&mut self, frame: &LumaFrame<'_>) -> FrameReport {
        let luma = match downsample(frame, self.config.downsample) {
            Ok(luma) => luma,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable frame");
                return self.apply_miss(Observation::Unreadable);
            }
        };

        if let Some(prev) = &self.prev_luma {
            if prev.dim() != luma.dim() {
                debug!(
                    from = ?prev.dim(),
                    to = ?luma.dim(),
                    "Frame resolution changed, resetting session"
                );
                self.reset();
            }
        }

        let (h, w) = luma.dim();
        let blob = match self.prev_luma.take() {
            None => None,
            Some(prev) => {
                match largest_motion_blob(
                    &prev,
                    &luma,
                    self.config.motion_threshold,
                    self.config.min_blob_px,
                ) {
                    Ok(blob) => Some(blob),
                    Err(e) => {
                        warn!(error = %e, "Motion segmentation failed");
                        Some(None)
                    }
                }
            }
        };
        self.prev_luma = Some(luma);

        match blob {
            None => self.apply_miss(Observation::NoReference),
            Some(None) => self.apply_miss(Observation::NoMotion),
            Some(Some(blob)) => self.apply_blob(blob, w.min(h)),
        }
    }

    /// Advance the detector with an externally computed blob.
    ///
    /// `blob` is in downsampled pixels of a frame whose shorter side is
    /// `short_side` pixels; `None` counts as a frame without motion. This
    /// skips frame differencing entirely and leaves the stored previous
    /// buffer untouched.
    pub fn observe(&mut self, blob: Option<Blob>, short_side: usize) -> FrameReport {
        match blob {
            Some(blob) => self.apply_blob(blob, short_side),
            None => self.apply_miss(Observation::NoMotion),
        }
    }

    /// Clear all temporal state: path, miss counter, previous buffer and
    /// diagnostics.
    pub fn reset(&mut self) {
        debug!("Resetting circle gesture detector");
        self.prev_luma = None;
        self.path.clear();
        self.diagnostics = Diagnostics::default();
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn path_len(&self) -> usize {
        self.path.len()
    }

    /// Current path, oldest point first, in square-normalized space.
    pub fn path(&self) -> impl Iterator<Item = &Point2> + '_ {
        self.path.iter()
    }

    pub fn miss_count(&self) -> u32 {
        self.path.miss_count()
    }

    fn apply_blob(&mut self, blob: Blob, short_side: usize) -> FrameReport {
        self.diagnostics.current_point = Some(Point2::new(blob.cx, blob.cy));

        let point = square_normalize(blob.cx, blob.cy, short_side);
        let observation = match self.path.push(point) {
            PathUpdate::Rejected { jump } => {
                debug!(jump, "Dropping tracking glitch");
                Observation::TrackingGlitch(blob)
            }
            _ => Observation::Accepted(blob),
        };
        self.finish(observation, false)
    }

    fn apply_miss(&mut self, observation: Observation) -> FrameReport {
        self.diagnostics.current_point = None;

        let cleared = self.path.record_miss() == PathUpdate::Cleared;
        if cleared {
            debug!(
                misses = self.config.max_miss_frames,
                "Path cleared after consecutive missed frames"
            );
        }
        self.finish(observation, cleared)
    }

    fn finish(&mut self, observation: Observation, path_cleared: bool) -> FrameReport {
        self.diagnostics.path_len = self.path.len();

        let fit = self.fit_path();
        let detected = matches!(fit, FitStatus::Fitted(check) if check.is_circle());

        trace!(
            ?observation,
            path_len = self.diagnostics.path_len,
            arc = self.diagnostics.arc_degrees,
            residual = self.diagnostics.residual_ratio,
            detected,
            "Frame processed"
        );
        if detected {
            debug!(
                cx = self.diagnostics.center.x,
                cy = self.diagnostics.center.y,
                radius = self.diagnostics.radius,
                arc = self.diagnostics.arc_degrees,
                "Circle gesture detected"
            );
        }

        FrameReport {
            observation,
            fit,
            path_cleared,
            detected,
        }
    }

    fn fit_path(&mut self) -> FitStatus {
        let have = self.path.len();
        let need = self.config.min_fit_points;
        if have < need {
            return FitStatus::InsufficientHistory { have, need };
        }

        match check_circle(self.path.iter(), &self.config) {
            None => FitStatus::Degenerate,
            Some(check) => {
                self.diagnostics.center = Point2::new(check.circle.cx, check.circle.cy);
                self.diagnostics.radius = check.circle.radius;
                self.diagnostics.arc_degrees = check.arc_degrees;
                self.diagnostics.residual_ratio = check.circle.residual_ratio;
                FitStatus::Fitted(check)
            }
        }
    }
}

impl Default for CircleGestureDetector {
    fn default() -> Self {
        let config = DetectorConfig::default();
        Self {
            path: PathAccumulator::new(&config),
            config,
            prev_luma: None,
            diagnostics: Diagnostics::default(),
        }
    }
}
