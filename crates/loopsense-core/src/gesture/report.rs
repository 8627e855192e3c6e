use crate::detection::Blob;
use crate::fit::CircleCheck;
use crate::frame::Point2;

/// How the current frame contributed to the path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Observation {
    /// The frame layout could not be read; counted as a miss.
    Unreadable,
    /// No previous buffer to difference against (session start or
    /// resolution change); counted as a miss.
    NoReference,
    /// No motion blob above the size threshold; counted as a miss.
    NoMotion,
    /// The blob centroid was appended to the path.
    Accepted(Blob),
    /// The blob centroid jumped implausibly far and was dropped.
    TrackingGlitch(Blob),
}

impl Observation {
    pub fn is_miss(&self) -> bool {
        matches!(
            self,
            Observation::Unreadable | Observation::NoReference | Observation::NoMotion
        )
    }
}

/// Outcome of the fitting stage for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FitStatus {
    /// The path is shorter than the minimum; no fit was attempted.
    InsufficientHistory { have: usize, need: usize },
    /// Singular normal equations or non-positive squared radius.
    Degenerate,
    /// A circle was fitted; see the individual checks.
    Fitted(CircleCheck),
}

/// Everything the detector decided about one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub observation: Observation,
    pub fit: FitStatus,
    /// The path was emptied on this frame by the miss limit.
    pub path_cleared: bool,
    pub detected: bool,
}

/// Read-only detector state for live feedback.
///
/// Fit fields keep their last computed values until the next successful fit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Diagnostics {
    /// Last fitted center in square-normalized space.
    pub center: Point2,
    pub radius: f64,
    pub arc_degrees: f64,
    pub residual_ratio: f64,
    pub path_len: usize,
    /// Raw blob centroid of the latest frame, in downsampled pixels.
    pub current_point: Option<Point2>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            center: Point2::new(0.5, 0.5),
            radius: 0.0,
            arc_degrees: 0.0,
            residual_ratio: 0.0,
            path_len: 0,
            current_point: None,
        }
    }
}
