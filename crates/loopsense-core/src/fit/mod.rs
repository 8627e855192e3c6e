//! Circle fitting and arc validation over an ordered path.

pub mod circle;
pub mod solver;
pub mod sweep;

use crate::config::DetectorConfig;
use crate::frame::Point2;

pub use circle::{fit_circle, CircleFit};
pub use solver::solve3x3;
pub use sweep::unwrapped_sweep_degrees;

/// A fitted circle plus the outcome of each acceptance check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleCheck {
    pub circle: CircleFit,
    /// Unwrapped sweep around the fitted center, in degrees.
    pub arc_degrees: f64,
    pub radius_ok: bool,
    pub residual_ok: bool,
    pub arc_ok: bool,
}

impl CircleCheck {
    /// All three conditions hold.
    pub fn is_circle(&self) -> bool {
        self.radius_ok && self.residual_ok && self.arc_ok
    }
}

/// Fit a circle to `points` (in temporal order) and validate radius,
/// fit tightness and ordered angular sweep against `config`.
///
/// Returns `None` for a degenerate fit.
pub fn check_circle<'a, I>(points: I, config: &DetectorConfig) -> Option<CircleCheck>
where
    I: IntoIterator<Item = &'a Point2>,
    I::IntoIter: Clone,
{
    let iter = points.into_iter();
    let circle = fit_circle(iter.clone())?;
    let arc_degrees = unwrapped_sweep_degrees(iter, circle.cx, circle.cy);

    Some(CircleCheck {
        circle,
        arc_degrees,
        radius_ok: circle.radius >= config.min_radius_frac
            && circle.radius <= config.max_radius_frac,
        residual_ok: circle.residual_ratio <= config.max_residual_ratio,
        arc_ok: arc_degrees >= config.min_arc_degrees,
    })
}
