use std::f64::consts::{PI, TAU};

use crate::consts::MAX_SWEEP_DEGREES;
use crate::frame::Point2;

/// Total unwrapped rotation of a path around `(cx, cy)`, in degrees.
///
/// Walks the points in order, wraps each consecutive angular step into
/// `(-pi, pi]` and sums the steps. Returns the magnitude of the sum, capped
/// at 360. A one-directional loop accumulates toward 360; back-and-forth
/// scatter cancels out.
pub fn unwrapped_sweep_degrees<'a, I>(points: I, cx: f64, cy: f64) -> f64
where
    I: IntoIterator<Item = &'a Point2>,
{
    let mut iter = points.into_iter();
    let Some(first) = iter.next() else {
        return 0.0;
    };

    let mut prev_angle = (first.y - cy).atan2(first.x - cx);
    let mut total = 0.0;
    for p in iter {
        let angle = (p.y - cy).atan2(p.x - cx);
        total += wrap_angle(angle - prev_angle);
        prev_angle = angle;
    }

    total.abs().to_degrees().min(MAX_SWEEP_DEGREES)
}

/// Wrap an angle difference into `(-pi, pi]`.
pub fn wrap_angle(mut delta: f64) -> f64 {
    while delta > PI {
        delta -= TAU;
    }
    while delta <= -PI {
        delta += TAU;
    }
    delta
}
