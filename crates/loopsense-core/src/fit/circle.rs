use crate::consts::MIN_RADIUS_EPSILON;
use crate::frame::Point2;

use super::solver::solve3x3;

/// Result of an algebraic circle fit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleFit {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    /// RMS of `(distance to center - radius)`, divided by the radius.
    pub residual_ratio: f64,
}

/// Kåsa least-squares circle fit.
///
/// Minimizes `sum (x^2 + y^2 + D x + E y + F)^2` by solving the 3x3 normal
/// equations, then recovers `cx = -D/2`, `cy = -E/2` and
/// `r^2 = cx^2 + cy^2 - F`. Returns `None` when the system is singular
/// (collinear or coincident points) or `r^2 <= 0`.
pub fn fit_circle<'a, I>(points: I) -> Option<CircleFit>
where
    I: IntoIterator<Item = &'a Point2>,
    I::IntoIter: Clone,
{
    let iter = points.into_iter();

    let mut n = 0usize;
    let (mut s_x, mut s_y, mut s_xx, mut s_yy, mut s_xy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    let (mut s_z, mut s_zx, mut s_zy) = (0.0, 0.0, 0.0);
    for p in iter.clone() {
        let (x, y) = (p.x, p.y);
        let z = x * x + y * y;
        n += 1;
        s_x += x;
        s_y += y;
        s_xx += x * x;
        s_yy += y * y;
        s_xy += x * y;
        s_z += z;
        s_zx += z * x;
        s_zy += z * y;
    }
    if n < 3 {
        return None;
    }

    let a = [
        [s_xx, s_xy, s_x],
        [s_xy, s_yy, s_y],
        [s_x, s_y, n as f64],
    ];
    let b = [-s_zx, -s_zy, -s_z];
    let [d, e, f] = solve3x3(a, b)?;

    let cx = -d / 2.0;
    let cy = -e / 2.0;
    let r2 = cx * cx + cy * cy - f;
    if !(r2 > 0.0) {
        return None;
    }
    let radius = r2.sqrt();

    let sum_sq: f64 = iter
        .map(|p| {
            let err = (p.x - cx).hypot(p.y - cy) - radius;
            err * err
        })
        .sum();
    let rms = (sum_sq / n as f64).sqrt();

    Some(CircleFit {
        cx,
        cy,
        radius,
        residual_ratio: rms / radius.max(MIN_RADIUS_EPSILON),
    })
}
