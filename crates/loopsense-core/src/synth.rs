//! Synthetic circle-trace recordings.
//!
//! Renders a bright disk moving along a circle on a dark background. The
//! disk leaves a painted trail, so the difference between consecutive
//! frames is the freshly painted leading edge only, which is what a
//! fingertip against a static scene looks like after frame differencing.

use serde::{Deserialize, Serialize};

/// Parameters of a synthetic trace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraceParams {
    pub width: usize,
    pub height: usize,
    /// Trace center as a fraction of width and height.
    pub center: (f64, f64),
    /// Trace radius as a fraction of the shorter side.
    pub radius_frac: f64,
    /// Radius of the moving disk in source pixels.
    pub disk_radius: f64,
    /// Angular advance per frame in degrees; negative traces clockwise.
    pub step_deg: f64,
    pub frames: usize,
    pub background: u8,
    pub foreground: u8,
}

impl Default for TraceParams {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            center: (0.5, 0.5),
            radius_frac: 0.25,
            disk_radius: 20.0,
            step_deg: 18.0,
            frames: 20,
            background: 0,
            foreground: 200,
        }
    }
}

impl TraceParams {
    /// Disk center for frame `index`, in source pixels.
    pub fn position(&self, index: usize) -> (f64, f64) {
        let short = self.width.min(self.height) as f64;
        let r = self.radius_frac * short;
        let t = (index as f64 * self.step_deg).to_radians();
        (
            self.center.0 * self.width as f64 + r * t.cos(),
            self.center.1 * self.height as f64 + r * t.sin(),
        )
    }
}

/// Render every frame of the trace.
pub fn render_trace(params: &TraceParams) -> Vec<Vec<u8>> {
    let mut frames = Vec::with_capacity(params.frames);
    let mut canvas = vec![params.background; params.width * params.height];
    for k in 0..params.frames {
        let (x, y) = params.position(k);
        paint_disk(&mut canvas, params, x, y);
        frames.push(canvas.clone());
    }
    frames
}

fn paint_disk(data: &mut [u8], params: &TraceParams, x: f64, y: f64) {
    let r = params.disk_radius;
    let r2 = r * r;
    let min_row = (y - r).floor().max(0.0) as usize;
    let max_row = ((y + r).ceil().max(0.0) as usize).min(params.height.saturating_sub(1));
    let min_col = (x - r).floor().max(0.0) as usize;
    let max_col = ((x + r).ceil().max(0.0) as usize).min(params.width.saturating_sub(1));

    for row in min_row..=max_row {
        for col in min_col..=max_col {
            let dx = col as f64 - x;
            let dy = row as f64 - y;
            if dx * dx + dy * dy <= r2 {
                data[row * params.width + col] = params.foreground;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_accumulates() {
        let params = TraceParams {
            frames: 6,
            ..TraceParams::default()
        };
        let frames = render_trace(&params);
        assert_eq!(frames.len(), 6);
        for pair in frames.windows(2) {
            let painted = |f: &Vec<u8>| f.iter().filter(|&&v| v == params.foreground).count();
            assert!(painted(&pair[1]) > painted(&pair[0]));
            assert!(pair[0]
                .iter()
                .zip(&pair[1])
                .all(|(&a, &b)| a != params.foreground || b == params.foreground));
        }
    }

    #[test]
    fn test_first_position_is_on_the_right() {
        let params = TraceParams::default();
        let (x, y) = params.position(0);
        assert!((x - 220.0).abs() < 1e-9);
        assert!((y - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_disk_is_clipped_at_border() {
        let params = TraceParams {
            width: 40,
            height: 40,
            center: (0.0, 0.0),
            radius_frac: 0.0,
            disk_radius: 5.0,
            frames: 1,
            ..TraceParams::default()
        };
        let data = &render_trace(&params)[0];
        assert_eq!(data[0], 200);
        assert_eq!(data[39], 0);
    }
}
