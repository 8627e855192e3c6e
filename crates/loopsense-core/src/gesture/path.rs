use std::collections::VecDeque;

use crate::config::DetectorConfig;
use crate::frame::Point2;

/// Map a centroid in downsampled pixels into square-normalized space.
///
/// Both axes are divided by the shorter frame side, so a physical circle
/// stays numerically circular whatever the frame's aspect ratio.
pub fn square_normalize(cx: f64, cy: f64, short_side: usize) -> Point2 {
    let s = short_side.max(1) as f64;
    Point2::new(cx / s, cy / s)
}

/// What happened to the path on one update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathUpdate {
    /// The point was appended and the miss counter reset.
    Accepted,
    /// The point jumped too far from the last one and was dropped.
    /// Neither the path nor the miss counter changed.
    Rejected { jump: f64 },
    /// A miss was recorded; the path survives.
    Missed { misses: u32 },
    /// The miss limit was reached and the path was emptied.
    Cleared,
}

/// Bounded, insertion-ordered history of square-normalized points with
/// jump filtering and miss-based decay.
#[derive(Clone, Debug)]
pub struct PathAccumulator {
    points: VecDeque<Point2>,
    capacity: usize,
    max_jump_sq: f64,
    max_miss_frames: u32,
    miss_count: u32,
}

impl PathAccumulator {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            points: VecDeque::with_capacity(config.path_buffer_size),
            capacity: config.path_buffer_size,
            max_jump_sq: config.max_jump_frac * config.max_jump_frac,
            max_miss_frames: config.max_miss_frames,
            miss_count: 0,
        }
    }

    /// Offer a new square-normalized point.
    pub fn push(&mut self, point: Point2) -> PathUpdate {
        if let Some(last) = self.points.back() {
            let d2 = point.distance_sq(last);
            if d2 > self.max_jump_sq {
                return PathUpdate::Rejected { jump: d2.sqrt() };
            }
        }

        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
        self.miss_count = 0;
        PathUpdate::Accepted
    }

    /// Record a frame without an accepted point.
    pub fn record_miss(&mut self) -> PathUpdate {
        self.miss_count += 1;
        if self.miss_count >= self.max_miss_frames {
            self.points.clear();
            self.miss_count = 0;
            return PathUpdate::Cleared;
        }
        PathUpdate::Missed {
            misses: self.miss_count,
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.miss_count = 0;
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn miss_count(&self) -> u32 {
        self.miss_count
    }

    pub fn last(&self) -> Option<&Point2> {
        self.points.back()
    }

    /// Points oldest first.
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, Point2> {
        self.points.iter()
    }
}
