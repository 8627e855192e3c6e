//! Frame-difference motion segmentation.
//!
//! Pipeline: motion mask -> largest 4-connected component -> centroid.
//! Only the single largest blob is kept so that one coherent moving object
//! (the fingertip) drives the path rather than the average of every moving
//! pixel in the scene.

pub mod components;
pub mod mask;

use ndarray::Array2;

use crate::error::Result;

pub use components::{largest_component, ComponentStats};
pub use mask::motion_mask;

/// The dominant moving object in one frame pair, in downsampled pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blob {
    pub pixel_count: usize,
    /// Centroid column.
    pub cx: f64,
    /// Centroid row.
    pub cy: f64,
}

/// Locate the largest motion blob between two equally sized luma buffers.
///
/// Returns `Ok(None)` when nothing moved or the largest blob has fewer than
/// `min_blob_px` pixels.
pub fn largest_motion_blob(
    prev: &Array2<u8>,
    curr: &Array2<u8>,
    threshold: u8,
    min_blob_px: usize,
) -> Result<Option<Blob>> {
    let mask = motion_mask(prev, curr, threshold)?;

    let Some(largest) = largest_component(&mask) else {
        return Ok(None);
    };
    if largest.area < min_blob_px {
        return Ok(None);
    }

    let (cx, cy) = largest.centroid();
    Ok(Some(Blob {
        pixel_count: largest.area,
        cx,
        cy,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(buf: &mut Array2<u8>, rows: std::ops::Range<usize>, cols: std::ops::Range<usize>) {
        for r in rows {
            for c in cols.clone() {
                buf[[r, c]] = 200;
            }
        }
    }

    #[test]
    fn test_static_scene_has_no_blob() {
        let prev = Array2::from_elem((20, 20), 90u8);
        let curr = prev.clone();
        assert_eq!(largest_motion_blob(&prev, &curr, 18, 1).unwrap(), None);
    }

    #[test]
    fn test_largest_blob_dominates_smaller_motion() {
        let prev = Array2::<u8>::zeros((30, 30));
        let mut curr = prev.clone();
        fill(&mut curr, 2..4, 2..4); // 4 px of background flicker
        fill(&mut curr, 10..16, 20..26); // 36 px fingertip

        let blob = largest_motion_blob(&prev, &curr, 18, 25).unwrap().unwrap();
        assert_eq!(blob.pixel_count, 36);
        assert!((blob.cx - 22.5).abs() < 1e-12);
        assert!((blob.cy - 12.5).abs() < 1e-12);
    }

    #[test]
    fn test_blob_below_min_size_is_dropped() {
        let prev = Array2::<u8>::zeros((30, 30));
        let mut curr = prev.clone();
        fill(&mut curr, 5..9, 5..9);
        assert_eq!(largest_motion_blob(&prev, &curr, 18, 25).unwrap(), None);
        assert!(largest_motion_blob(&prev, &curr, 18, 16).unwrap().is_some());
    }
}
