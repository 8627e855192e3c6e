use ndarray::{Array2, Zip};

use crate::error::{GestureError, Result};

/// Binary motion mask: `true` where `|curr - prev| >= threshold`.
pub fn motion_mask(prev: &Array2<u8>, curr: &Array2<u8>, threshold: u8) -> Result<Array2<bool>> {
    if prev.dim() != curr.dim() {
        return Err(GestureError::DimensionMismatch {
            expected: prev.dim(),
            actual: curr.dim(),
        });
    }

    Ok(Zip::from(curr)
        .and(prev)
        .map_collect(|&c, &p| c.abs_diff(p) >= threshold))
}
