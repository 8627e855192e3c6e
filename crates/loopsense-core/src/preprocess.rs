use ndarray::Array2;

use crate::error::{GestureError, Result};
use crate::frame::LumaFrame;

/// Dimensions `(width, height)` of a frame after downsampling by `factor`.
pub fn downsampled_dims(width: usize, height: usize, factor: usize) -> (usize, usize) {
    (width / factor, height / factor)
}

/// Downsample a luma frame by nearest-pixel subsampling.
///
/// Keeps every `factor`-th row and column, with no averaging. The result has
/// shape `(height / factor, width / factor)`.
pub fn downsample(frame: &LumaFrame<'_>, factor: usize) -> Result<Array2<u8>> {
    frame.ensure_readable()?;
    if factor == 0 {
        return Err(GestureError::FrameUnreadable(
            "downsample factor must be > 0".into(),
        ));
    }

    let (w, h) = downsampled_dims(frame.width(), frame.height(), factor);
    if w == 0 || h == 0 {
        return Err(GestureError::InvalidDimensions {
            width: frame.width(),
            height: frame.height(),
        });
    }

    Ok(Array2::from_shape_fn((h, w), |(row, col)| {
        frame.sample(col * factor, row * factor)
    }))
}
