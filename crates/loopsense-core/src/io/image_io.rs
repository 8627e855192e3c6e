use std::path::{Path, PathBuf};

use crate::error::{GestureError, Result};
use crate::frame::{FrameMetadata, OwnedLumaFrame};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp"];

/// Load an image file as an 8-bit luma frame.
pub fn load_luma(path: &Path) -> Result<OwnedLumaFrame> {
    let img = image::open(path)?.into_luma8();
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(GestureError::InvalidDimensions {
            width: w as usize,
            height: h as usize,
        });
    }
    Ok(OwnedLumaFrame::packed(img.into_raw(), w as usize, h as usize))
}

/// List the image files of a directory, sorted by file name.
pub fn list_image_sequence(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_image_file(p))
        .collect();
    paths.sort();
    Ok(paths)
}

/// Lazily load the frames of a listed image sequence, in the given order.
pub fn load_sequence(paths: &[PathBuf]) -> impl Iterator<Item = Result<OwnedLumaFrame>> + '_ {
    paths.iter().enumerate().map(|(index, path)| {
        let mut frame = load_luma(path)?;
        frame.metadata = FrameMetadata {
            frame_index: index,
            timestamp_us: None,
        };
        Ok(frame)
    })
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
