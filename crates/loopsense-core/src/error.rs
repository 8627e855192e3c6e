use thiserror::Error;

#[derive(Error, Debug)]
pub enum GestureError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid SER file: {0}")]
    InvalidSer(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Frame unreadable: {0}")]
    FrameUnreadable(String),

    #[error("Buffer dimensions differ: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unsupported color mode: {0}")]
    UnsupportedColorMode(String),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, GestureError>;
