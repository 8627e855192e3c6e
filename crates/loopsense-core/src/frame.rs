use std::path::PathBuf;

use crate::error::{GestureError, Result};

/// Storage of one sample at its byte offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SampleFormat {
    #[default]
    U8,
    /// Two-byte sample, reduced to 8 bits by dropping its `shift` low bits.
    U16 { little_endian: bool, shift: u32 },
}

/// A borrowed, read-only view of a single luminance plane.
///
/// Samples are addressed as `y * row_stride + x * pixel_stride` into `data`,
/// which covers packed buffers, padded rows and interleaved planes alike.
/// Wider samples are scaled down to 8 bits on read.
#[derive(Clone, Copy, Debug)]
pub struct LumaFrame<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    row_stride: usize,
    pixel_stride: usize,
    format: SampleFormat,
}

impl<'a> LumaFrame<'a> {
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        row_stride: usize,
        pixel_stride: usize,
    ) -> Self {
        Self {
            data,
            width,
            height,
            row_stride,
            pixel_stride,
            format: SampleFormat::U8,
        }
    }

    pub fn with_format(mut self, format: SampleFormat) -> Self {
        self.format = format;
        self
    }

    /// Tightly packed plane: one byte per pixel, no row padding.
    pub fn packed(data: &'a [u8], width: usize, height: usize) -> Self {
        Self::new(data, width, height, width, 1)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    pub fn pixel_stride(&self) -> usize {
        self.pixel_stride
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    /// Read the sample at source pixel `(x, y)`.
    ///
    /// Reads past the end of the buffer (stride mismatches, short planes)
    /// yield 0 instead of failing.
    pub fn sample(&self, x: usize, y: usize) -> u8 {
        let idx = y
            .checked_mul(self.row_stride)
            .and_then(|row| x.checked_mul(self.pixel_stride).and_then(|col| row.checked_add(col)));
        let Some(i) = idx else {
            return 0;
        };
        match self.format {
            SampleFormat::U8 => self.data.get(i).copied().unwrap_or(0),
            SampleFormat::U16 {
                little_endian,
                shift,
            } => {
                let Some(&[a, b]) = i
                    .checked_add(2)
                    .and_then(|end| self.data.get(i..end))
                    .and_then(|s| <&[u8; 2]>::try_from(s).ok())
                else {
                    return 0;
                };
                let v = if little_endian {
                    u16::from_le_bytes([a, b])
                } else {
                    u16::from_be_bytes([a, b])
                };
                (v.checked_shr(shift).unwrap_or(0)).min(255) as u8
            }
        }
    }

    /// Check that the plane layout can be sampled at all.
    pub fn ensure_readable(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GestureError::FrameUnreadable(format!(
                "empty plane {}x{}",
                self.width, self.height
            )));
        }
        if self.pixel_stride == 0 || self.row_stride == 0 {
            return Err(GestureError::FrameUnreadable(format!(
                "zero stride (row {}, pixel {})",
                self.row_stride, self.pixel_stride
            )));
        }
        if self.data.is_empty() {
            return Err(GestureError::FrameUnreadable("no pixel data".into()));
        }
        Ok(())
    }
}

/// An owned luminance plane, as produced by the image loaders.
#[derive(Clone, Debug)]
pub struct OwnedLumaFrame {
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
    pub row_stride: usize,
    pub pixel_stride: usize,
    pub metadata: FrameMetadata,
}

impl OwnedLumaFrame {
    pub fn packed(data: Vec<u8>, width: usize, height: usize) -> Self {
        Self {
            data,
            width,
            height,
            row_stride: width,
            pixel_stride: 1,
            metadata: FrameMetadata::default(),
        }
    }

    pub fn as_frame(&self) -> LumaFrame<'_> {
        LumaFrame::new(
            &self.data,
            self.width,
            self.height,
            self.row_stride,
            self.pixel_stride,
        )
    }
}

#[derive(Clone, Debug, Default)]
pub struct FrameMetadata {
    pub frame_index: usize,
    pub timestamp_us: Option<u64>,
}

/// A point in square-normalized space, where 1.0 is the shorter frame side.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_sq(&self, other: &Point2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Color/Bayer mode of the source data.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ColorMode {
    Mono,
    BayerRGGB,
    BayerGRBG,
    BayerGBRG,
    BayerBGGR,
    RGB,
    BGR,
}

/// Metadata about a recording on disk.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    pub filename: PathBuf,
    pub total_frames: usize,
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_mode: ColorMode,
    pub observer: Option<String>,
    pub instrument: Option<String>,
    pub has_timestamps: bool,
}
