use std::fs::File;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;

use crate::consts::SER_TICKS_PER_MICROSECOND;
use crate::error::{GestureError, Result};
use crate::frame::{ColorMode, FrameMetadata, LumaFrame, SampleFormat, SourceInfo};

pub const SER_HEADER_SIZE: usize = 178;
pub const SER_MAGIC: &[u8; 14] = b"LUCAM-RECORDER";

/// SER file header (178 bytes).
#[derive(Clone, Debug)]
pub struct SerHeader {
    pub color_id: i32,
    pub little_endian: bool,
    pub width: u32,
    pub height: u32,
    pub pixel_depth: u32,
    pub frame_count: u32,
    pub observer: String,
    pub instrument: String,
    pub telescope: String,
    pub date_time: u64,
    pub date_time_utc: u64,
}

impl SerHeader {
    /// Header for an 8-bit mono recording.
    pub fn mono8(width: u32, height: u32, frame_count: u32) -> Self {
        Self {
            color_id: 0,
            little_endian: true,
            width,
            height,
            pixel_depth: 8,
            frame_count,
            observer: String::new(),
            instrument: String::new(),
            telescope: String::new(),
            date_time: 0,
            date_time_utc: 0,
        }
    }

    /// Bytes per pixel plane (1 for 8-bit, 2 for 9-16 bit).
    pub fn bytes_per_pixel_plane(&self) -> usize {
        if self.pixel_depth <= 8 { 1 } else { 2 }
    }

    /// Number of planes per pixel (1 for mono/bayer, 3 for RGB/BGR).
    pub fn planes_per_pixel(&self) -> usize {
        match self.color_id {
            100 | 101 => 3,
            _ => 1,
        }
    }

    /// Total bytes per frame.
    pub fn frame_byte_size(&self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(self.bytes_per_pixel_plane() * self.planes_per_pixel())
    }

    pub fn color_mode(&self) -> ColorMode {
        match self.color_id {
            0 => ColorMode::Mono,
            8 => ColorMode::BayerRGGB,
            9 => ColorMode::BayerGRBG,
            10 => ColorMode::BayerGBRG,
            11 => ColorMode::BayerBGGR,
            100 => ColorMode::RGB,
            101 => ColorMode::BGR,
            _ => ColorMode::Mono,
        }
    }

    /// Byte offset of the luma sample inside one pixel, the stride between
    /// consecutive pixels, and how the sample is stored.
    ///
    /// Samples wider than 8 bits are scaled by their declared depth, so a
    /// 12-bit recording spans the full 8-bit range. Color recordings use the
    /// green plane as luminance. Bayer data is read as a raw mosaic, which is
    /// close enough for motion differencing.
    fn luma_layout(&self) -> (usize, usize, SampleFormat) {
        let bpp = self.bytes_per_pixel_plane();
        let planes = self.planes_per_pixel();
        let green = if planes == 3 { bpp } else { 0 };
        let format = if bpp == 2 {
            SampleFormat::U16 {
                little_endian: self.little_endian,
                shift: self.pixel_depth.saturating_sub(8),
            }
        } else {
            SampleFormat::U8
        };
        (green, bpp * planes, format)
    }
}

/// Memory-mapped SER file reader.
pub struct SerReader {
    mmap: Mmap,
    pub header: SerHeader,
}

impl SerReader {
    /// Open a SER file and parse its header.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and the file is not resized
        // while the reader is alive.
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < SER_HEADER_SIZE {
            return Err(GestureError::InvalidSer(
                "File too small for SER header".into(),
            ));
        }

        if &mmap[0..14] != SER_MAGIC {
            return Err(GestureError::InvalidSer(
                "Missing LUCAM-RECORDER magic".into(),
            ));
        }

        let header = parse_header(&mmap[..SER_HEADER_SIZE])?;

        let expected_data_size = header
            .frame_byte_size()
            .checked_mul(header.frame_count as usize)
            .and_then(|data| data.checked_add(SER_HEADER_SIZE))
            .ok_or_else(|| GestureError::InvalidSer("Frame data size overflows".into()))?;
        if mmap.len() < expected_data_size {
            return Err(GestureError::InvalidSer(format!(
                "File truncated: expected at least {} bytes, got {}",
                expected_data_size,
                mmap.len()
            )));
        }

        Ok(Self { mmap, header })
    }

    pub fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    /// Get the raw bytes for a single frame (zero-copy from mmap).
    pub fn frame_raw(&self, index: usize) -> Result<&[u8]> {
        let count = self.frame_count();
        if index >= count {
            return Err(GestureError::FrameIndexOutOfRange {
                index,
                total: count,
            });
        }
        let size = self.header.frame_byte_size();
        let offset = SER_HEADER_SIZE + index * size;
        Ok(&self.mmap[offset..offset + size])
    }

    /// Zero-copy luma view of a single frame.
    pub fn luma_frame(&self, index: usize) -> Result<LumaFrame<'_>> {
        let raw = self.frame_raw(index)?;
        let (offset, pixel_stride, format) = self.header.luma_layout();
        let width = self.header.width as usize;
        Ok(LumaFrame::new(
            raw.get(offset..).unwrap_or(&[]),
            width,
            self.header.height as usize,
            width * pixel_stride,
            pixel_stride,
        )
        .with_format(format))
    }

    pub fn frame_metadata(&self, index: usize) -> FrameMetadata {
        FrameMetadata {
            frame_index: index,
            timestamp_us: self.timestamp_us(index),
        }
    }

    /// Per-frame timestamp from the optional trailer, in microseconds.
    pub fn timestamp_us(&self, index: usize) -> Option<u64> {
        self.raw_timestamp(index)
            .map(|ticks| ticks / SER_TICKS_PER_MICROSECOND)
    }

    fn raw_timestamp(&self, index: usize) -> Option<u64> {
        if index >= self.frame_count() {
            return None;
        }
        let trailer_offset =
            SER_HEADER_SIZE + self.header.frame_byte_size() * self.header.frame_count as usize;
        let ts_offset = trailer_offset + index * 8;
        let bytes = self.mmap.get(ts_offset..ts_offset + 8)?;
        Some(u64::from_le_bytes(bytes.try_into().ok()?))
    }

    pub fn has_timestamps(&self) -> bool {
        self.frame_count() > 0 && self.raw_timestamp(self.frame_count() - 1).is_some()
    }

    /// Build SourceInfo from the header.
    pub fn source_info(&self, path: &Path) -> SourceInfo {
        SourceInfo {
            filename: path.to_path_buf(),
            total_frames: self.frame_count(),
            width: self.header.width,
            height: self.header.height,
            bit_depth: self.header.pixel_depth as u8,
            color_mode: self.header.color_mode(),
            observer: non_empty(&self.header.observer),
            instrument: non_empty(&self.header.instrument),
            has_timestamps: self.has_timestamps(),
        }
    }

    /// Iterator over all frames as luma views.
    pub fn frames(&self) -> impl Iterator<Item = Result<LumaFrame<'_>>> + '_ {
        (0..self.frame_count()).map(move |i| self.luma_frame(i))
    }
}

fn parse_header(buf: &[u8]) -> Result<SerHeader> {
    let mut cursor = std::io::Cursor::new(&buf[14..]); // skip magic

    let _lu_id = cursor.read_i32::<LittleEndian>()?;
    let color_id = cursor.read_i32::<LittleEndian>()?;
    let le_flag = cursor.read_i32::<LittleEndian>()?;
    let width = cursor.read_i32::<LittleEndian>()?;
    let height = cursor.read_i32::<LittleEndian>()?;
    let pixel_depth = cursor.read_i32::<LittleEndian>()?;
    let frame_count = cursor.read_i32::<LittleEndian>()?;

    let observer = read_fixed_string(&buf[42..82]);
    let instrument = read_fixed_string(&buf[82..122]);
    let telescope = read_fixed_string(&buf[122..162]);

    let mut cursor = std::io::Cursor::new(&buf[162..]);
    let date_time = cursor.read_u64::<LittleEndian>()?;
    let date_time_utc = cursor.read_u64::<LittleEndian>()?;

    if width <= 0 || height <= 0 {
        return Err(GestureError::InvalidDimensions {
            width: width.max(0) as usize,
            height: height.max(0) as usize,
        });
    }
    if !(1..=16).contains(&pixel_depth) {
        return Err(GestureError::InvalidSer(format!(
            "Unsupported pixel depth {pixel_depth}"
        )));
    }
    if frame_count < 0 {
        return Err(GestureError::InvalidSer(format!(
            "Negative frame count {frame_count}"
        )));
    }
    if !matches!(color_id, 0 | 8..=11 | 100 | 101) {
        return Err(GestureError::UnsupportedColorMode(format!(
            "SER color id {color_id}"
        )));
    }

    // Follow Siril's convention: a flag of 0 means little-endian pixel data.
    let little_endian = le_flag != 1;

    Ok(SerHeader {
        color_id,
        little_endian,
        width: width as u32,
        height: height as u32,
        pixel_depth: pixel_depth as u32,
        frame_count: frame_count as u32,
        observer,
        instrument,
        telescope,
        date_time,
        date_time_utc,
    })
}

fn read_fixed_string(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf)
        .trim_end_matches('\0')
        .trim()
        .to_string()
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() { None } else { Some(s.to_string()) }
}
