#![allow(dead_code)]

use loopsense_core::detection::Blob;
use loopsense_core::io::ser::SER_HEADER_SIZE;

/// Blob centroids (downsampled pixels) advancing `step_deg` per frame along
/// a circle given in square-normalized units.
pub fn circle_blobs(
    cx: f64,
    cy: f64,
    radius: f64,
    step_deg: f64,
    count: usize,
    short_side: usize,
) -> Vec<Blob> {
    let s = short_side as f64;
    (0..count)
        .map(|i| {
            let t = (i as f64 * step_deg).to_radians();
            Blob {
                pixel_count: 40,
                cx: (cx + radius * t.cos()) * s,
                cy: (cy + radius * t.sin()) * s,
            }
        })
        .collect()
}

/// Build a SER file header with configurable bit depth and color mode.
///
/// `color_id`: 0=MONO, 8..=11=BAYER, 100=RGB, 101=BGR
pub fn build_ser_header_full(
    width: u32,
    height: u32,
    bit_depth: u32,
    num_frames: usize,
    color_id: i32,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SER_HEADER_SIZE);

    buf.extend_from_slice(b"LUCAM-RECORDER");
    buf.extend_from_slice(&0i32.to_le_bytes()); // LuID
    buf.extend_from_slice(&color_id.to_le_bytes());
    buf.extend_from_slice(&0i32.to_le_bytes()); // LittleEndian (Siril convention)
    buf.extend_from_slice(&(width as i32).to_le_bytes());
    buf.extend_from_slice(&(height as i32).to_le_bytes());
    buf.extend_from_slice(&(bit_depth as i32).to_le_bytes());
    buf.extend_from_slice(&(num_frames as i32).to_le_bytes());
    let mut observer = [0u8; 40];
    observer[..6].copy_from_slice(b"Tester");
    buf.extend_from_slice(&observer);
    buf.extend_from_slice(&[0u8; 40]); // Instrument
    buf.extend_from_slice(&[0u8; 40]); // Telescope
    buf.extend_from_slice(&0u64.to_le_bytes()); // DateTime
    buf.extend_from_slice(&0u64.to_le_bytes()); // DateTimeUTC

    assert_eq!(buf.len(), SER_HEADER_SIZE);
    buf
}

/// Write a SER buffer to a temporary file and return the temp file handle.
///
/// The file stays alive as long as the returned `NamedTempFile` is not dropped.
pub fn write_test_ser(data: &[u8]) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut f = tempfile::NamedTempFile::new().expect("create temp file");
    f.write_all(data).expect("write SER data");
    f.flush().expect("flush");
    f
}
