use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::consts::SER_TICKS_PER_MICROSECOND;
use crate::error::{GestureError, Result};
use crate::io::ser::{SerHeader, SER_HEADER_SIZE, SER_MAGIC};

/// Writes a valid SER file at the raw byte level.
pub struct SerWriter {
    writer: BufWriter<File>,
    header: SerHeader,
    frames_written: u32,
}

impl SerWriter {
    /// Create a new SER file and write the header.
    pub fn create(path: &Path, header: &SerHeader) -> Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        write_header(&mut writer, header)?;
        Ok(Self {
            writer,
            header: header.clone(),
            frames_written: 0,
        })
    }

    /// Write a single raw frame (bytes must match the header's frame_byte_size).
    pub fn write_raw_frame(&mut self, data: &[u8]) -> Result<()> {
        let expected = self.header.frame_byte_size();
        if data.len() != expected {
            return Err(GestureError::InvalidSer(format!(
                "Frame is {} bytes, header expects {}",
                data.len(),
                expected
            )));
        }
        if self.frames_written >= self.header.frame_count {
            return Err(GestureError::InvalidSer(format!(
                "Header declares {} frames",
                self.header.frame_count
            )));
        }
        self.writer.write_all(data)?;
        self.frames_written += 1;
        Ok(())
    }

    pub fn frames_written(&self) -> u32 {
        self.frames_written
    }

    /// Write the optional timestamp trailer, one entry per frame.
    ///
    /// Takes microseconds and stores SER's 100 ns ticks.
    pub fn write_timestamps_us(&mut self, timestamps_us: &[u64]) -> Result<()> {
        for &ts in timestamps_us {
            let ticks = ts.saturating_mul(SER_TICKS_PER_MICROSECOND);
            self.writer.write_all(&ticks.to_le_bytes())?;
        }
        Ok(())
    }

    /// Flush and finalize the file.
    pub fn finalize(mut self) -> Result<()> {
        if self.frames_written != self.header.frame_count {
            return Err(GestureError::InvalidSer(format!(
                "Wrote {} of {} declared frames",
                self.frames_written, self.header.frame_count
            )));
        }
        self.writer.flush()?;
        Ok(())
    }
}

fn write_header(w: &mut impl Write, header: &SerHeader) -> Result<()> {
    // Magic (14 bytes)
    w.write_all(SER_MAGIC)?;
    // LuID (4 bytes)
    w.write_all(&0i32.to_le_bytes())?;
    // ColorID (4 bytes)
    w.write_all(&header.color_id.to_le_bytes())?;
    // LittleEndian flag: 0 = little-endian (Siril convention)
    let le_flag: i32 = if header.little_endian { 0 } else { 1 };
    w.write_all(&le_flag.to_le_bytes())?;
    w.write_all(&(header.width as i32).to_le_bytes())?;
    w.write_all(&(header.height as i32).to_le_bytes())?;
    w.write_all(&(header.pixel_depth as i32).to_le_bytes())?;
    w.write_all(&(header.frame_count as i32).to_le_bytes())?;
    // Observer, Instrument, Telescope (40 bytes each)
    write_fixed_string(w, &header.observer, 40)?;
    write_fixed_string(w, &header.instrument, 40)?;
    write_fixed_string(w, &header.telescope, 40)?;
    // DateTime, DateTimeUTC (8 bytes each)
    w.write_all(&header.date_time.to_le_bytes())?;
    w.write_all(&header.date_time_utc.to_le_bytes())?;

    debug_assert_eq!(
        14 + 4 + 4 + 4 + 4 + 4 + 4 + 4 + 40 + 40 + 40 + 8 + 8,
        SER_HEADER_SIZE
    );
    Ok(())
}

fn write_fixed_string(w: &mut impl Write, s: &str, len: usize) -> Result<()> {
    let bytes = s.as_bytes();
    let to_write = bytes.len().min(len);
    w.write_all(&bytes[..to_write])?;
    w.write_all(&vec![0u8; len - to_write])?;
    Ok(())
}
