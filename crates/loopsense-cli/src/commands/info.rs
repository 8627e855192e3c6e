use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use loopsense_core::io::ser::SerReader;

#[derive(Args)]
pub struct InfoArgs {
    /// Input SER file
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let reader = SerReader::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let info = reader.source_info(&args.file);

    println!("File:        {}", info.filename.display());
    println!("Frames:      {}", info.total_frames);
    println!("Dimensions:  {}x{}", info.width, info.height);
    println!("Bit depth:   {}", info.bit_depth);
    println!("Color mode:  {:?}", info.color_mode);

    if let Some(ref obs) = info.observer {
        println!("Observer:    {}", obs);
    }
    if let Some(ref inst) = info.instrument {
        println!("Instrument:  {}", inst);
    }

    let frame_bytes = reader.header.frame_byte_size();
    let total_mb = (frame_bytes * info.total_frames) as f64 / (1024.0 * 1024.0);
    println!("Data size:   {:.1} MB", total_mb);

    if info.has_timestamps && info.total_frames > 1 {
        let first = reader.timestamp_us(0).unwrap_or(0);
        let last = reader.timestamp_us(info.total_frames - 1).unwrap_or(first);
        let secs = last.saturating_sub(first) as f64 / 1e6;
        println!("Duration:    {:.2} s", secs);
        if secs > 0.0 {
            println!(
                "Frame rate:  {:.1} fps",
                (info.total_frames - 1) as f64 / secs
            );
        }
    } else {
        println!("Timestamps:  none");
    }

    Ok(())
}
