use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use loopsense_core::consts::DEFAULT_FRAME_RATE;
use loopsense_core::io::ser::SerHeader;
use loopsense_core::io::ser_writer::SerWriter;
use loopsense_core::synth::{render_trace, TraceParams};

#[derive(Args)]
pub struct SynthArgs {
    /// Output SER file
    pub output: PathBuf,

    /// Frame width in pixels
    #[arg(long, default_value = "320")]
    pub width: usize,

    /// Frame height in pixels
    #[arg(long, default_value = "240")]
    pub height: usize,

    /// Number of frames to render
    #[arg(long, default_value = "40")]
    pub frames: usize,

    /// Trace radius as a fraction of the shorter side
    #[arg(long, default_value = "0.25")]
    pub radius: f64,

    /// Angular advance per frame in degrees (negative for clockwise)
    #[arg(long, default_value = "18.0", allow_hyphen_values = true)]
    pub step_deg: f64,

    /// Radius of the moving disk in pixels
    #[arg(long, default_value = "20.0")]
    pub disk: f64,

    /// Frame rate used for the timestamp trailer
    #[arg(long, default_value_t = DEFAULT_FRAME_RATE)]
    pub fps: f64,
}

pub fn run(args: &SynthArgs) -> Result<()> {
    ensure!(args.width > 0 && args.height > 0, "Frame size must be non-zero");
    ensure!(args.fps > 0.0, "Frame rate must be positive");

    let params = TraceParams {
        width: args.width,
        height: args.height,
        radius_frac: args.radius,
        disk_radius: args.disk,
        step_deg: args.step_deg,
        frames: args.frames,
        ..TraceParams::default()
    };

    let frames = render_trace(&params);
    let header = SerHeader::mono8(args.width as u32, args.height as u32, frames.len() as u32);
    let mut writer = SerWriter::create(&args.output, &header)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    let pb = ProgressBar::new(frames.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Writing [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    for frame in &frames {
        writer.write_raw_frame(frame)?;
        pb.inc(1);
    }
    pb.finish();

    let timestamps: Vec<u64> = (0..frames.len())
        .map(|i| (i as f64 * 1e6 / args.fps).round() as u64)
        .collect();
    writer.write_timestamps_us(&timestamps)?;
    writer.finalize()?;

    println!(
        "Saved {} frames ({}x{}) to {}",
        frames.len(),
        args.width,
        args.height,
        args.output.display()
    );
    Ok(())
}
