use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use loopsense_core::config::LoopsenseConfig;
use loopsense_core::consts::DEFAULT_FRAME_RATE;
use loopsense_core::frame::LumaFrame;
use loopsense_core::gesture::{
    CircleGestureDetector, ConfirmationGate, Diagnostics, FitStatus, FrameReport, GateState,
    Observation,
};
use loopsense_core::io::image_io::{list_image_sequence, load_sequence};
use loopsense_core::io::ser::SerReader;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::summary::{print_detect_settings, print_detect_summary, print_input_error};

#[derive(Args)]
pub struct DetectArgs {
    /// Input SER files or image-sequence directories
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Settings file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Frame rate assumed when a recording carries no timestamps
    #[arg(long, default_value_t = DEFAULT_FRAME_RATE)]
    pub fps: f64,

    /// Print per-frame diagnostics
    #[arg(long)]
    pub trace: bool,
}

/// Outcome of running one detector session over one input.
pub struct DetectSummary {
    pub input: PathBuf,
    pub frames: usize,
    pub positive_frames: usize,
    /// Frames without a usable motion blob.
    pub missed_frames: usize,
    pub first_detection: Option<usize>,
    pub first_confirmation: Option<usize>,
    pub triggered_at: Option<usize>,
    pub best_arc_degrees: f64,
    /// Diagnostics after the last frame that produced a fit.
    pub last_fit: Option<Diagnostics>,
    pub trace: Vec<String>,
}

impl DetectSummary {
    fn new(input: &Path) -> Self {
        Self {
            input: input.to_path_buf(),
            frames: 0,
            positive_frames: 0,
            missed_frames: 0,
            first_detection: None,
            first_confirmation: None,
            triggered_at: None,
            best_arc_degrees: 0.0,
            last_fit: None,
            trace: Vec::new(),
        }
    }
}

pub fn run(args: &DetectArgs) -> Result<()> {
    ensure!(args.fps > 0.0, "Frame rate must be positive");
    let config = super::config::load(args.config.as_deref())?;
    debug!(?config, "Loaded detector settings");

    print_detect_settings(&config);

    if let [input] = args.inputs.as_slice() {
        let summary = detect_input(input, &config, args, true)?;
        print_detect_summary(&summary);
        return Ok(());
    }

    let results: Vec<_> = args
        .inputs
        .par_iter()
        .map(|input| detect_input(input, &config, args, false))
        .collect();

    let mut failed = 0;
    for (input, result) in args.inputs.iter().zip(results) {
        match result {
            Ok(summary) => print_detect_summary(&summary),
            Err(e) => {
                failed += 1;
                print_input_error(input, &e);
            }
        }
    }
    ensure!(failed == 0, "{} of {} inputs failed", failed, args.inputs.len());
    Ok(())
}

/// Run a fresh detector and confirmation gate over every frame of `input`.
fn detect_input(
    input: &Path,
    config: &LoopsenseConfig,
    args: &DetectArgs,
    show_progress: bool,
) -> Result<DetectSummary> {
    let mut session = Session::new(input, config, args)?;

    if input.is_dir() {
        let paths = list_image_sequence(input)
            .with_context(|| format!("Failed to list {}", input.display()))?;
        let pb = progress_bar(paths.len(), show_progress)?;
        for (i, frame) in load_sequence(&paths).enumerate() {
            let frame = frame.with_context(|| format!("Failed to load {}", paths[i].display()))?;
            session.step(i, &frame.as_frame(), None);
            pb.inc(1);
        }
        pb.finish_and_clear();
    } else {
        let reader = SerReader::open(input)
            .with_context(|| format!("Failed to open {}", input.display()))?;
        let base_us = reader.timestamp_us(0);
        let pb = progress_bar(reader.frame_count(), show_progress)?;
        for (i, frame) in reader.frames().enumerate() {
            let frame = frame?;
            let ts_ms = reader
                .timestamp_us(i)
                .zip(base_us)
                .map(|(ts, base)| ts.saturating_sub(base) / 1000);
            session.step(i, &frame, ts_ms);
            pb.inc(1);
        }
        pb.finish_and_clear();
    }

    let summary = session.finish();
    info!(
        input = %input.display(),
        frames = summary.frames,
        positive = summary.positive_frames,
        "Detection finished"
    );
    Ok(summary)
}

fn progress_bar(total: usize, visible: bool) -> Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Detecting");
    Ok(pb)
}

/// One detector session plus the bookkeeping for its summary.
struct Session {
    detector: CircleGestureDetector,
    gate: ConfirmationGate,
    frame_ms: f64,
    trace: bool,
    summary: DetectSummary,
}

impl Session {
    fn new(input: &Path, config: &LoopsenseConfig, args: &DetectArgs) -> Result<Self> {
        Ok(Self {
            detector: CircleGestureDetector::new(config.detector.clone())?,
            gate: ConfirmationGate::new(config.confirm.clone()),
            frame_ms: 1000.0 / args.fps,
            trace: args.trace,
            summary: DetectSummary::new(input),
        })
    }

    /// Process frame `index`. Without a recorded timestamp the frame time is
    /// derived from the nominal frame rate.
    fn step(&mut self, index: usize, frame: &LumaFrame<'_>, ts_ms: Option<u64>) {
        let now_ms = ts_ms.unwrap_or_else(|| (index as f64 * self.frame_ms).round() as u64);
        let report = self.detector.process(frame);
        let gate = self.gate.update(report.detected, now_ms);

        let s = &mut self.summary;
        s.frames += 1;
        if report.observation.is_miss() {
            s.missed_frames += 1;
        }
        if report.detected {
            s.positive_frames += 1;
            s.first_detection.get_or_insert(index);
        }
        if self.gate.is_confirmed() {
            s.first_confirmation.get_or_insert(index);
        }
        if gate == GateState::Triggered {
            s.triggered_at.get_or_insert(index);
        }
        if let FitStatus::Fitted(check) = report.fit {
            s.best_arc_degrees = s.best_arc_degrees.max(check.arc_degrees);
            s.last_fit = Some(*self.detector.diagnostics());
        }

        if self.trace {
            let line = trace_line(index, now_ms, &report, self.detector.diagnostics(), gate);
            s.trace.push(line);
        }
    }

    fn finish(self) -> DetectSummary {
        self.summary
    }
}

fn trace_line(
    index: usize,
    now_ms: u64,
    report: &FrameReport,
    diag: &Diagnostics,
    gate: GateState,
) -> String {
    let observation = match report.observation {
        Observation::Unreadable => "unreadable".to_string(),
        Observation::NoReference => "no-ref".to_string(),
        Observation::NoMotion => "no-motion".to_string(),
        Observation::Accepted(b) => format!("blob {}px", b.pixel_count),
        Observation::TrackingGlitch(b) => format!("glitch {}px", b.pixel_count),
    };
    let fit = match report.fit {
        FitStatus::InsufficientHistory { have, need } => format!("history {have}/{need}"),
        FitStatus::Degenerate => "degenerate".to_string(),
        FitStatus::Fitted(c) => format!(
            "r={:.3} res={:.3} arc={:.0}{}",
            c.circle.radius,
            c.circle.residual_ratio,
            c.arc_degrees,
            if c.is_circle() { " CIRCLE" } else { "" }
        ),
    };
    let gate = match gate {
        GateState::Idle => String::new(),
        GateState::Holding { progress } => format!(" hold {progress}%"),
        GateState::Triggered => " TRIGGERED".to_string(),
    };
    format!(
        "{:>6} {:>8}ms  {:<14} path={:<3} {}{}{}",
        index,
        now_ms,
        observation,
        diag.path_len,
        fit,
        if report.path_cleared { " cleared" } else { "" },
        gate
    )
}
