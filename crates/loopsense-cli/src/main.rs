mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "loopsense", about = "Circular hand-gesture detection for camera recordings")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show SER file metadata
    Info(commands::info::InfoArgs),
    /// Run the gesture detector over recordings
    Detect(commands::detect::DetectArgs),
    /// Write a synthetic circle-trace recording
    Synth(commands::synth::SynthArgs),
    /// Print or save the default configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Detect(args) => commands::detect::run(args),
        Commands::Synth(args) => commands::synth::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
