use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use loopsense_core::config::LoopsenseConfig;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print or save the default LoopsenseConfig as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let toml_str = toml::to_string_pretty(&LoopsenseConfig::default())?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Default config saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}

/// Read and validate a TOML settings file, or fall back to the defaults.
pub fn load(path: Option<&Path>) -> Result<LoopsenseConfig> {
    let Some(path) = path else {
        return Ok(LoopsenseConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: LoopsenseConfig = toml::from_str(&contents).context("Invalid loopsense config")?;
    Ok(config.validated()?)
}
