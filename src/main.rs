use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};

use cert_renderer::certificate::{self, RenderOptions};

#[derive(Parser, Debug)]
#[command(name = "cert_renderer")]
#[command(version, about = "Course-completion certificate PDF generator")]
struct Cli {
    /// The name of the person who completed the course
    #[arg(long, default_value = "")]
    name: String,

    /// Output PDF path
    #[arg(long, short = 'o', default_value = "cert.pdf")]
    output: PathBuf,

    /// Overlay the layout calibration grid
    #[arg(long, action = ArgAction::SetTrue)]
    grid: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let options = RenderOptions {
        name: cli.name,
        grid: cli.grid,
        ..RenderOptions::default()
    };
    certificate::generate(&options, &cli.output)
        .with_context(|| format!("failed to generate {}", cli.output.display()))?;
    log::info!("certificate written to {}", cli.output.display());
    Ok(())
}
