// SPDX-License-Identifier: GPL-3.0-only

use clap::{Args, Parser, Subcommand, ValueEnum};
use qr_tracker::backends::camera::SourceKind;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "qr-tracker")]
#[command(about = "Place virtual objects from QR markers seen by a camera")]
#[command(version = qr_tracker::constants::app_info::version())]
struct Cli {
    /// Configuration file (default: <config dir>/qr-tracker/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for the configured frame source
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Frame source to open
    #[arg(long, global = true, value_enum)]
    pub source: Option<SourceArg>,

    /// V4L2 device node (e.g. /dev/video2)
    #[arg(long, global = true)]
    pub device: Option<String>,

    /// Image file or directory for the image source
    #[arg(long, global = true)]
    pub image: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SourceArg {
    Webcam,
    DepthCamera,
    Image,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Webcam => SourceKind::Webcam,
            SourceArg::DepthCamera => SourceKind::DepthCamera,
            SourceArg::Image => SourceKind::ImageFile,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Calibrate,
    Track,
}

#[derive(Subcommand)]
enum Commands {
    /// List V4L2 capture devices
    List,

    /// Run a single tick on an image file and print the result as JSON
    Detect {
        /// Image to analyze
        image: PathBuf,

        /// Interpret markers as calibration corners or target numbers
        #[arg(long, value_enum, default_value_t = Mode::Track)]
        mode: Mode,
    },

    /// Move the calibration region with markers "1" and "2"; Ctrl+C saves it
    Calibrate,

    /// Track targets and print one JSON line per processed tick
    Track {
        /// Stop after this many ticks
        #[arg(long)]
        ticks: Option<u64>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG to control log level, e.g. RUST_LOG=qr_tracker=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => cli::list_devices(),
        Commands::Detect { image, mode } => cli::detect(cli.config, image, mode),
        Commands::Calibrate => cli::calibrate(cli.config, &cli.source),
        Commands::Track { ticks } => cli::track(cli.config, &cli.source, ticks),
    }?;
    Ok(())
}
