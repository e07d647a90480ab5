// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use qrscan::backends::camera::types::CameraFacing;
use qrscan::config::Config;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

mod cli;

#[derive(Parser)]
#[command(name = "qrscan")]
#[command(about = "Scan QR codes from a camera or an image file")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan live from a camera (default)
    Scan {
        /// Start with the front camera
        #[arg(short, long)]
        front: bool,
    },

    /// Scan a QR code from an image file
    Image {
        /// Image to scan
        path: PathBuf,

        /// Print the action instead of opening links
        #[arg(long)]
        no_open: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how a payload would be handled
    Classify {
        /// Decoded QR text
        text: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List available cameras
    List,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Commands::Scan { .. }));

    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=qrscan=debug, RUST_LOG=info
    init_logging(interactive);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    let config_path = cli.config.clone().or_else(Config::default_path);

    match cli.command {
        Some(Commands::Image {
            path,
            no_open,
            json,
        }) => cli::scan_image(&path, no_open, json, &config),
        Some(Commands::Classify { text, json }) => cli::classify(&text, json),
        Some(Commands::List) => cli::list_cameras(),
        Some(Commands::Scan { front }) => {
            if front {
                config.camera_facing = CameraFacing::Front;
            }
            qrscan::terminal::run(config, config_path)
        }
        None => qrscan::terminal::run(config, config_path),
    }
}

/// The terminal UI owns stdout/stderr, so interactive runs log to a file
fn init_logging(interactive: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let log_file = interactive.then(open_log_file).flatten();

    match log_file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        None if interactive => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stderr)
            .init(),
    }
}

fn open_log_file() -> Option<File> {
    let dir = dirs::cache_dir()?.join("qrscan");
    std::fs::create_dir_all(&dir).ok()?;
    File::create(dir.join("qrscan.log")).ok()
}
