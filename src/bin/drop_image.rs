//! Copies an image into the watched folder to exercise the full
//! watch-and-notify pipeline by hand: run the server, connect a browser (or
//! the monitor client), then drop an image and watch the notification land.

use clap::Parser;
use log::{error, info};
use service::{config::Config, logging::Logger};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser)]
#[command(name = "drop_image")]
#[command(about = "Copy an image into the watched folder to trigger a discovery event")]
struct Cli {
    /// Path of the image file to copy into the watched folder
    source: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    let config = Config::parse_from(["inkdrop"]);
    Logger::init_logger(&config);

    let Some(file_name) = cli.source.file_name().and_then(|n| n.to_str()) else {
        error!("Source path has no usable file name: {}", cli.source.display());
        std::process::exit(1);
    };

    // Unique destination name so repeated drops of the same file each
    // produce a fresh creation event.
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let destination = config
        .files_root()
        .join(&config.watch_folder)
        .join(format!("{stamp}-{file_name}"));

    if let Some(parent) = destination.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            error!("Failed to create watch folder {}: {e}", parent.display());
            std::process::exit(1);
        }
    }

    match std::fs::copy(&cli.source, &destination) {
        Ok(_) => info!("Dropped {} into {}", cli.source.display(), destination.display()),
        Err(e) => {
            error!("Failed to copy into watched folder: {e}");
            std::process::exit(1);
        }
    }
}
