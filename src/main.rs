//! CompressX CLI
//!
//! Shrinks a video with ffmpeg/x264, showing a progress bar while it runs,
//! then offers to delete the original and open the result.
//!
//! # Usage
//!
//! ```bash
//! compressor holiday.mov          # quality "ok"
//! compressor holiday.mov bad      # smallest output
//! compressor holiday.mov good --no-prompt --json
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use compressx_cli::cli::{commands, Cli};
use compressx_cli::config_initialization::initialize_configuration_hierarchy;
use compressx_cli::utils::logging::LoggingSystem;

/// Main entry point for the CompressX CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let config = initialize_configuration_hierarchy(&cli)?;

    // Initialize logging
    LoggingSystem::new(config.logging.clone())
        .initialize()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Starting CompressX");

    if let Err(e) = commands::compress(&cli, &config).await {
        error!("{:#}", e);
        if !commands::already_reported(&e) {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }

    info!("CompressX completed successfully");
    Ok(())
}
