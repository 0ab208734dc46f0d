//! CLI module for CompressX
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::Parser;

pub mod args;
pub mod commands;

pub use args::CompressArgs;

/// CompressX video compressor
///
/// Re-encodes a video with x264 at a reduced bitrate, shows progress while
/// ffmpeg runs, then offers to delete the original and open the result.
#[derive(Parser, Debug)]
#[command(name = "compressor")]
#[command(about = "CompressX - Shrink video files with ffmpeg")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Logging format (pretty, compact, json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Configuration file (default: ./compressx.toml when present)
    #[arg(long, env = "COMPRESSX_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub compress: CompressArgs,
}
