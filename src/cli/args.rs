//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for a compression run
#[derive(Args, Debug, Clone)]
pub struct CompressArgs {
    /// Input video file path
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output quality: bad, ok or good (default: ok)
    #[arg(value_name = "QUALITY")]
    pub quality: Option<String>,

    /// Print the final report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Skip the delete/open questions and keep everything as is
    #[arg(long)]
    pub no_prompt: bool,
}
