//! Argument lists for the external tools

use std::ffi::OsString;
use std::path::Path;

use crate::domain::model::QualityLevel;
use crate::engine::process::{Capture, CommandSpec};

/// Video codec handed to the encoder
pub const VIDEO_CODEC: &str = "libx264";

/// x264 speed/quality preset
pub const ENCODE_PRESET: &str = "fast";

/// `ffprobe` printing the bare container duration in seconds on stdout
pub fn probe_command(ffprobe: &str, input: &Path) -> CommandSpec {
    CommandSpec {
        program: ffprobe.to_string(),
        args: vec![
            OsString::from("-v"),
            OsString::from("error"),
            OsString::from("-show_entries"),
            OsString::from("format=duration"),
            OsString::from("-of"),
            OsString::from("default=noprint_wrappers=1:nokey=1"),
            OsString::from(input),
        ],
        capture: Capture::Stdout,
    }
}

/// `ffmpeg` re-encoding `input` into `output`, progress on stderr
pub fn encode_command(ffmpeg: &str, input: &Path, output: &Path, quality: QualityLevel) -> CommandSpec {
    CommandSpec {
        program: ffmpeg.to_string(),
        args: vec![
            OsString::from("-i"),
            OsString::from(input),
            OsString::from("-vcodec"),
            OsString::from(VIDEO_CODEC),
            OsString::from("-crf"),
            OsString::from(quality.crf().to_string()),
            OsString::from("-preset"),
            OsString::from(ENCODE_PRESET),
            OsString::from("-y"),
            OsString::from(output),
        ],
        capture: Capture::Stderr,
    }
}
