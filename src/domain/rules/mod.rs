// Domain rules - Business logic and policies

use std::path::{Path, PathBuf};

use crate::domain::errors::ProbeError;


/// Suffix appended to the input stem to name the output
pub const OUTPUT_SUFFIX: &str = "_compressed";

/// Container extension of every output
pub const OUTPUT_EXTENSION: &str = "mp4";

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Derive the output path: strip the final extension, append `_compressed.mp4`.
///
/// `clips/holiday.final.mov` becomes `clips/holiday.final_compressed.mp4`.
pub fn derive_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = format!("{}{}.{}", stem, OUTPUT_SUFFIX, OUTPUT_EXTENSION);
    input.with_file_name(file_name)
}

/// Parse the probe's stdout into a usable duration
pub fn parse_duration(output: &str) -> Result<f64, ProbeError> {
    let trimmed = output.trim();
    match trimmed.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds > 0.0 => Ok(seconds),
        _ => Err(ProbeError::InvalidDuration {
            output: trimmed.to_string(),
        }),
    }
}

/// Elapsed seconds from `time=` components
pub fn elapsed_seconds(hours: f64, minutes: f64, seconds: f64) -> f64 {
    hours * 3600.0 + minutes * 60.0 + seconds
}

/// Raw completion percentage. Not clamped.
pub fn progress_percent(elapsed: f64, total: f64) -> f64 {
    elapsed / total * 100.0
}

/// Round half away from zero to two decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Byte count as megabytes, two decimals
pub fn size_in_mb(bytes: u64) -> f64 {
    round2(bytes as f64 / BYTES_PER_MB)
}

/// `input / output * 100`, two decimals
pub fn compression_ratio(input_mb: f64, output_mb: f64) -> f64 {
    round2(input_mb / output_mb * 100.0)
}

/// Operator answer: a trimmed, case-insensitive `y` is yes, anything else no
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}
