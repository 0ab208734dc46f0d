//! Operator-facing texts and the JSON report

use std::path::Path;

use crate::domain::errors::ProbeError;
use crate::domain::model::{EncodeSummary, WorkflowReport};
use crate::error::CompressXResult;

const ROCKET: char = '\u{1F680}';
const CHECK: char = '\u{2713}';
const ARROW: char = '\u{27AD}';

pub const DELETE_QUESTION: &str = "Do you want to delete the original video file?";

pub fn view_question(viewer: &str) -> String {
    format!("Do you want to view the compressed video in {}?", viewer)
}

pub fn compressing_banner(input: &Path) -> String {
    format!("\n{} Compressing video: {}\n", ROCKET, input.display())
}

/// Probe failure line, with the cause so a missing tool or an interrupt stands out
pub fn probe_failure(error: &ProbeError) -> String {
    format!("Failed to retrieve video duration. {}", error)
}

/// Success block printed after the encoder finishes
pub fn summary_text(summary: &EncodeSummary) -> String {
    format!(
        "\n{check} Video compressed successfully: {output}\n{arrow} Size: {input_mb:.2} MB => {output_mb:.2} MB\n{arrow} Compression: {ratio:.2}%\n",
        check = CHECK,
        arrow = ARROW,
        output = summary.output_path.display(),
        input_mb = summary.input_size_mb,
        output_mb = summary.output_size_mb,
        ratio = summary.ratio_percent,
    )
}

pub fn deleted_text(input: &Path) -> String {
    format!("{} Deleted original video file: {}\n", CHECK, input.display())
}

pub fn launching_text(viewer: &str) -> String {
    format!("{} Starting {}...\n", CHECK, viewer)
}

/// Pretty JSON for `--json`
pub fn render_json(report: &WorkflowReport) -> CompressXResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
