//! Progress extraction from the encoder's diagnostic stream

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::rules::elapsed_seconds;

static TIME_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"time=\s*(\d+):(\d+):(\d+(?:\.\d+)?)").expect("time marker pattern is valid")
});

/// Elapsed seconds from the first `time=HH:MM:SS.fraction` marker in `text`
pub fn parse_time_marker(text: &str) -> Option<f64> {
    let caps = TIME_MARKER.captures(text)?;
    let hours: f64 = caps[1].parse().ok()?;
    let minutes: f64 = caps[2].parse().ok()?;
    let seconds: f64 = caps[3].parse().ok()?;
    Some(elapsed_seconds(hours, minutes, seconds))
}

/// Splits raw reads into status segments.
///
/// ffmpeg redraws its status line with `\r`, so both `\r` and `\n` end a
/// segment. A trailing partial segment is held until the next read.
#[derive(Debug, Default)]
pub struct SegmentSplitter {
    pending: String,
}

impl SegmentSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning every segment it completes
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.pending.push_str(chunk);
        let mut segments = Vec::new();
        while let Some(pos) = self.pending.find(['\r', '\n']) {
            let segment: String = self.pending.drain(..=pos).collect();
            let segment = segment.trim_end_matches(['\r', '\n']);
            if !segment.trim().is_empty() {
                segments.push(segment.to_string());
            }
        }
        segments
    }

    /// Whatever is left once the stream has closed
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.pending);
        if rest.trim().is_empty() {
            None
        } else {
            Some(rest)
        }
    }
}
