// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::errors::{DomainError, ProbeError};
use crate::domain::rules::{compression_ratio, round2, size_in_mb};


/// Output quality preset, chosen once per invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    /// Smallest output (`bad`)
    Reduced,
    /// Default trade-off (`ok`)
    #[default]
    Balanced,
    /// Largest output (`good`)
    HighFidelity,
}

impl QualityLevel {
    /// Parse a CLI token. Tokens are matched exactly and case-sensitively.
    pub fn parse(token: &str) -> Result<Self, DomainError> {
        match token {
            "bad" => Ok(Self::Reduced),
            "ok" => Ok(Self::Balanced),
            "good" => Ok(Self::HighFidelity),
            other => Err(DomainError::BadArgs(format!(
                "Invalid quality parameter {:?}. Use \"bad\", \"ok\", or \"good\".",
                other
            ))),
        }
    }

    /// Resolve an optional token, falling back to `Balanced` when absent
    pub fn from_option(token: Option<&str>) -> Result<Self, DomainError> {
        token.map(Self::parse).transpose().map(Option::unwrap_or_default)
    }

    /// Constant Rate Factor handed to x264. Lower means higher quality.
    pub fn crf(self) -> u8 {
        match self {
            Self::Reduced => 35,
            Self::Balanced => 28,
            Self::HighFidelity => 23,
        }
    }

    /// CLI token for this level
    pub fn token(self) -> &'static str {
        match self {
            Self::Reduced => "bad",
            Self::Balanced => "ok",
            Self::HighFidelity => "good",
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (crf {})", self.token(), self.crf())
    }
}

/// Orchestrator state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodeState {
    Idle,
    Spawned,
    Streaming,
    Completed,
    Failed,
}

impl EncodeState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// One compression task, alive for the duration of both child processes
#[derive(Debug, Clone)]
pub struct EncodeJob {
    input: PathBuf,
    output: PathBuf,
    quality: QualityLevel,
    duration: Option<f64>,
    progress: f64,
    state: EncodeState,
}

impl EncodeJob {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, quality: QualityLevel) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            quality,
            duration: None,
            progress: 0.0,
            state: EncodeState::Idle,
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn quality(&self) -> QualityLevel {
        self.quality
    }

    /// Probed duration in seconds, if the probe has succeeded
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Current displayed progress, in `[0, 100]`
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn state(&self) -> EncodeState {
        self.state
    }

    /// Record the probed duration. Only a positive, finite value is accepted, and only once.
    pub fn assign_duration(&mut self, seconds: f64) -> Result<(), ProbeError> {
        if self.duration.is_some() {
            return Err(ProbeError::AlreadyProbed);
        }
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(ProbeError::InvalidDuration {
                output: seconds.to_string(),
            });
        }
        self.duration = Some(seconds);
        Ok(())
    }

    /// Fold a raw percentage into the job's progress and return the value to display.
    ///
    /// The stored value is clamped to `[0, 100]` and never decreases, so a jittery
    /// timestamp leaves the display where it was.
    pub fn record_progress(&mut self, raw_percent: f64) -> f64 {
        if raw_percent.is_nan() {
            return self.progress;
        }
        let clamped = raw_percent.clamp(0.0, 100.0);
        if clamped > self.progress {
            self.progress = clamped;
        }
        self.progress
    }

    pub(crate) fn transition(&mut self, next: EncodeState) {
        tracing::debug!(from = ?self.state, to = ?next, "encode state transition");
        self.state = next;
    }
}

/// Terminal result of a child process
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutcome {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    /// Parsed duration, probe only
    pub duration: Option<f64>,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Final report of a successful encode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodeSummary {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub input_size_mb: f64,
    pub output_size_mb: f64,
    pub ratio_percent: f64,
}

impl EncodeSummary {
    /// Build the summary from sizes on disk, in bytes
    pub fn from_sizes(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        input_bytes: u64,
        output_bytes: u64,
    ) -> Self {
        let input_size_mb = size_in_mb(input_bytes);
        let output_size_mb = size_in_mb(output_bytes);
        let ratio_percent = if output_size_mb > 0.0 {
            compression_ratio(input_size_mb, output_size_mb)
        } else {
            // Sub-10KB output rounds to 0.00 MB; fall back to exact byte counts.
            round2(input_bytes as f64 / output_bytes.max(1) as f64 * 100.0)
        };

        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            input_size_mb,
            output_size_mb,
            ratio_percent,
        }
    }
}

/// What happened after the encode, as decided by the operator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowReport {
    pub summary: EncodeSummary,
    pub state: EncodeState,
    pub original_deleted: bool,
    pub viewer_launched: bool,
}
