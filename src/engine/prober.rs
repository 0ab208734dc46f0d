//! Duration probe

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::errors::ProbeError;
use crate::domain::model::ProcessOutcome;
use crate::domain::rules::parse_duration;
use crate::engine::cancel::Cancellation;
use crate::engine::command::probe_command;
use crate::ports::ProcessPort;

/// Runs the media-inspection tool and reads back the total duration
pub struct DurationProber {
    process: Arc<dyn ProcessPort>,
    ffprobe: String,
}

impl DurationProber {
    pub fn new(process: Arc<dyn ProcessPort>, ffprobe: impl Into<String>) -> Self {
        Self {
            process,
            ffprobe: ffprobe.into(),
        }
    }

    /// Total duration of `input` in seconds
    pub async fn probe_duration(&self, input: &Path, cancel: &mut Cancellation) -> Result<f64, ProbeError> {
        let outcome = self.run(input, cancel).await?;
        outcome.duration.ok_or(ProbeError::InvalidDuration {
            output: String::new(),
        })
    }

    async fn run(&self, input: &Path, cancel: &mut Cancellation) -> Result<ProcessOutcome, ProbeError> {
        let spec = probe_command(&self.ffprobe, input);
        let mut handle = self.process.spawn(&spec).map_err(|source| ProbeError::Spawn {
            program: self.ffprobe.clone(),
            source,
        })?;

        let mut output = String::new();
        loop {
            tokio::select! {
                chunk = handle.next_chunk() => match chunk {
                    Some(chunk) => output.push_str(&chunk),
                    None => break,
                },
                _ = cancel.cancelled() => {
                    warn!("probe cancelled");
                    handle.kill();
                    let _ = handle.wait().await;
                    return Err(ProbeError::Cancelled);
                }
            }
        }

        let code = handle.wait().await.map_err(|source| ProbeError::Spawn {
            program: self.ffprobe.clone(),
            source,
        })?;
        debug!(?code, output = %output.trim(), "probe finished");

        if code != Some(0) {
            if cancel.is_cancelled() {
                warn!(?code, "probe stopped by interrupt");
                return Err(ProbeError::Cancelled);
            }
            return Err(ProbeError::ExitStatus { code });
        }

        let seconds = parse_duration(&output)?;
        info!(input = %input.display(), seconds, "probed duration");
        Ok(ProcessOutcome {
            code,
            duration: Some(seconds),
        })
    }
}
