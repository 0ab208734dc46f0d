// Compress interactor - Orchestrates the probe, encode and follow-up questions

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::derive_output_path;
use crate::engine::cancel::Cancellation;
use crate::engine::encoder::EncodeOrchestrator;
use crate::engine::prober::DurationProber;
use crate::output;
use crate::ports::*;

/// One invocation of the tool
#[derive(Debug, Clone, PartialEq)]
pub struct CompressRequest {
    pub input: PathBuf,
    pub quality: QualityLevel,
    /// Ask the delete/open questions after a successful encode
    pub interactive: bool,
}

impl CompressRequest {
    pub fn new(input: impl Into<PathBuf>, quality: QualityLevel) -> Self {
        Self {
            input: input.into(),
            quality,
            interactive: true,
        }
    }

    pub fn non_interactive(mut self) -> Self {
        self.interactive = false;
        self
    }
}

/// Interactor for the compression use case
pub struct CompressInteractor {
    prober: DurationProber,
    encoder: EncodeOrchestrator,
    fs_port: Arc<dyn FsPort>,
    prompt_port: Arc<dyn PromptPort>,
    launcher_port: Arc<dyn LauncherPort>,
    reporter_port: Arc<dyn ReporterPort>,
}

impl CompressInteractor {
    /// Create new compress interactor with injected ports
    pub fn new(
        process_port: Arc<dyn ProcessPort>,
        fs_port: Arc<dyn FsPort>,
        prompt_port: Arc<dyn PromptPort>,
        launcher_port: Arc<dyn LauncherPort>,
        reporter_port: Arc<dyn ReporterPort>,
        ffprobe: &str,
        ffmpeg: &str,
    ) -> Self {
        Self {
            prober: DurationProber::new(Arc::clone(&process_port), ffprobe),
            encoder: EncodeOrchestrator::new(process_port, Arc::clone(&fs_port), ffmpeg),
            fs_port,
            prompt_port,
            launcher_port,
            reporter_port,
        }
    }

    /// Run the whole workflow
    pub async fn execute(
        &self,
        request: CompressRequest,
        mut cancel: Cancellation,
    ) -> Result<WorkflowReport, DomainError> {
        if !self.fs_port.file_exists(&request.input).await {
            let error = DomainError::FileNotFound(request.input.display().to_string());
            self.reporter_port.error(&error.to_string());
            return Err(error);
        }

        let output_path = derive_output_path(&request.input);
        let mut job = EncodeJob::new(&request.input, output_path, request.quality);
        info!(
            input = %job.input().display(),
            output = %job.output().display(),
            quality = %job.quality(),
            "starting compression"
        );

        let probed = self.prober.probe_duration(job.input(), &mut cancel).await;
        if let Err(e) = probed.and_then(|seconds| job.assign_duration(seconds)) {
            self.reporter_port.error(&output::probe_failure(&e));
            return Err(e.into());
        }

        self.reporter_port.message(&output::compressing_banner(job.input()));
        self.reporter_port.progress_start();

        let reporter = Arc::clone(&self.reporter_port);
        let mut on_progress = move |percent: f64| reporter.progress_update(percent);
        let summary = match self.encoder.encode(&mut job, &mut on_progress, &mut cancel).await {
            Ok(summary) => summary,
            Err(e) => {
                self.reporter_port.progress_abandon();
                self.reporter_port.error(&format!("Failed to compress video: {}", e));
                return Err(e.into());
            }
        };
        self.reporter_port.progress_finish();
        self.reporter_port.message(&output::summary_text(&summary));

        // Past this point the stop signal has nothing left to stop.
        drop(cancel);

        let (original_deleted, viewer_launched) = if request.interactive {
            let deleted = self.offer_delete(&job).await;
            let launched = self.offer_viewer(&job).await;
            (deleted, launched)
        } else {
            (false, false)
        };

        Ok(WorkflowReport {
            summary,
            state: job.state(),
            original_deleted,
            viewer_launched,
        })
    }

    async fn offer_delete(&self, job: &EncodeJob) -> bool {
        match self.prompt_port.confirm(output::DELETE_QUESTION).await {
            Ok(true) => match self.fs_port.remove_file(job.input()).await {
                Ok(()) => {
                    info!(path = %job.input().display(), "deleted original");
                    self.reporter_port.message(&output::deleted_text(job.input()));
                    true
                }
                Err(source) => {
                    self.report_non_fatal(PromptError::Delete {
                        path: job.input().display().to_string(),
                        source,
                    });
                    false
                }
            },
            Ok(false) => false,
            Err(e) => {
                self.report_non_fatal(e);
                false
            }
        }
    }

    async fn offer_viewer(&self, job: &EncodeJob) -> bool {
        let viewer = self.launcher_port.viewer_name().to_string();
        match self.prompt_port.confirm(&output::view_question(&viewer)).await {
            Ok(true) => {
                self.reporter_port.message(&output::launching_text(&viewer));
                match self.launcher_port.launch(job.output()) {
                    Ok(()) => true,
                    Err(e) => {
                        self.report_non_fatal(e);
                        false
                    }
                }
            }
            Ok(false) => false,
            Err(e) => {
                self.report_non_fatal(e);
                false
            }
        }
    }

    fn report_non_fatal(&self, error: impl Into<DomainError>) {
        let error = error.into();
        warn!(error = %error, "continuing after non-fatal error");
        self.reporter_port.error(&error.to_string());
    }
}
