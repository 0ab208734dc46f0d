//! Encode orchestration
//!
//! `Idle -> Spawned -> Streaming -> Completed | Failed`. Progress is pushed to
//! the caller once per `time=` marker, and forced to 100 when the encoder
//! exits, before its status is examined.

use std::sync::Arc;

use tracing::{debug, error, info, trace, warn};

use crate::domain::errors::EncodeError;
use crate::domain::model::{EncodeJob, EncodeState, EncodeSummary};
use crate::domain::rules::progress_percent;
use crate::engine::cancel::Cancellation;
use crate::engine::command::encode_command;
use crate::engine::progress::{parse_time_marker, SegmentSplitter};
use crate::ports::{FsPort, ProcessPort};

/// Runs the encoder for one job and reports sizes when it is done
pub struct EncodeOrchestrator {
    process: Arc<dyn ProcessPort>,
    fs: Arc<dyn FsPort>,
    ffmpeg: String,
}

impl EncodeOrchestrator {
    pub fn new(process: Arc<dyn ProcessPort>, fs: Arc<dyn FsPort>, ffmpeg: impl Into<String>) -> Self {
        Self {
            process,
            fs,
            ffmpeg: ffmpeg.into(),
        }
    }

    /// Encode `job`, calling `on_progress` with the displayed percentage
    pub async fn encode(
        &self,
        job: &mut EncodeJob,
        on_progress: &mut (dyn FnMut(f64) + Send),
        cancel: &mut Cancellation,
    ) -> Result<EncodeSummary, EncodeError> {
        let result = self.drive(job, on_progress, cancel).await;
        match &result {
            Ok(summary) => {
                job.transition(EncodeState::Completed);
                info!(
                    output = %summary.output_path.display(),
                    ratio = summary.ratio_percent,
                    "encode completed"
                );
            }
            Err(e) => {
                job.transition(EncodeState::Failed);
                error!(error = %e, "encode failed");
            }
        }
        result
    }

    async fn drive(
        &self,
        job: &mut EncodeJob,
        on_progress: &mut (dyn FnMut(f64) + Send),
        cancel: &mut Cancellation,
    ) -> Result<EncodeSummary, EncodeError> {
        let total = job.duration().ok_or(EncodeError::MissingDuration)?;

        let spec = encode_command(&self.ffmpeg, job.input(), job.output(), job.quality());
        info!(command = %spec.display(), crf = job.quality().crf(), "starting encoder");
        let mut handle = self.process.spawn(&spec).map_err(|source| EncodeError::Spawn {
            program: self.ffmpeg.clone(),
            source,
        })?;
        job.transition(EncodeState::Spawned);

        let mut splitter = SegmentSplitter::new();
        job.transition(EncodeState::Streaming);
        loop {
            tokio::select! {
                chunk = handle.next_chunk() => match chunk {
                    Some(chunk) => {
                        for segment in splitter.push(&chunk) {
                            Self::track(job, &segment, total, on_progress);
                        }
                    }
                    None => break,
                },
                _ = cancel.cancelled() => {
                    warn!("encode cancelled, stopping encoder");
                    handle.kill();
                    let _ = handle.wait().await;
                    return Err(EncodeError::Cancelled);
                }
            }
        }
        if let Some(rest) = splitter.finish() {
            Self::track(job, &rest, total, on_progress);
        }

        let code = match handle.wait().await {
            Ok(code) => code,
            Err(e) => {
                warn!(error = %e, "lost track of encoder exit status");
                None
            }
        };

        // An interrupt from the terminal can reach the encoder before our own signal.
        if code != Some(0) && cancel.is_cancelled() {
            warn!(?code, "encoder stopped by interrupt");
            return Err(EncodeError::Cancelled);
        }

        on_progress(job.record_progress(100.0));
        debug!(?code, "encoder exited");
        if code != Some(0) {
            return Err(EncodeError::EncoderFailed { code });
        }

        self.summarize(job).await
    }

    fn track(job: &mut EncodeJob, segment: &str, total: f64, on_progress: &mut (dyn FnMut(f64) + Send)) {
        trace!(segment, "encoder diagnostic");
        if let Some(elapsed) = parse_time_marker(segment) {
            let shown = job.record_progress(progress_percent(elapsed, total));
            on_progress(shown);
        }
    }

    async fn summarize(&self, job: &EncodeJob) -> Result<EncodeSummary, EncodeError> {
        let input_bytes = self.size_of(job.input()).await?;
        let output_bytes = self.size_of(job.output()).await?;
        if output_bytes == 0 {
            return Err(EncodeError::EmptyOutput {
                path: job.output().display().to_string(),
            });
        }

        Ok(EncodeSummary::from_sizes(
            job.input(),
            job.output(),
            input_bytes,
            output_bytes,
        ))
    }

    async fn size_of(&self, path: &std::path::Path) -> Result<u64, EncodeError> {
        self.fs.file_size(path).await.map_err(|source| EncodeError::Stat {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::QualityLevel;
    use crate::engine::process::{CommandSpec, ProcessHandle};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    struct ScriptedProcess {
        chunks: Vec<&'static str>,
        code: Option<i32>,
        spawned: Mutex<Vec<CommandSpec>>,
    }

    impl ProcessPort for ScriptedProcess {
        fn spawn(&self, spec: &CommandSpec) -> io::Result<ProcessHandle> {
            self.spawned.lock().unwrap().push(spec.clone());
            Ok(ProcessHandle::scripted(self.chunks.clone(), self.code))
        }
    }

    struct SizedFs(HashMap<PathBuf, u64>);

    #[async_trait]
    impl FsPort for SizedFs {
        async fn file_exists(&self, path: &Path) -> bool {
            self.0.contains_key(path)
        }

        async fn file_size(&self, path: &Path) -> io::Result<u64> {
            self.0
                .get(path)
                .copied()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "missing"))
        }

        async fn remove_file(&self, _path: &Path) -> io::Result<()> {
            Ok(())
        }
    }

    const MB: u64 = 1024 * 1024;

    fn setup(chunks: Vec<&'static str>, code: Option<i32>, sizes: &[(&str, u64)]) -> (Arc<ScriptedProcess>, EncodeOrchestrator) {
        let process = Arc::new(ScriptedProcess {
            chunks,
            code,
            spawned: Mutex::new(Vec::new()),
        });
        let fs = SizedFs(sizes.iter().map(|(p, s)| (PathBuf::from(p), *s)).collect());
        let orchestrator = EncodeOrchestrator::new(process.clone(), Arc::new(fs), "ffmpeg");
        (process, orchestrator)
    }

    fn job(duration: f64) -> EncodeJob {
        let mut job = EncodeJob::new("in.mov", "in_compressed.mp4", QualityLevel::Balanced);
        job.assign_duration(duration).unwrap();
        job
    }

    #[tokio::test]
    async fn test_progress_from_markers() {
        let (_, orchestrator) = setup(
            vec![
                "Input #0, mov from 'in.mov'\n",
                "frame=10 time=00:00:45.00 bitrate=1k\r",
                "frame=20 time=00:01:30.00 bitrate=1k\r",
            ],
            Some(0),
            &[("in.mov", 100 * MB), ("in_compressed.mp4", 40 * MB)],
        );
        let mut job = job(90.0);
        let mut seen = Vec::new();
        let summary = orchestrator
            .encode(&mut job, &mut |pct| seen.push(pct), &mut Cancellation::none())
            .await
            .unwrap();

        assert_eq!(seen, vec![50.0, 100.0, 100.0]);
        assert_eq!(summary.ratio_percent, 250.0);
        assert_eq!(summary.input_size_mb, 100.0);
        assert_eq!(summary.output_size_mb, 40.0);
        assert_eq!(job.state(), EncodeState::Completed);
    }

    #[tokio::test]
    async fn test_chunks_without_marker_produce_no_callback() {
        let (_, orchestrator) = setup(
            vec!["ffmpeg version 6.1\n", "Stream mapping:\n"],
            Some(0),
            &[("in.mov", MB), ("in_compressed.mp4", MB)],
        );
        let mut job = job(90.0);
        let mut seen = Vec::new();
        orchestrator
            .encode(&mut job, &mut |pct| seen.push(pct), &mut Cancellation::none())
            .await
            .unwrap();

        // Only the forced completion.
        assert_eq!(seen, vec![100.0]);
    }

    #[tokio::test]
    async fn test_exit_forces_full_progress() {
        let (_, orchestrator) = setup(
            vec!["time=00:00:09.00\r"],
            Some(0),
            &[("in.mov", MB), ("in_compressed.mp4", MB)],
        );
        let mut job = job(90.0);
        let mut seen = Vec::new();
        orchestrator
            .encode(&mut job, &mut |pct| seen.push(pct), &mut Cancellation::none())
            .await
            .unwrap();

        assert_eq!(seen, vec![10.0, 100.0]);
        assert_eq!(job.progress(), 100.0);
    }

    #[tokio::test]
    async fn test_jitter_does_not_regress() {
        let (_, orchestrator) = setup(
            vec!["time=00:00:30.00\rtime=00:00:27.00\r"],
            Some(0),
            &[("in.mov", MB), ("in_compressed.mp4", MB)],
        );
        let mut job = job(60.0);
        let mut seen = Vec::new();
        orchestrator
            .encode(&mut job, &mut |pct| seen.push(pct), &mut Cancellation::none())
            .await
            .unwrap();

        assert_eq!(seen, vec![50.0, 50.0, 100.0]);
    }

    #[tokio::test]
    async fn test_non_zero_exit_fails_after_finalising_progress() {
        let (_, orchestrator) = setup(
            vec!["time=00:00:10.00\r"],
            Some(1),
            &[("in.mov", MB), ("in_compressed.mp4", MB)],
        );
        let mut job = job(90.0);
        let mut seen = Vec::new();
        let err = orchestrator
            .encode(&mut job, &mut |pct| seen.push(pct), &mut Cancellation::none())
            .await
            .unwrap_err();

        assert!(matches!(err, EncodeError::EncoderFailed { code: Some(1) }));
        assert_eq!(seen.last(), Some(&100.0));
        assert_eq!(job.state(), EncodeState::Failed);
    }

    #[tokio::test]
    async fn test_missing_output_is_stat_failure() {
        let (_, orchestrator) = setup(vec![], Some(0), &[("in.mov", MB)]);
        let mut job = job(90.0);
        let err = orchestrator
            .encode(&mut job, &mut |_| {}, &mut Cancellation::none())
            .await
            .unwrap_err();

        assert!(matches!(err, EncodeError::Stat { ref path, .. } if path == "in_compressed.mp4"));
        assert_eq!(job.state(), EncodeState::Failed);
    }

    #[tokio::test]
    async fn test_empty_output() {
        let (_, orchestrator) = setup(vec![], Some(0), &[("in.mov", MB), ("in_compressed.mp4", 0)]);
        let mut job = job(90.0);
        let err = orchestrator
            .encode(&mut job, &mut |_| {}, &mut Cancellation::none())
            .await
            .unwrap_err();
        assert!(matches!(err, EncodeError::EmptyOutput { .. }));
    }

    #[tokio::test]
    async fn test_no_duration_no_spawn() {
        let (process, orchestrator) = setup(vec![], Some(0), &[]);
        let mut job = EncodeJob::new("in.mov", "out.mp4", QualityLevel::Balanced);
        let err = orchestrator
            .encode(&mut job, &mut |_| {}, &mut Cancellation::none())
            .await
            .unwrap_err();

        assert!(matches!(err, EncodeError::MissingDuration));
        assert!(process.spawned.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_encoder_receives_quality_crf() {
        let (process, orchestrator) = setup(vec![], Some(0), &[("in.mov", MB), ("out.mp4", MB)]);
        let mut job = EncodeJob::new("in.mov", "out.mp4", QualityLevel::Reduced);
        job.assign_duration(10.0).unwrap();
        orchestrator
            .encode(&mut job, &mut |_| {}, &mut Cancellation::none())
            .await
            .unwrap();

        let spawned = process.spawned.lock().unwrap();
        let args = &spawned[0].args;
        let crf = args.iter().position(|a| a == "-crf").and_then(|i| args[i + 1].to_str());
        assert_eq!(crf, Some("35"));
    }

    #[tokio::test]
    async fn test_interrupted_encoder_exit_is_cancellation() {
        use tokio::sync::{broadcast, mpsc, oneshot};

        struct InterruptedEncoder(Mutex<Option<ProcessHandle>>);

        impl ProcessPort for InterruptedEncoder {
            fn spawn(&self, _spec: &CommandSpec) -> io::Result<ProcessHandle> {
                self.0
                    .lock()
                    .unwrap()
                    .take()
                    .ok_or_else(|| io::Error::other("spawned twice"))
            }
        }

        let (chunk_tx, chunk_rx) = mpsc::channel::<String>(1);
        let (exit_tx, exit_rx) = oneshot::channel();
        let handle = ProcessHandle::new(chunk_rx, exit_rx, None);
        let fs = SizedFs([(PathBuf::from("in.mov"), MB), (PathBuf::from("in_compressed.mp4"), MB)].into());
        let orchestrator = EncodeOrchestrator::new(
            Arc::new(InterruptedEncoder(Mutex::new(Some(handle)))),
            Arc::new(fs),
            "ffmpeg",
        );

        let (stop_tx, stop_rx) = broadcast::channel(1);
        let mut cancel = Cancellation::new(stop_rx);
        let mut job = job(90.0);
        let mut seen = Vec::new();

        // The pipe closes first, the stop signal lands while the exit status is pending.
        let mut on_progress = |pct| seen.push(pct);
        let (result, ()) = tokio::join!(
            orchestrator.encode(&mut job, &mut on_progress, &mut cancel),
            async move {
                drop(chunk_tx);
                tokio::task::yield_now().await;
                tokio::task::yield_now().await;
                stop_tx.send(()).unwrap();
                let _ = exit_tx.send(Ok(Some(255)));
            }
        );

        assert!(matches!(result, Err(EncodeError::Cancelled)));
        assert!(seen.is_empty());
        assert_eq!(job.state(), EncodeState::Failed);
    }
}
