//! Shared test doubles for the workflow ports

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use compressx_cli::app::CompressInteractor;
use compressx_cli::engine::{CommandSpec, ProcessHandle};
use compressx_cli::ports::*;
use compressx_cli::{LaunchError, PromptError};

pub const MB: u64 = 1024 * 1024;

/// Replays one scripted run per spawn and records every command
#[derive(Default)]
pub struct FakeProcesses {
    scripts: Mutex<VecDeque<(Vec<String>, Option<i32>)>>,
    pub spawned: Mutex<Vec<CommandSpec>>,
    /// Files created when the matching program is spawned
    pub creates: Mutex<Vec<(String, PathBuf, u64)>>,
}

impl FakeProcesses {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, chunks: &[&str], code: Option<i32>) {
        self.scripts
            .lock()
            .unwrap()
            .push_back((chunks.iter().map(|c| c.to_string()).collect(), code));
    }

    pub fn programs(&self) -> Vec<String> {
        self.spawned.lock().unwrap().iter().map(|s| s.program.clone()).collect()
    }
}

impl ProcessPort for FakeProcesses {
    fn spawn(&self, spec: &CommandSpec) -> io::Result<ProcessHandle> {
        self.spawned.lock().unwrap().push(spec.clone());
        let (chunks, code) = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no script left"))?;
        Ok(ProcessHandle::scripted(chunks, code))
    }
}

/// In-memory file sizes
#[derive(Default)]
pub struct MemoryFs {
    pub files: Mutex<HashMap<PathBuf, u64>>,
    pub fail_remove: bool,
}

impl MemoryFs {
    pub fn with_files(files: &[(&str, u64)]) -> Arc<Self> {
        Arc::new(Self {
            files: Mutex::new(files.iter().map(|(p, s)| (PathBuf::from(p), *s)).collect()),
            fail_remove: false,
        })
    }

    pub fn with_failing_remove(files: &[(&str, u64)]) -> Arc<Self> {
        Arc::new(Self {
            files: Mutex::new(files.iter().map(|(p, s)| (PathBuf::from(p), *s)).collect()),
            fail_remove: true,
        })
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.lock().unwrap().contains_key(Path::new(path))
    }
}

#[async_trait]
impl FsPort for MemoryFs {
    async fn file_exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    async fn file_size(&self, path: &Path) -> io::Result<u64> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        if self.fail_remove {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.files
            .lock()
            .unwrap()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}

/// Answers questions from a queue; an exhausted queue fails the read
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<bool>>,
    pub asked: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn answering(answers: &[bool]) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            asked: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl PromptPort for ScriptedPrompt {
    async fn confirm(&self, question: &str) -> Result<bool, PromptError> {
        self.asked.lock().unwrap().push(question.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| PromptError::Read(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed")))
    }
}

/// Records launches
#[derive(Default)]
pub struct RecordingLauncher {
    pub launched: Mutex<Vec<PathBuf>>,
    pub fail: bool,
}

impl LauncherPort for RecordingLauncher {
    fn viewer_name(&self) -> &str {
        "Arc Browser"
    }

    fn launch(&self, target: &Path) -> Result<(), LaunchError> {
        if self.fail {
            return Err(LaunchError::Spawn {
                program: "open".to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "not installed"),
            });
        }
        self.launched.lock().unwrap().push(target.to_path_buf());
        Ok(())
    }
}

/// Everything the workflow showed the operator
#[derive(Debug, Clone, PartialEq)]
pub enum Shown {
    Message(String),
    Error(String),
    Start,
    Update(f64),
    Finish,
    Abandon,
}

#[derive(Default)]
pub struct RecordingReporter {
    pub events: Mutex<Vec<Shown>>,
}

impl RecordingReporter {
    pub fn updates(&self) -> Vec<f64> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Shown::Update(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Shown::Error(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn has(&self, event: &Shown) -> bool {
        self.events.lock().unwrap().contains(event)
    }
}

impl ReporterPort for RecordingReporter {
    fn message(&self, text: &str) {
        self.events.lock().unwrap().push(Shown::Message(text.to_string()));
    }

    fn error(&self, text: &str) {
        self.events.lock().unwrap().push(Shown::Error(text.to_string()));
    }

    fn progress_start(&self) {
        self.events.lock().unwrap().push(Shown::Start);
    }

    fn progress_update(&self, percent: f64) {
        self.events.lock().unwrap().push(Shown::Update(percent));
    }

    fn progress_finish(&self) {
        self.events.lock().unwrap().push(Shown::Finish);
    }

    fn progress_abandon(&self) {
        self.events.lock().unwrap().push(Shown::Abandon);
    }
}

/// All doubles of one workflow run
pub struct Harness {
    pub processes: Arc<FakeProcesses>,
    pub fs: Arc<MemoryFs>,
    pub prompt: Arc<ScriptedPrompt>,
    pub launcher: Arc<RecordingLauncher>,
    pub reporter: Arc<RecordingReporter>,
}

impl Harness {
    pub fn new(fs: Arc<MemoryFs>, answers: &[bool]) -> Self {
        Self {
            processes: FakeProcesses::new(),
            fs,
            prompt: ScriptedPrompt::answering(answers),
            launcher: Arc::new(RecordingLauncher::default()),
            reporter: Arc::new(RecordingReporter::default()),
        }
    }

    pub fn with_failing_launcher(mut self) -> Self {
        self.launcher = Arc::new(RecordingLauncher {
            launched: Mutex::new(Vec::new()),
            fail: true,
        });
        self
    }

    pub fn interactor(&self) -> CompressInteractor {
        CompressInteractor::new(
            self.processes.clone(),
            self.fs.clone(),
            self.prompt.clone(),
            self.launcher.clone(),
            self.reporter.clone(),
            "ffprobe",
            "ffmpeg",
        )
    }
}
