// Ports - Interface definitions (contracts)

use std::io;
use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::engine::process::{CommandSpec, ProcessHandle};

/// Port for starting external tools
pub trait ProcessPort: Send + Sync {
    /// Start `spec` and stream its captured pipe
    fn spawn(&self, spec: &CommandSpec) -> io::Result<ProcessHandle>;
}

/// Port for file system access
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if a regular file exists
    async fn file_exists(&self, path: &Path) -> bool;

    /// Size of a file in bytes
    async fn file_size(&self, path: &Path) -> io::Result<u64>;

    /// Delete a file
    async fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// Port for yes/no questions to the operator
#[async_trait]
pub trait PromptPort: Send + Sync {
    /// Ask `question`; `true` only on an affirmative answer
    async fn confirm(&self, question: &str) -> Result<bool, PromptError>;
}

/// Port for opening the result in an external viewer
pub trait LauncherPort: Send + Sync {
    /// Human-readable viewer name for messages
    fn viewer_name(&self) -> &str;

    /// Start the viewer on `target` without waiting for it
    fn launch(&self, target: &Path) -> Result<(), LaunchError>;
}

/// Port for operator-facing output: messages and the progress indicator
pub trait ReporterPort: Send + Sync {
    /// Informational line
    fn message(&self, text: &str);

    /// Failure line
    fn error(&self, text: &str);

    /// Show a fresh progress indicator at 0%
    fn progress_start(&self);

    /// Move the indicator to `percent`
    fn progress_update(&self, percent: f64);

    /// Complete the indicator at 100%
    fn progress_finish(&self);

    /// Stop the indicator where it is
    fn progress_abandon(&self);
}
