// Tokio process adapter - Real child processes for the external tools

use std::io;

use crate::engine::process::{CommandSpec, ProcessHandle};
use crate::ports::ProcessPort;

/// Spawns external tools as tokio child processes
#[derive(Debug, Default, Clone)]
pub struct TokioProcessAdapter;

impl TokioProcessAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessPort for TokioProcessAdapter {
    fn spawn(&self, spec: &CommandSpec) -> io::Result<ProcessHandle> {
        ProcessHandle::spawn(spec)
    }
}
