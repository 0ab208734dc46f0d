// Viewer launcher adapter - Opens the compressed file in an external application

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::config::ViewerConfig;
use crate::domain::errors::LaunchError;
use crate::ports::LauncherPort;

/// Starts the configured viewer with the output path appended to its arguments
pub struct ViewerLauncherAdapter {
    name: String,
    program: String,
    args: Vec<String>,
}

impl ViewerLauncherAdapter {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            name: config.name.clone(),
            program: config.program.clone(),
            args: config.args.clone(),
        }
    }
}

impl LauncherPort for ViewerLauncherAdapter {
    fn viewer_name(&self) -> &str {
        &self.name
    }

    fn launch(&self, target: &Path) -> Result<(), LaunchError> {
        if self.program.trim().is_empty() {
            return Err(LaunchError::NotConfigured);
        }

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(target)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        info!(viewer = %self.name, target = %target.display(), "viewer launched");

        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => debug!(?status, "viewer exited"),
                Err(e) => debug!(error = %e, "lost track of viewer"),
            }
        });
        Ok(())
    }
}
