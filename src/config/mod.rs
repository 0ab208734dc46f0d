//! Application configuration
//!
//! Layers, lowest to highest: built-in defaults, TOML file, environment,
//! command line. Codec, preset and the CRF table are fixed and not part of it.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::utils::logging::LoggingConfig;

pub const ENV_FFMPEG: &str = "COMPRESSX_FFMPEG";
pub const ENV_FFPROBE: &str = "COMPRESSX_FFPROBE";
pub const ENV_VIEWER: &str = "COMPRESSX_VIEWER";
pub const ENV_LOG_LEVEL: &str = "COMPRESSX_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "COMPRESSX_LOG_FORMAT";

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "compressx.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tools: ToolsConfig,
    pub viewer: ViewerConfig,
    pub logging: LoggingConfig,
}

/// Locations of the external media tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg: String,
    pub ffprobe: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }
}

/// Application the result is opened in. The output path is appended to `args`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub name: String,
    pub program: String,
    pub args: Vec<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            name: "Arc Browser".to_string(),
            program: "open".to_string(),
            args: vec!["-a".to_string(), "Arc".to_string()],
        }
    }
}

impl AppConfig {
    /// Apply environment overrides. `lookup` is `std::env::var` outside of tests.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<usize, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;

        if let Some(ffmpeg) = lookup(ENV_FFMPEG) {
            self.tools.ffmpeg = ffmpeg;
            applied += 1;
        }
        if let Some(ffprobe) = lookup(ENV_FFPROBE) {
            self.tools.ffprobe = ffprobe;
            applied += 1;
        }
        if let Some(viewer) = lookup(ENV_VIEWER) {
            let mut parts = viewer.split_whitespace().map(str::to_string);
            self.viewer.program = parts.next().unwrap_or_default();
            self.viewer.args = parts.collect();
            self.viewer.name = self.viewer.program.clone();
            applied += 1;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level.parse()?;
            applied += 1;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            self.logging.format = format.parse()?;
            applied += 1;
        }

        if applied > 0 {
            info!("Applied {} environment variable overrides", applied);
        }
        Ok(applied)
    }
}
