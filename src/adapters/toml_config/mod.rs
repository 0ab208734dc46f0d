// TOML config adapter - Reads configuration files

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{AppConfig, DEFAULT_CONFIG_FILE};
use crate::error::{CompressXError, CompressXResult};

/// TOML configuration loader
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse a TOML document. Missing sections and keys keep their defaults.
    pub fn parse(content: &str) -> CompressXResult<AppConfig> {
        toml::from_str(content).map_err(|e| CompressXError::Config {
            message: format!("Failed to parse TOML config: {}", e),
        })
    }

    /// Load an explicitly requested file; it must exist
    pub fn load(path: &Path) -> CompressXResult<AppConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| CompressXError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;
        let config = Self::parse(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Load `explicit` if given, else the default file if present, else defaults
    pub fn load_or_default(explicit: Option<&Path>) -> CompressXResult<AppConfig> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let fallback = Self::default_config_path();
        if fallback.is_file() {
            Self::load(&fallback)
        } else {
            info!("No config file found, using defaults");
            Ok(AppConfig::default())
        }
    }

    /// `./compressx.toml`
    pub fn default_config_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }
}
