//! CompressX Library
//!
//! Re-encodes a video through ffmpeg at a reduced bitrate, tracks progress from
//! the encoder's diagnostic stream, and reports the size reduction.
//!
//! The workflow lives in [`app::CompressInteractor`]; every external effect
//! (child processes, filesystem, terminal, viewer) goes through a port in
//! [`ports`] so it can be replaced in tests.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod output;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::{DomainError, EncodeError, LaunchError, ProbeError, PromptError};
pub use domain::model::{EncodeJob, EncodeState, EncodeSummary, QualityLevel, WorkflowReport};
pub use error::{CompressXError, CompressXResult};
