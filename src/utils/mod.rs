//! Utility modules

pub mod logging;

pub use logging::{LogFormat, LogLevel, LoggingConfig, LoggingSystem};
