// Domain errors - Error types for the domain layer

use thiserror::Error;

/// Failures of the duration probe. Fatal to the workflow.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The probe binary could not be started
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The probe exited with a non-zero status
    #[error("Probe exited with status {code:?}")]
    ExitStatus { code: Option<i32> },

    /// The probe output was not a positive, finite number
    #[error("{output:?} is not a usable duration")]
    InvalidDuration { output: String },

    /// A duration was already recorded for this job
    #[error("Duration already probed for this job")]
    AlreadyProbed,

    /// The operator interrupted the probe
    #[error("Probe cancelled")]
    Cancelled,
}

/// Failures of the encode stage. Fatal to the workflow, partial output is left in place.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The encoder binary could not be started
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Encoding was requested before a usable duration was probed
    #[error("Cannot encode without a probed duration")]
    MissingDuration,

    /// The encoder exited with a non-zero status
    #[error("Encoder exited with status {code:?}")]
    EncoderFailed { code: Option<i32> },

    /// Reading a file size after encoding failed
    #[error("Failed to stat {path}: {source}")]
    Stat {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The encoder produced an empty output file
    #[error("Output file is empty: {path}")]
    EmptyOutput { path: String },

    /// The operator interrupted the encode
    #[error("Encoding cancelled")]
    Cancelled,
}

/// Failures while talking to the operator. Logged, never fatal.
#[derive(Error, Debug)]
pub enum PromptError {
    /// Reading the operator's answer failed
    #[error("Failed to read answer: {0}")]
    Read(#[source] std::io::Error),

    /// Deleting the original file failed
    #[error("Failed to delete {path}: {source}")]
    Delete {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to start the external viewer. Logged, never fatal.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// No viewer program is configured
    #[error("No viewer command configured")]
    NotConfigured,

    /// The viewer could not be spawned
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Domain-specific error types
#[derive(Error, Debug)]
pub enum DomainError {
    /// Invalid arguments provided
    #[error("Bad arguments: {0}")]
    BadArgs(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Launch(#[from] LaunchError),
}

impl DomainError {
    /// Whether the workflow must stop on this error
    pub fn is_fatal(&self) -> bool {
        !matches!(self, DomainError::Prompt(_) | DomainError::Launch(_))
    }
}
