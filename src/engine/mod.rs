//! Child-process engine: probing, encoding and progress extraction

pub mod cancel;
pub mod command;
pub mod encoder;
pub mod process;
pub mod prober;
pub mod progress;

pub use cancel::Cancellation;
pub use encoder::EncodeOrchestrator;
pub use process::{Capture, CommandSpec, ProcessHandle};
pub use prober::DurationProber;
