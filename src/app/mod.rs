// Application layer - Use case interactors

pub mod compress_interactor;
pub mod container;

// Re-export interactors
pub use compress_interactor::{CompressInteractor, CompressRequest};
pub use container::{AppContainer, DefaultAppContainer};
