pub mod build;
pub mod config;
pub mod error;
pub mod github;
pub mod relay;
pub mod webhooks;

pub use error::{DecodeError, RelayError, ResolutionError};
