pub mod client;
pub mod status;
pub mod types;

pub use client::GitHubClient;
pub use status::map_status;
pub use types::{CommitState, CommitStatus, StatusRequest};
