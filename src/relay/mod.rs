pub mod publisher;

pub use publisher::{PublishOutcome, PublishedStatus, PublisherSettings, SkipReason, StatusPublisher};
