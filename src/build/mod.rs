//! Cloud Build notification handling: decoding, types and repository resolution.

pub mod event;
pub mod resolver;
pub mod types;

pub use event::{decode_build, decode_message, encode_build, PubsubMessage, PushEnvelope};
pub use resolver::{resolve, ResolvedRepo, StepLayout};
pub use types::{Build, BuildSource, BuildStatus, BuildStep};
