use crate::build::types::BuildStatus;
use crate::error::RelayError;
use crate::github::types::{CommitState, CommitStatus};

/// Map a Cloud Build status to the commit status shown on GitHub.
///
/// Statuses without an entry are an error, never a default.
pub fn map_status(status: &BuildStatus) -> Result<CommitStatus, RelayError> {
    let (state, description) = match status {
        BuildStatus::Queued => (CommitState::Pending, "Build is queued"),
        BuildStatus::Working => (CommitState::Pending, "Build is being executed"),
        BuildStatus::Success => (CommitState::Success, "Build finished successfully"),
        BuildStatus::Failure => (CommitState::Error, "Build failed"),
        BuildStatus::InternalError => (CommitState::Failure, "Internal builder error"),
        BuildStatus::Cancelled => (CommitState::Failure, "Build cancelled by user"),
        BuildStatus::Timeout => (CommitState::Failure, "Build timed out"),
        BuildStatus::Other(value) => return Err(RelayError::UnmappedStatus(value.clone())),
    };

    Ok(CommitStatus { state, description })
}
