use thiserror::Error;

/// Failure to turn a Pub/Sub message into a build record.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Pub/Sub message carries no data")]
    MissingData,

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid build JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a build cannot be tied to a repository and commit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Build source has no repoSource.repoName")]
    MissingRepoName,

    #[error("Cannot parse repoName: {0}")]
    MalformedRepoName(String),

    #[error("Build has no sourceProvenance.resolvedRepoSource.commitSha")]
    MissingCommitSha,

    #[error("Build has no step at index {0}")]
    MissingStep(usize),

    #[error("Step {step} has no argument at index {arg}")]
    MissingArgument { step: usize, arg: usize },

    #[error("Step {step} does not match the expected layout: expected {expected:?}, found {found:?}")]
    LayoutMismatch {
        step: usize,
        expected: String,
        found: String,
    },

    #[error("Resolved {field} is empty")]
    EmptySegment { field: &'static str },

    #[error("Resolved {field} {value:?} is not a valid path segment")]
    InvalidSegment { field: &'static str, value: String },

    #[error("Cannot parse clone URL: {0}")]
    UnrecognizedCloneUrl(String),
}

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Event decoding error: {0}")]
    DecodeError(#[from] DecodeError),

    #[error("No commit status mapping for build status {0}")]
    UnmappedStatus(String),

    #[error("GitHub API error: {0}")]
    GitHubError(String),
}

impl From<octocrab::Error> for RelayError {
    fn from(err: octocrab::Error) -> Self {
        Self::GitHubError(err.to_string())
    }
}
