//! Cloud Build to GitHub status publisher
//!
//! Turns one build notification into at most one GitHub commit status.
//! Builds that cannot be tied to a GitHub repository are skipped, not failed.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::build::event::{decode_message, PubsubMessage};
use crate::build::resolver::{resolve, ResolvedRepo, StepLayout};
use crate::build::types::Build;
use crate::config::{AppConfig, DEFAULT_STATUS_CONTEXT};
use crate::error::{RelayError, ResolutionError};
use crate::github::client::GitHubClient;
use crate::github::status::map_status;
use crate::github::types::{CommitState, StatusRequest};

/// Hosting site that statuses are published to.
pub const SUPPORTED_SITE: &str = "github";

#[derive(Debug, Clone)]
pub struct PublisherSettings {
    pub supported_site: String,
    pub context: String,
    pub step_layout: StepLayout,
}

impl Default for PublisherSettings {
    fn default() -> Self {
        Self {
            supported_site: SUPPORTED_SITE.to_string(),
            context: DEFAULT_STATUS_CONTEXT.to_string(),
            step_layout: StepLayout::V1,
        }
    }
}

impl From<&AppConfig> for PublisherSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            context: config.status_context.clone(),
            step_layout: config.step_layout,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishedStatus {
    pub owner: String,
    pub repo: String,
    pub sha: String,
    pub state: CommitState,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Unresolved(ResolutionError),
    UnsupportedHost(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Unresolved(err) => write!(f, "repository not resolved: {}", err),
            SkipReason::UnsupportedHost(site) => write!(f, "unsupported host: {}", site),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    Published(PublishedStatus),
    Skipped(SkipReason),
}

pub struct StatusPublisher {
    github: GitHubClient,
    settings: PublisherSettings,
}

impl StatusPublisher {
    pub fn new(github: GitHubClient, settings: PublisherSettings) -> Self {
        Self { github, settings }
    }

    /// Decode a Pub/Sub message and publish the status of the build it carries.
    pub async fn handle_message(&self, message: &PubsubMessage) -> Result<PublishOutcome, RelayError> {
        let build = decode_message(message)?;
        debug!(
            "Decoded build {} (attribute buildId={:?}, status={:?})",
            build.id.as_deref().unwrap_or("unknown"),
            message.attribute("buildId"),
            message.attribute("status"),
        );
        self.publish(&build).await
    }

    /// Publish one commit status for `build`, or skip it.
    pub async fn publish(&self, build: &Build) -> Result<PublishOutcome, RelayError> {
        let build_id = build.id.as_deref().unwrap_or("unknown");

        let repo = match resolve(build, &self.settings.step_layout) {
            Ok(repo) => repo,
            Err(e) => {
                warn!("Skipping build {}: {}", build_id, e);
                return Ok(PublishOutcome::Skipped(SkipReason::Unresolved(e)));
            }
        };

        if repo.site != self.settings.supported_site {
            debug!("Skipping build {} on unsupported host {}", build_id, repo.site);
            return Ok(PublishOutcome::Skipped(SkipReason::UnsupportedHost(repo.site)));
        }

        let status = map_status(&build.status)?;
        let request = StatusRequest {
            state: status.state,
            description: status.description.to_string(),
            context: self.settings.context.clone(),
            target_url: build.log_url.clone(),
        };

        let ResolvedRepo { user, name, commit_sha, .. } = repo;
        self.github
            .create_commit_status(&user, &name, &commit_sha, &request)
            .await?;

        info!(
            "Published {} for build {} ({}) to {}/{}",
            request.state, build_id, build.status, user, name
        );

        Ok(PublishOutcome::Published(PublishedStatus {
            owner: user,
            repo: name,
            sha: commit_sha,
            state: request.state,
            description: request.description,
        }))
    }
}
