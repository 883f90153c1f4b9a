use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use tracing::{debug, info};

use crate::build::resolver::{is_valid_commit_sha, is_valid_repo_segment};
use crate::error::RelayError;
use crate::github::types::StatusRequest;

#[derive(Clone)]
pub struct GitHubClient {
    client: Octocrab,
}

impl GitHubClient {
    /// Build a client for the GitHub REST API.
    ///
    /// A missing token is not an error here; GitHub rejects the request.
    /// `api_url` overrides `https://api.github.com`.
    pub fn new(token: Option<&str>, api_url: Option<&str>) -> Result<Self, RelayError> {
        let mut builder = Octocrab::builder();

        if let Some(api_url) = api_url {
            builder = builder.base_uri(api_url).map_err(|e| {
                RelayError::ConfigError(format!("Invalid GitHub API URL {}: {}", api_url, e))
            })?;
        }
        if let Some(token) = token {
            builder = builder.personal_token(token.to_string());
        }
        builder.add_retry_config(RetryConfig::None);

        let client = builder
            .build()
            .map_err(|e| RelayError::GitHubError(format!("Failed to create GitHub client: {}", e)))?;

        Ok(Self { client })
    }

    pub async fn create_commit_status(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        status: &StatusRequest,
    ) -> Result<(), RelayError> {
        if !is_valid_repo_segment(owner)
            || !is_valid_repo_segment(repo)
            || !is_valid_commit_sha(sha)
        {
            return Err(RelayError::GitHubError(format!(
                "Refusing status route for {:?}/{:?}@{:?}",
                owner, repo, sha
            )));
        }

        let route = format!("/repos/{}/{}/statuses/{}", owner, repo, sha);
        debug!("POST {} state={}", route, status.state);

        let _created: serde_json::Value = self.client.post(route, Some(status)).await?;

        info!(
            "Set {} status on {}/{}@{}: {}",
            status.context, owner, repo, sha, status.state
        );
        Ok(())
    }
}
