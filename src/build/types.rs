use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cloud Build lifecycle status as published on the `cloud-builds` topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuildStatus {
    Queued,
    Working,
    Success,
    Failure,
    InternalError,
    Cancelled,
    Timeout,
    /// Any value the relay has no mapping for, kept verbatim.
    Other(String),
}

impl BuildStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BuildStatus::Queued => "QUEUED",
            BuildStatus::Working => "WORKING",
            BuildStatus::Success => "SUCCESS",
            BuildStatus::Failure => "FAILURE",
            BuildStatus::InternalError => "INTERNAL_ERROR",
            BuildStatus::Cancelled => "CANCELLED",
            BuildStatus::Timeout => "TIMEOUT",
            BuildStatus::Other(value) => value,
        }
    }
}

impl From<String> for BuildStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "QUEUED" => BuildStatus::Queued,
            "WORKING" => BuildStatus::Working,
            "SUCCESS" => BuildStatus::Success,
            "FAILURE" => BuildStatus::Failure,
            "INTERNAL_ERROR" => BuildStatus::InternalError,
            "CANCELLED" => BuildStatus::Cancelled,
            "TIMEOUT" => BuildStatus::Timeout,
            _ => BuildStatus::Other(value),
        }
    }
}

impl From<BuildStatus> for String {
    fn from(status: BuildStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build resource carried in a `cloud-builds` notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub status: BuildStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_provenance: Option<SourceProvenance>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<BuildStep>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_source: Option<RepoSource>,
}

/// Cloud Source Repositories reference.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceProvenance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_repo_source: Option<RepoSource>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,
}

/// Where a build's repository identity comes from.
///
/// Selected only by whether `source` is present; a structured source that
/// fails to parse never falls back to the step list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuildSource<'a> {
    /// Triggered from a mirrored repository; the name encodes site, owner and repo.
    Structured { repo_name: Option<&'a str> },
    /// Manually submitted build whose clone and checkout steps carry the repository.
    Positional { steps: &'a [BuildStep] },
}

impl Build {
    pub fn build_source(&self) -> BuildSource<'_> {
        match &self.source {
            Some(source) => BuildSource::Structured {
                repo_name: source
                    .repo_source
                    .as_ref()
                    .and_then(|r| r.repo_name.as_deref()),
            },
            None => BuildSource::Positional { steps: &self.steps },
        }
    }

    /// Commit recorded by Cloud Build after resolving the source.
    pub fn resolved_commit_sha(&self) -> Option<&str> {
        self.source_provenance
            .as_ref()
            .and_then(|p| p.resolved_repo_source.as_ref())
            .and_then(|r| r.commit_sha.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_statuses_parse() {
        let status: BuildStatus = serde_json::from_value(json!("INTERNAL_ERROR")).unwrap();
        assert_eq!(status, BuildStatus::InternalError);
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("INTERNAL_ERROR"));
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let status: BuildStatus = serde_json::from_value(json!("EXPIRED")).unwrap();
        assert_eq!(status, BuildStatus::Other("EXPIRED".to_string()));
        assert_eq!(status.to_string(), "EXPIRED");
    }

    #[test]
    fn test_build_source_structured() {
        let build: Build = serde_json::from_value(json!({
            "status": "QUEUED",
            "source": { "repoSource": { "repoName": "github_acme_widgets" } }
        }))
        .unwrap();

        assert_eq!(
            build.build_source(),
            BuildSource::Structured { repo_name: Some("github_acme_widgets") }
        );
    }

    #[test]
    fn test_build_source_structured_without_repo_source() {
        let build: Build = serde_json::from_value(json!({
            "status": "QUEUED",
            "source": { "storageSource": { "bucket": "b", "object": "o" } }
        }))
        .unwrap();

        assert_eq!(build.build_source(), BuildSource::Structured { repo_name: None });
    }

    #[test]
    fn test_build_source_positional() {
        let build: Build = serde_json::from_value(json!({
            "status": "WORKING",
            "steps": [{ "name": "gcr.io/cloud-builders/git", "args": ["clone", "x"] }]
        }))
        .unwrap();

        match build.build_source() {
            BuildSource::Positional { steps } => {
                assert_eq!(steps.len(), 1);
                assert_eq!(steps[0].args, vec!["clone", "x"]);
            }
            other => panic!("unexpected source: {:?}", other),
        }
    }

    #[test]
    fn test_build_source_null_is_positional() {
        let build: Build = serde_json::from_value(json!({
            "status": "QUEUED",
            "source": null,
            "steps": [{ "args": ["checkout", "abcdef0"] }]
        }))
        .unwrap();

        assert!(build.source.is_none());
        assert!(matches!(build.build_source(), BuildSource::Positional { steps } if steps.len() == 1));
    }

    #[test]
    fn test_resolved_commit_sha() {
        let build: Build = serde_json::from_value(json!({
            "status": "SUCCESS",
            "sourceProvenance": { "resolvedRepoSource": { "commitSha": "deadbeef" } }
        }))
        .unwrap();

        assert_eq!(build.resolved_commit_sha(), Some("deadbeef"));
    }
}
