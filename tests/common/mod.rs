#![allow(dead_code)]

use gcb_status_relay::build::{encode_build, Build, PubsubMessage};
use gcb_status_relay::github::GitHubClient;
use gcb_status_relay::relay::{PublisherSettings, StatusPublisher};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "ghp_test_token";
pub const LOG_URL: &str = "https://console.cloud.google.com/cloud-build/builds/b-123?project=acme-ci";

/// Publisher pointed at a mock GitHub API
pub fn create_test_publisher(server: &MockServer) -> StatusPublisher {
    let github = GitHubClient::new(Some(TEST_TOKEN), Some(&server.uri()))
        .expect("Failed to create GitHub client");
    StatusPublisher::new(github, PublisherSettings::default())
}

/// Build triggered from a mirrored repository
pub fn create_structured_build(status: &str, repo_name: &str) -> Build {
    serde_json::from_value(json!({
        "id": "b-123",
        "projectId": "acme-ci",
        "status": status,
        "logUrl": LOG_URL,
        "source": {
            "repoSource": {
                "projectId": "acme-ci",
                "repoName": repo_name,
                "branchName": "main"
            }
        },
        "sourceProvenance": {
            "resolvedRepoSource": {
                "projectId": "acme-ci",
                "repoName": repo_name,
                "commitSha": "0123abcd"
            }
        },
        "createTime": "2024-03-01T10:00:00.123456Z"
    }))
    .expect("valid structured build")
}

/// Manually submitted build cloning `clone_url` in step 4 and checking out `sha` in step 5
pub fn create_positional_build(status: &str, clone_url: &str, sha: &str) -> Build {
    serde_json::from_value(json!({
        "id": "b-456",
        "status": status,
        "logUrl": LOG_URL,
        "steps": [
            { "name": "gcr.io/cloud-builders/gcloud", "args": ["kms", "decrypt"] },
            { "name": "gcr.io/cloud-builders/git", "args": ["config", "--global"] },
            { "name": "gcr.io/cloud-builders/git", "entrypoint": "bash", "args": ["-c", "ssh-keyscan github.com"] },
            { "name": "gcr.io/cloud-builders/git", "args": ["config", "core.sshCommand"] },
            { "name": "gcr.io/cloud-builders/git", "args": ["", clone_url] },
            { "name": "gcr.io/cloud-builders/git", "dir": "repo", "args": ["checkout", sha] },
            { "name": "gcr.io/cloud-builders/docker", "args": ["build", "."] }
        ]
    }))
    .expect("valid positional build")
}

pub fn create_message(build: &Build) -> PubsubMessage {
    PubsubMessage::for_build(build).expect("encodable build")
}

/// Pub/Sub push request body wrapping `build`
pub fn create_push_body(build: &Build) -> Value {
    json!({
        "message": {
            "data": encode_build(build).expect("encodable build"),
            "attributes": {
                "buildId": build.id.clone().unwrap_or_default(),
                "status": build.status.to_string()
            },
            "messageId": "1234567890",
            "publishTime": "2024-03-01T10:00:01Z"
        },
        "subscription": "projects/acme-ci/subscriptions/cloud-builds-github"
    })
}
