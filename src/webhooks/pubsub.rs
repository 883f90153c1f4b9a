use axum::{body::Bytes, extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::build::event::PushEnvelope;
use crate::error::RelayError;
use crate::relay::{PublishOutcome, StatusPublisher};

/// Pub/Sub push endpoint for the `cloud-builds` topic.
///
/// Any non-2xx response marks the delivery as failed.
pub async fn handle_push(
    State(publisher): State<Arc<StatusPublisher>>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let envelope: PushEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("Rejecting malformed push request: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": format!("invalid push envelope: {}", e)})),
            );
        }
    };

    info!(
        "Received Pub/Sub message {} from {}",
        envelope.message.message_id.as_deref().unwrap_or("unknown"),
        envelope.subscription.as_deref().unwrap_or("unknown subscription")
    );

    match publisher.handle_message(&envelope.message).await {
        Ok(PublishOutcome::Published(status)) => (
            StatusCode::OK,
            Json(json!({"status": "published", "commit_status": status})),
        ),
        Ok(PublishOutcome::Skipped(reason)) => (
            StatusCode::OK,
            Json(json!({"status": "skipped", "reason": reason.to_string()})),
        ),
        Err(e) => {
            error!("Failed to relay build status: {}", e);
            (error_status(&e), Json(json!({"error": e.to_string()})))
        }
    }
}

fn error_status(err: &RelayError) -> StatusCode {
    match err {
        RelayError::DecodeError(_) => StatusCode::BAD_REQUEST,
        RelayError::UnmappedStatus(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RelayError::GitHubError(_) => StatusCode::BAD_GATEWAY,
        RelayError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
