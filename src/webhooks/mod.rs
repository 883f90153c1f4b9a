pub mod pubsub;

use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::relay::StatusPublisher;

/// HTTP surface: Pub/Sub push delivery plus a health check.
pub fn router(publisher: Arc<StatusPublisher>) -> Router {
    Router::new()
        .route("/", post(pubsub::handle_push))
        .route("/pubsub", post(pubsub::handle_push))
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .into_inner(),
        )
        .with_state(publisher)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "gcb-status-relay",
        "timestamp": chrono::Utc::now()
    }))
}
