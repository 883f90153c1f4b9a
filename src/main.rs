use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gcb_status_relay::config::AppConfig;
use gcb_status_relay::github::GitHubClient;
use gcb_status_relay::relay::{PublisherSettings, StatusPublisher};
use gcb_status_relay::webhooks;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gcb_status_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cloud Build status relay");

    let config = AppConfig::load()?;
    if config.github_token.is_none() {
        warn!("GITHUB_TOKEN not set, GitHub will reject status updates");
    }
    info!(
        "Configuration loaded (context={}, step layout {}/{})",
        config.status_context,
        config.step_layout.clone_step_index,
        config.step_layout.checkout_step_index
    );

    let github = GitHubClient::new(
        config.github_token.as_deref(),
        config.github_api_url.as_deref(),
    )?;
    let publisher = Arc::new(StatusPublisher::new(
        github,
        PublisherSettings::from(&config),
    ));

    let app = webhooks::router(publisher);

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
