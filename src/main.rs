use creditlens_console::api_client::ScoringApiClient;
use creditlens_console::config::Config;
use creditlens_console::handlers::AppState;
use creditlens_console::routes::build_router;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the underwriter console.
///
/// Initializes tracing, loads configuration, builds the scoring API client
/// and serves the dashboard pages.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "creditlens_console=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    let api = ScoringApiClient::new(config.api_base_url.clone())?;
    tracing::info!("✓ Scoring API client initialized: {}", api.base_url());

    // The console still serves pages when the API is down, so only log it
    match api.health().await {
        Some(status) => tracing::info!("Scoring API health: {}", status.status),
        None => tracing::warn!("Scoring API is unreachable; pages will show offline states"),
    }

    let app_state = Arc::new(AppState {
        config: config.clone(),
        api,
    });
    let app = build_router(app_state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
