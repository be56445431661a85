use people_lookup::config::Config;
use people_lookup::handlers::{self, AppState};
use people_lookup::people_client::PeopleApiClient;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes tracing, loads configuration, builds the backend client,
/// starts the initial analytics/connection load in the background and
/// serves the lookup UI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "people_lookup=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let client = PeopleApiClient::from_config(&config)?;
    tracing::info!("✓ People API client initialized: {}", client.base_url());

    let state = Arc::new(AppState::new(config.clone(), client));

    // The backend may be slow or down; serve the page while the first load runs.
    let mount_state = state.clone();
    tokio::spawn(async move {
        handlers::mount(&mount_state).await;
        tracing::info!("Initial analytics and connection check complete");
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
