// SPDX-License-Identifier: MIT

//! Strava-Insights API server.
//!
//! Proxies the Strava API for a single configured athlete, caches the
//! activity dataset locally and serves analytics derived from it.

use std::sync::Arc;
use strava_insights::{
    config::Config,
    services::{StravaClient, TokenManager},
    store::DatasetStore,
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Strava-Insights API");

    let strava = StravaClient::new(
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
        config.strava_refresh_token.clone(),
    );

    // Credential store starts empty; the first remote-dependent request
    // triggers the refresh exchange.
    let token = TokenManager::new();

    let store = DatasetStore::new(&config.data_file, &config.export_file);
    tracing::info!(path = %config.data_file.display(), "Dataset store initialized");

    let state = Arc::new(AppState {
        config: config.clone(),
        strava,
        token,
        store,
    });

    // Build router
    let app = strava_insights::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("strava_insights=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
