use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use film_search_api::{
    api::{create_router, AppState},
    config::Config,
    db::{seed, Store},
    services::{QueryBuilder, VespaClient},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "film_search_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Open the store and seed demo data on first run
    let store = Store::connect(&config.database_url).await?;
    if seed::seed_if_empty(&store).await? {
        tracing::info!("Demo data seeded");
    }
    tracing::info!(database_url = %config.database_url, "Database connection established");

    let query_builder = QueryBuilder::new(&config.vespa_url)?;
    let search_engine = Arc::new(VespaClient::new(config.search_timeout())?);

    let state = AppState::new(store.clone(), query_builder, search_engine);
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        address = %config.bind_address(),
        vespa_url = %config.vespa_url,
        "Server running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
