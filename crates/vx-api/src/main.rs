//! VoxCommand API server.
//!
//! Serves `/process_command` over HTTP. The NLU model loads in the
//! background after the listener is up and is released on shutdown.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use vx_api::config::ApiConfig;
use vx_api::routes;
use vx_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "vx-api starting");

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("VX_CONFIG").ok());
    let config = ApiConfig::load(config_path.as_deref())?;
    tracing::info!(
        backend = %config.nlu.backend,
        model_path = %config.nlu.model_path.display(),
        threshold = %config.nlu.confidence_threshold,
        "configuration loaded"
    );

    let state = AppState::from_config(&config.nlu);
    let app = routes::build_router(state.clone());

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    let loader = state.spawn_model_load(config.nlu.model_path.clone());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    loader.abort();
    state.shutdown().await;
    tracing::info!("vx-api stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
