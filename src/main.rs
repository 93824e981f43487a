use anyhow::Context;
use tokio::net::TcpListener;

use doc_visualizer::app;
use doc_visualizer::config::AppConfig;
use doc_visualizer::logging::{self, LoggingConfig};
use doc_visualizer::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    logging::init_logging(LoggingConfig::from_env()?).context("failed to initialize logging")?;

    let config = AppConfig::from_env();
    config.validate().map_err(anyhow::Error::msg)?;

    let backend_url = config.backend_url().map_err(anyhow::Error::msg)?;
    match &backend_url {
        Some(url) => tracing::info!("🔗 Forwarding to analysis backend at {}", url),
        None => tracing::warn!("BACKEND_API_URL is not set; proxy routes will answer 500"),
    }

    let state = AppState::with_http_backend(backend_url);
    let app = app::create_app(state, &config);

    let addr = config.bind_addr().map_err(anyhow::Error::msg)?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("🚀 doc-visualizer running at http://{}/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
