use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::config::AppConfig;
use crate::routes::{health, pages, upload, visualization};
use crate::state::AppState;

pub fn create_app(state: AppState, config: &AppConfig) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/upload", upload::router(config.max_upload_bytes))
        .nest("/api/generate-visualization", visualization::router())
        .merge(pages::router())
        .layer(cors_layer(config.cors_allow_origin.as_deref()))
        .with_state(state)
}

fn cors_layer(allow_origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match allow_origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(e)) => {
            warn!("Ignoring invalid CORS_ALLOW_ORIGIN: {}", e);
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}
