use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::errors::{AppError, GenerateError};
use crate::external::BackendError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(generate_visualization))
}

pub async fn generate_visualization(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, GenerateError> {
    info!("POST /api/generate-visualization - Generating visualization");

    let Json(body) = body.map_err(|e| {
        error!("Error in /api/generate-visualization: {}", e);
        AppError::External(e.body_text())
    })?;

    let doc_id = doc_id_from(&body).ok_or_else(|| {
        warn!("POST /api/generate-visualization - Missing doc_id");
        AppError::Validation("Missing doc_id in request body.".to_string())
    })?;

    let data = state
        .backend
        .generate_visualization(doc_id)
        .await
        .map_err(|e| {
            match &e {
                BackendError::Status { status, .. } => {
                    warn!("Backend rejected visualization for {} with {}", doc_id, status)
                }
                _ => error!("Error in /api/generate-visualization for {}: {}", doc_id, e),
            }
            e
        })?;

    Ok(Json(data))
}

/// A usable `doc_id` is a non-empty string.
fn doc_id_from(body: &Value) -> Option<&str> {
    body.get("doc_id")
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
}
