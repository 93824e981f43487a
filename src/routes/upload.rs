use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::errors::{AppError, UploadError};
use crate::external::UploadedFile;
use crate::state::AppState;

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(upload_document))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

pub async fn upload_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, UploadError> {
    info!("POST /api/upload - Forwarding document upload");

    let mut multipart = multipart.map_err(|e| {
        error!("Upload body is not multipart form data: {}", e);
        AppError::External(e.body_text())
    })?;

    let file = read_file_field(&mut multipart).await.map_err(|e| {
        error!("Failed to read multipart upload: {}", e);
        AppError::External(e.body_text())
    })?;

    let Some(file) = file else {
        warn!("POST /api/upload - No file field in request");
        return Err(AppError::Validation("No file found in the request".to_string()).into());
    };

    info!("Uploading {} ({} bytes) to analysis backend", file.file_name, file.bytes.len());
    let body = state.backend.upload_document(file).await.map_err(|e| {
        error!("Backend upload failed: {}", e);
        e
    })?;

    Ok(Json(body))
}

/// Pulls the first field named `file` out of the form, skipping anything else.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<UploadedFile>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("document.pdf").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;

        return Ok(Some(UploadedFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}
