use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::external::BackendError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),
    /// Non-success answer from the analysis backend, passed through as-is.
    #[error("Upstream error {status}: {body}")]
    Upstream { status: StatusCode, body: String },
    #[error("Configuration error: {0}")]
    NotConfigured(String),
    #[error("External error: {0}")]
    External(String),
}

impl From<BackendError> for AppError {
    fn from(value: BackendError) -> Self {
        match value {
            BackendError::Status { status, body } => AppError::Upstream { status, body },
            BackendError::NotConfigured => {
                AppError::NotConfigured("No BACKEND_URL set in environment.".to_string())
            }
            other => AppError::External(other.to_string()),
        }
    }
}

/// Error as reported by `POST /api/upload`: always `{ "message": ... }`.
#[derive(Debug)]
pub struct UploadError(pub AppError);

impl From<AppError> for UploadError {
    fn from(value: AppError) -> Self {
        UploadError(value)
    }
}

impl From<BackendError> for UploadError {
    fn from(value: BackendError) -> Self {
        UploadError(value.into())
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match self.0 {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": msg }))).into_response()
            }
            AppError::Upstream { status, body } => (
                status,
                Json(json!({ "message": format!("Failed to upload: {}", body) })),
            )
                .into_response(),
            AppError::NotConfigured(_) | AppError::External(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Something went wrong" })),
            )
                .into_response(),
        }
    }
}

/// Error as reported by `POST /api/generate-visualization`: `{ "error": ... }`.
#[derive(Debug)]
pub struct GenerateError(pub AppError);

impl From<AppError> for GenerateError {
    fn from(value: AppError) -> Self {
        GenerateError(value)
    }
}

impl From<BackendError> for GenerateError {
    fn from(value: BackendError) -> Self {
        GenerateError(value.into())
    }
}

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        match self.0 {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            AppError::Upstream { status, body } => {
                (status, Json(json!({ "error": body }))).into_response()
            }
            AppError::NotConfigured(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": msg }))).into_response()
            }
            AppError::External(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error", "details": details })),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_errors_map_to_taxonomy() {
        let upstream: AppError = BackendError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "service unavailable".into(),
        }
        .into();
        assert!(matches!(
            upstream,
            AppError::Upstream { status, .. } if status == StatusCode::SERVICE_UNAVAILABLE
        ));

        let missing: AppError = BackendError::NotConfigured.into();
        assert!(matches!(missing, AppError::NotConfigured(_)));

        let network: AppError = BackendError::Network("connection refused".into()).into();
        assert!(matches!(network, AppError::External(ref m) if m.contains("connection refused")));
    }

    #[test]
    fn test_status_codes_per_envelope() {
        let resp = UploadError(AppError::Validation("No file found in the request".into()))
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = UploadError(AppError::NotConfigured("x".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = GenerateError(AppError::Upstream {
            status: StatusCode::NOT_FOUND,
            body: "Document not found.".into(),
        })
        .into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = GenerateError(AppError::External("boom".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
