use async_trait::async_trait;
use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// A file received from the browser, ready to be forwarded.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend base URL is not configured")]
    NotConfigured,

    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status. `body` is its text, verbatim.
    #[error("backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("parse error: {0}")]
    Parse(String),
}

/// The external document-analysis service.
///
/// Both calls return the backend's JSON body untouched; callers that need
/// typed data parse it themselves.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// `POST {base}/upload-doc` with the file as multipart field `file`.
    async fn upload_document(&self, file: UploadedFile) -> Result<Value, BackendError>;

    /// `POST {base}/generate-visualization` with `{ "doc_id": ... }`.
    async fn generate_visualization(&self, doc_id: &str) -> Result<Value, BackendError>;
}
