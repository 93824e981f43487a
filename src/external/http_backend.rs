use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use crate::external::analysis_backend::{AnalysisBackend, BackendError, UploadedFile};

/// [`AnalysisBackend`] over HTTP, rooted at `BACKEND_API_URL`.
///
/// A missing base URL is not a startup failure: every call reports
/// [`BackendError::NotConfigured`] instead, and the routes turn that into a 500.
pub struct HttpAnalysisBackend {
    client: reqwest::Client,
    base_url: Option<Url>,
}

impl HttpAnalysisBackend {
    pub fn new(base_url: Option<Url>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> Result<String, BackendError> {
        let base = self.base_url.as_ref().ok_or(BackendError::NotConfigured)?;
        Ok(format!("{}/{}", base.as_str().trim_end_matches('/'), path))
    }

    async fn read_json(resp: reqwest::Response) -> Result<Value, BackendError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .map_err(|e| BackendError::Network(e.to_string()))?;
            return Err(BackendError::Status { status, body });
        }

        resp.json::<Value>()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }
}

#[async_trait]
impl AnalysisBackend for HttpAnalysisBackend {
    async fn upload_document(&self, file: UploadedFile) -> Result<Value, BackendError> {
        let url = self.endpoint("upload-doc")?;
        debug!("Forwarding {} ({} bytes) to {}", file.file_name, file.bytes.len(), url);

        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = file.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|e| BackendError::Parse(format!("invalid content type: {}", e)))?;
        }

        let resp = self
            .client
            .post(&url)
            .multipart(Form::new().part("file", part))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Self::read_json(resp).await
    }

    async fn generate_visualization(&self, doc_id: &str) -> Result<Value, BackendError> {
        let url = self.endpoint("generate-visualization")?;
        debug!("Requesting visualization for {} from {}", doc_id, url);

        let resp = self
            .client
            .post(&url)
            .json(&json!({ "doc_id": doc_id }))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Self::read_json(resp).await
    }
}
