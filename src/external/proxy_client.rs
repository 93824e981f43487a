use async_trait::async_trait;
use serde_json::json;
use url::Url;

use crate::external::analysis_backend::BackendError;
use crate::models::VisualResponse;
use crate::services::visualization_client::VisualizationSource;

/// Fetches visualizations the way the browser does: through this service's
/// own `POST /api/generate-visualization` proxy route.
pub struct HttpVisualizationSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpVisualizationSource {
    /// `proxy_base` is the root of a running doc-visualizer, e.g. `http://localhost:3000`.
    pub fn new(proxy_base: &Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!(
                "{}/api/generate-visualization",
                proxy_base.as_str().trim_end_matches('/')
            ),
        }
    }
}

#[async_trait]
impl VisualizationSource for HttpVisualizationSource {
    async fn fetch_visualization(&self, doc_id: &str) -> Result<VisualResponse, BackendError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "doc_id": doc_id }))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }

        resp.json::<VisualResponse>()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }
}
