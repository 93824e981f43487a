use std::sync::Arc;

use crate::external::{AnalysisBackend, HttpAnalysisBackend};
use crate::render::ChartRenderer;
use crate::services::visualization_client::{BackendVisualizationSource, VisualizationClient};

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn AnalysisBackend>,
    /// Visualization cache shared by the server-rendered pages; lives as long as the server.
    pub visualizations: VisualizationClient,
    pub renderer: ChartRenderer,
}

impl AppState {
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        let source = Arc::new(BackendVisualizationSource::new(Arc::clone(&backend)));
        Self {
            backend,
            visualizations: VisualizationClient::new(source),
            renderer: ChartRenderer::default(),
        }
    }

    pub fn with_http_backend(base_url: Option<url::Url>) -> Self {
        Self::new(Arc::new(HttpAnalysisBackend::new(base_url)))
    }
}
