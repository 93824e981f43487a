use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{error, info, warn};

use crate::external::{AnalysisBackend, BackendError};
use crate::models::{SectionKey, VisualResponse};
use crate::render::LayoutMode;

/// Where the client gets a document's visualization from.
#[async_trait]
pub trait VisualizationSource: Send + Sync {
    async fn fetch_visualization(&self, doc_id: &str) -> Result<VisualResponse, BackendError>;
}

/// Reads visualizations straight from the analysis backend.
pub struct BackendVisualizationSource {
    backend: Arc<dyn AnalysisBackend>,
}

impl BackendVisualizationSource {
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl VisualizationSource for BackendVisualizationSource {
    async fn fetch_visualization(&self, doc_id: &str) -> Result<VisualResponse, BackendError> {
        let body = self.backend.generate_visualization(doc_id).await?;
        serde_json::from_value(body).map_err(|e| BackendError::Parse(e.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct CachedVisualization {
    pub response: Arc<VisualResponse>,
    pub fetched_at: DateTime<Utc>,
}

/// Per-document lifecycle: `Idle -> Loading -> Ready | Failed`.
#[derive(Debug, Clone)]
pub enum LoadState {
    Idle,
    Loading,
    Ready(CachedVisualization),
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn response(&self) -> Option<&Arc<VisualResponse>> {
        match self {
            LoadState::Ready(cached) => Some(&cached.response),
            _ => None,
        }
    }
}

/// Session-scoped visualization cache with in-flight de-duplication.
///
/// At most one request per document id is outstanding at any time. A
/// successful response is kept until an explicit [`retry`](Self::retry);
/// a failed one leaves only the error message behind.
#[derive(Clone)]
pub struct VisualizationClient {
    source: Arc<dyn VisualizationSource>,
    entries: Arc<DashMap<String, LoadState>>,
}

impl VisualizationClient {
    pub fn new(source: Arc<dyn VisualizationSource>) -> Self {
        Self {
            source,
            entries: Arc::new(DashMap::new()),
        }
    }

    pub fn state(&self, doc_id: &str) -> LoadState {
        self.entries
            .get(doc_id)
            .map(|entry| entry.value().clone())
            .unwrap_or(LoadState::Idle)
    }

    /// Fetches on first use; afterwards returns whatever is stored without I/O.
    pub async fn load(&self, doc_id: &str) -> LoadState {
        if let Some(existing) = self.begin(doc_id, false) {
            return existing;
        }
        self.fetch(doc_id).await
    }

    /// User-triggered refetch. Ignored while a request is already in flight.
    pub async fn retry(&self, doc_id: &str) -> LoadState {
        if let Some(existing) = self.begin(doc_id, true) {
            info!("Retry for {} ignored, request already in flight", doc_id);
            return existing;
        }
        info!("Retrying visualization for {}", doc_id);
        self.fetch(doc_id).await
    }

    /// Starts a fetch on first use without waiting for it. Returns the state to
    /// show right now, which is `Loading` when this call issued the request.
    pub fn load_in_background(&self, doc_id: &str) -> LoadState {
        self.start(doc_id, false)
    }

    /// Non-blocking counterpart of [`retry`](Self::retry).
    pub fn retry_in_background(&self, doc_id: &str) -> LoadState {
        self.start(doc_id, true)
    }

    /// Drops every settled entry. Called when the session ends.
    ///
    /// `Loading` markers stay until their request settles, so a load issued
    /// right after `clear` joins the outstanding request instead of sending
    /// a second one.
    pub fn clear(&self) {
        self.entries.retain(|_, state| state.is_loading());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Atomically marks `doc_id` as loading, unless it should be left alone.
    /// Returns the state to report when no fetch must be issued.
    fn begin(&self, doc_id: &str, force: bool) -> Option<LoadState> {
        match self.entries.entry(doc_id.to_string()) {
            Entry::Occupied(mut entry) => {
                if entry.get().is_loading() || !force {
                    return Some(entry.get().clone());
                }
                entry.insert(LoadState::Loading);
                None
            }
            Entry::Vacant(entry) => {
                entry.insert(LoadState::Loading);
                None
            }
        }
    }

    fn start(&self, doc_id: &str, force: bool) -> LoadState {
        if let Some(existing) = self.begin(doc_id, force) {
            return existing;
        }
        let client = self.clone();
        let id = doc_id.to_string();
        tokio::spawn(async move {
            client.fetch(&id).await;
        });
        LoadState::Loading
    }

    async fn fetch(&self, doc_id: &str) -> LoadState {
        let source = Arc::clone(&self.source);
        let entries = Arc::clone(&self.entries);
        let id = doc_id.to_string();

        // Spawned so the entry always settles, even if the caller goes away
        let task = tokio::spawn(async move {
            let state = match source.fetch_visualization(&id).await {
                Ok(response) => {
                    info!("Visualization for {} ready ({})", id, response.company_name);
                    LoadState::Ready(CachedVisualization {
                        response: Arc::new(response),
                        fetched_at: Utc::now(),
                    })
                }
                Err(e) => {
                    error!("Failed to fetch visualization for {}: {}", id, e);
                    LoadState::Failed(failure_message(&id, &e))
                }
            };
            entries.insert(id, state.clone());
            state
        });

        match task.await {
            Ok(state) => state,
            Err(e) => {
                warn!("Visualization task for {} did not complete: {}", doc_id, e);
                let state = LoadState::Failed(format!(
                    "Failed to fetch visualization for docId={}",
                    doc_id
                ));
                self.entries.insert(doc_id.to_string(), state.clone());
                state
            }
        }
    }
}

fn failure_message(doc_id: &str, error: &BackendError) -> String {
    match error {
        BackendError::Status { .. } => format!("Failed to fetch visualization for docId={}", doc_id),
        other => other.to_string(),
    }
}

/// Local view state for one document page. Never touches the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentView {
    pub doc_id: String,
    pub selected: SectionKey,
    pub layout: LayoutMode,
}

impl DocumentView {
    pub fn new(doc_id: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            selected: SectionKey::default(),
            layout: LayoutMode::default(),
        }
    }

    pub fn select(&mut self, section: SectionKey) {
        self.selected = section;
    }

    pub fn toggle_layout(&mut self) {
        self.layout = self.layout.toggled();
    }
}
