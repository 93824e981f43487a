use axum::extract::{Path, Query, State};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use tracing::info;

use crate::models::SectionKey;
use crate::render::{html, LayoutMode};
use crate::services::visualization_client::{DocumentView, LoadState};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/upload", get(upload_page))
        .route("/visualize/:doc_id", get(visualize_page))
        .route("/visualize/:doc_id/retry", post(retry_visualization))
}

/// Section and layout picked in the sidebar. Unknown values fall back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ViewParams {
    pub section: Option<String>,
    pub layout: Option<String>,
}

impl ViewParams {
    fn into_view(self, doc_id: &str) -> DocumentView {
        let mut view = DocumentView::new(doc_id);
        if let Some(section) = self.section.as_deref().and_then(SectionKey::from_id) {
            view.select(section);
        }
        if let Some(layout) = self.layout.as_deref().and_then(LayoutMode::from_id) {
            view.layout = layout;
        }
        view
    }
}

async fn root() -> Redirect {
    Redirect::temporary("/upload")
}

async fn upload_page() -> Html<String> {
    info!("GET /upload - Upload page");
    Html(html::upload_page())
}

pub async fn visualize_page(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
    Query(params): Query<ViewParams>,
) -> Html<String> {
    info!("GET /visualize/{} - Rendering visualization page", doc_id);
    let view = params.into_view(&doc_id);

    // The first visit starts the fetch and gets the self-refreshing loading
    // page. Later visits and section switches read the cache.
    let page = match state.visualizations.load_in_background(&doc_id) {
        LoadState::Ready(cached) => html::visualization_page(&view, &cached.response, &state.renderer),
        LoadState::Failed(message) => html::error_page(&view, &message),
        LoadState::Idle | LoadState::Loading => html::loading_page(&view),
    };
    Html(page)
}

pub async fn retry_visualization(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
    Form(params): Form<ViewParams>,
) -> Redirect {
    info!("POST /visualize/{}/retry - Retrying visualization", doc_id);
    let view = params.into_view(&doc_id);
    state.visualizations.retry_in_background(&doc_id);

    Redirect::to(&format!(
        "{}?section={}&layout={}",
        html::page_path(&doc_id, None),
        view.selected.id(),
        view.layout.id()
    ))
}
