//! Shared harness: an in-process mock analysis backend and the real app,
//! both served over HTTP on ephemeral ports.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use doc_visualizer::app::create_app;
use doc_visualizer::config::AppConfig;
use doc_visualizer::state::AppState;

#[derive(Clone, Default)]
pub struct BackendCalls {
    pub uploads: Arc<AtomicUsize>,
    pub visualizations: Arc<AtomicUsize>,
}

impl BackendCalls {
    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn visualizations(&self) -> usize {
        self.visualizations.load(Ordering::SeqCst)
    }
}

pub fn chart_section(id: &str, name: &str) -> Value {
    json!({
        "section_id": id,
        "name": name,
        "summary": format!("{} summary", name),
        "main_module": {
            "module_id": format!("{}-main", id),
            "chart": {
                "chart_type": "line_chart",
                "title": "Revenue trend",
                "x_labels": ["2021", "2022", "2023"],
                "y_values": [81.5, 90.2, 97.7],
                "y_label": "USD bn"
            }
        },
        "side_module_1": {
            "module_id": format!("{}-side-1", id),
            "chart": {
                "chart_type": "pie_chart",
                "title": "Revenue by region",
                "labels": ["Americas", "EMEA", "APAC"],
                "values": [55.0, 30.0, 15.0]
            }
        },
        "side_module_2": {
            "module_id": format!("{}-side-2", id),
            "chart": {
                "chart_type": "single_stat",
                "title": "Free cash flow",
                "commentary": "Cash generation improved",
                "value": 12.3,
                "value_label": "USD bn"
            }
        }
    })
}

pub fn visual_response() -> Value {
    json!({
        "response_id": "r1",
        "company_name": "Acme Corp",
        "overview": chart_section("overview", "Company Overview"),
        "operational_performance": chart_section("operations", "Operational Performance"),
        "risk_factors": chart_section("risk", "Key Risk Factors"),
        "market_position": chart_section("market", "Market Position"),
    })
}

async fn upload_doc(State(calls): State<BackendCalls>, mut multipart: Multipart) -> Response {
    calls.uploads.fetch_add(1, Ordering::SeqCst);

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        if field.content_type() != Some("application/pdf") {
            return (StatusCode::BAD_REQUEST, "Only PDF files are supported.").into_response();
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let doc_id = file_name.split('.').next().unwrap_or_default().to_string();
        return Json(json!({ "message": "File uploaded successfully", "doc_id": doc_id }))
            .into_response();
    }

    (StatusCode::UNPROCESSABLE_ENTITY, "file field required").into_response()
}

/// `abc123` succeeds, `slow` succeeds after a delay, `down` answers 503,
/// anything else is 404.
async fn generate_visualization(
    State(calls): State<BackendCalls>,
    Json(body): Json<Value>,
) -> Response {
    calls.visualizations.fetch_add(1, Ordering::SeqCst);

    match body["doc_id"].as_str() {
        Some("abc123") => Json(visual_response()).into_response(),
        Some("slow") => {
            tokio::time::sleep(Duration::from_millis(400)).await;
            Json(visual_response()).into_response()
        }
        Some("down") => (StatusCode::SERVICE_UNAVAILABLE, "service unavailable").into_response(),
        _ => (StatusCode::NOT_FOUND, "Document not found.").into_response(),
    }
}

pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub async fn spawn_backend() -> (String, BackendCalls) {
    let calls = BackendCalls::default();
    let router = Router::new()
        .route("/upload-doc", post(upload_doc))
        .route("/generate-visualization", post(generate_visualization))
        .with_state(calls.clone());
    (serve(router).await, calls)
}

pub async fn spawn_app(backend_url: Option<&str>) -> String {
    let config = AppConfig {
        backend_api_url: backend_url.map(str::to_string),
        ..AppConfig::default()
    };
    let state = AppState::with_http_backend(config.backend_url().unwrap());
    serve(create_app(state, &config)).await
}

/// Address nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
