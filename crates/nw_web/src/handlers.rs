use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use serde_json::json;
use tracing::error;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use nw_core::{dedup_by_content, NewsPayload};
use crate::AppState;

/// `GET /noticias`: every stored item, newest first, with repeated
/// (titulo, resumo) pairs collapsed.
pub async fn list_news(State(state): State<Arc<AppState>>) -> Response {
    match state.storage.load_all().await {
        Ok(items) => {
            let payload: Vec<NewsPayload> = dedup_by_content(items).into_iter().map(NewsPayload::from).collect();
            Json(payload).into_response()
        }
        Err(e) => {
            error!(kind = "storage", error = %e, "failed to load items");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "news unavailable" })),
            )
                .into_response()
        }
    }
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.monitor.report().await)
}

pub async fn index(State(state): State<Arc<AppState>>, request: axum::extract::Request) -> Response {
    let path = state.static_dir.join("index.html");
    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}
