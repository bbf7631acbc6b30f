use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub mod handlers;
pub mod hub;
pub mod state;
pub mod ws;

pub use hub::{BroadcastHub, PushEvent};
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/noticias", get(handlers::list_news))
        .route("/health", get(handlers::health))
        .route("/ws", get(ws::upgrade))
        .route("/index", get(handlers::index))
        .fallback_service(static_files)
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use crate::{create_app, AppState, BroadcastHub};
    pub use nw_core::{Error, NewsPayload, Result};
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use nw_core::{NewsStore, SaveOutcome};
    use nw_scrapers::HealthMonitor;
    use nw_storage::InMemoryStorage;
    use serde_json::Value;
    use std::path::Path;
    use tower::ServiceExt;

    fn state_with(storage: Arc<dyn NewsStore>, static_dir: &Path) -> AppState {
        AppState {
            storage,
            hub: BroadcastHub::default(),
            monitor: HealthMonitor::new(),
            static_dir: static_dir.to_path_buf(),
        }
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_news_are_newest_first_and_deduplicated() {
        let storage = Arc::new(InMemoryStorage::new());
        assert_eq!(storage.save("G1", "T", "S").await, SaveOutcome::Inserted);
        storage.save("G1", "Other", "X").await;
        storage.save("Globo", "T", "S").await;

        let dir = tempfile::tempdir().unwrap();
        let app = create_app(state_with(storage, dir.path()));
        let (status, body) = get(app, "/noticias").await;
        assert_eq!(status, StatusCode::OK);

        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"fonte": "Globo", "titulo": "T", "resumo": "S"},
                {"fonte": "G1", "titulo": "Other", "resumo": "X"}
            ])
        );
    }

    #[tokio::test]
    async fn test_empty_store_returns_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_app(state_with(Arc::new(InMemoryStorage::new()), dir.path()));
        let (status, body) = get(app, "/noticias").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"[]");
    }

    #[tokio::test]
    async fn test_health_reports_cycles() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(Arc::new(InMemoryStorage::new()), dir.path());
        state.monitor.cycle_finished().await;

        let (status, body) = get(create_app(state), "/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["cycles_completed"], 1);
    }

    #[tokio::test]
    async fn test_static_files_and_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>news</h1>").unwrap();
        std::fs::write(dir.path().join("script.js"), "console.log(1)").unwrap();
        let storage: Arc<dyn NewsStore> = Arc::new(InMemoryStorage::new());

        let (status, body) = get(create_app(state_with(storage.clone(), dir.path())), "/index").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<h1>news</h1>");

        let (status, body) = get(create_app(state_with(storage.clone(), dir.path())), "/script.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"console.log(1)");

        let (status, _) = get(create_app(state_with(storage.clone(), dir.path())), "/missing.css").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get(create_app(state_with(storage, dir.path())), "/../Cargo.toml").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
