use axum::Router;
use tower_http::services::ServeDir;

use crate::state::SharedState;

/// Built-in bars and bonus tasks.
pub mod catalog;
/// Read views over the cloud mirror.
pub mod cloud;
/// Swagger UI.
pub mod docs;
/// Health check.
pub mod health;
/// Save-score, upload-image and payment relays.
pub mod relay;
/// Sessions, scoring and hole submission.
pub mod sessions;

/// Compose all route trees, wiring in shared state, uploaded files and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let upload_limit = state.config().max_upload_bytes();
    let api_router = health::router()
        .merge(sessions::router(upload_limit))
        .merge(catalog::router())
        .merge(cloud::router())
        .merge(relay::router(upload_limit));

    let uploads = ServeDir::new(state.config().uploads_dir());
    let uploads_prefix = state.config().uploads_url_prefix().to_string();

    api_router
        .merge(docs::router())
        .nest_service(&uploads_prefix, uploads)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tempfile::tempdir;
    use tower::ServiceExt;

    use super::*;
    use crate::{config::AppConfig, state::AppState};

    #[tokio::test]
    async fn serves_uploaded_files_and_health() {
        let dir = tempdir().unwrap();
        let config = AppConfig::default().with_data_root(dir.path());
        std::fs::create_dir_all(config.uploads_dir()).unwrap();
        std::fs::write(config.uploads_dir().join("g_b_1.jpg"), b"photo").unwrap();
        let app = router(AppState::new(config));

        let response = app
            .clone()
            .oneshot(Request::get("/uploads/g_b_1.jpg").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"photo");

        let response = app
            .oneshot(Request::get("/healthcheck").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
