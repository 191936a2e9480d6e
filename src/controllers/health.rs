use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::podcast::PodcastServiceApi;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Ready once at least one podcast is configured
pub async fn health_ready(
    State(podcast_service): State<Arc<dyn PodcastServiceApi>>,
) -> impl IntoResponse {
    let languages = podcast_service.languages();
    if languages.is_empty() {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "languages": languages
            })),
        )
    } else {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "languages": languages
            })),
        )
    }
}
