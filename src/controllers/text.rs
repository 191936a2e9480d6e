use axum::Json;
use serde::{Deserialize, Serialize};

use crate::{
    domain::text::{build_italian_liturgy_segments, normalize_for_tts},
    error::{AppError, AppResult},
};

const MAX_TEXT_CHARS: usize = 100_000;

/// Request for POST /api/text/normalize
#[derive(Debug, Serialize, Deserialize)]
pub struct NormalizeRequest {
    pub text: String,
    pub language: Option<String>,
    pub feed_url: Option<String>,
    #[serde(default)]
    pub flatten_lines: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NormalizeResponse {
    pub text: String,
}

/// Request for POST /api/text/segments
#[derive(Debug, Serialize, Deserialize)]
pub struct SegmentsRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SegmentsResponse {
    pub segments: Vec<String>,
}

fn validate(text: &str) -> AppResult<()> {
    if text.trim().is_empty() {
        return Err(AppError::BadRequest("Text cannot be empty".to_string()));
    }
    if text.chars().count() > MAX_TEXT_CHARS {
        return Err(AppError::PayloadTooLarge(
            "Text must be 100,000 characters or less".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/text/normalize - Speech-ready version of feed text
pub async fn normalize(Json(request): Json<NormalizeRequest>) -> AppResult<Json<NormalizeResponse>> {
    validate(&request.text)?;

    let text = normalize_for_tts(
        &request.text,
        request.language.as_deref(),
        request.feed_url.as_deref(),
        request.flatten_lines,
    );

    Ok(Json(NormalizeResponse { text }))
}

/// POST /api/text/segments - Split an Italian liturgy description into its
/// spoken parts
pub async fn segments(Json(request): Json<SegmentsRequest>) -> AppResult<Json<SegmentsResponse>> {
    validate(&request.text)?;

    Ok(Json(SegmentsResponse {
        segments: build_italian_liturgy_segments(&request.text),
    }))
}
