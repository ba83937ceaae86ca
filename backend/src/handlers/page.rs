//! Chat page and the small read-only endpoints it relies on.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use rust_embed::RustEmbed;

use crate::AppState;
use crate::models::{LanguageInfo, StatusResponse};
use crate::services::tutor::LANGUAGES;

#[derive(RustEmbed)]
#[folder = "web/"]
struct WebAssets;

/// GET /
pub async fn index() -> Response {
    match WebAssets::get("index.html") {
        Some(file) => Html(String::from_utf8_lossy(&file.data).into_owned()).into_response(),
        None => {
            tracing::error!("index.html is missing from embedded assets");
            (StatusCode::NOT_FOUND, "index.html not found").into_response()
        },
    }
}

/// List supported target languages
#[utoipa::path(
    get,
    path = "/api/languages",
    responses(
        (status = 200, description = "Language catalog in display order", body = Vec<LanguageInfo>)
    ),
    tag = "Tutor"
)]
pub async fn list_languages() -> Json<Vec<LanguageInfo>> {
    Json(
        LANGUAGES
            .iter()
            .map(|(code, name)| LanguageInfo { code: code.to_string(), name: name.to_string() })
            .collect(),
    )
}

/// Report whether the completion API is usable
#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Service status", body = StatusResponse)
    ),
    tag = "Tutor"
)]
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        credential_configured: state.tutor_service.is_available(),
        model: state.tutor_service.model().to_string(),
    })
}
