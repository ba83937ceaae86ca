//! Jazykový AI: a chat backend for Czech-speaking language learners.
//!
//! A single `POST /ask` endpoint wraps the learner's message in a tutoring
//! prompt and forwards it to an OpenAI-compatible completion API.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::services::tutor::{CompletionClient, OpenAIClient, TutorService};

/// Shared, read-only application state.
pub struct AppState {
    pub tutor_service: Arc<TutorService>,
}

impl AppState {
    /// Wire services from configuration.
    ///
    /// Without an API key no client is created; requests then fail with the
    /// missing-credential error instead of the process refusing to start.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client: Option<Arc<dyn CompletionClient>> = match config.openai.credential() {
            Some(key) => Some(Arc::new(OpenAIClient::new(
                key,
                config.openai.base_url.clone(),
                config.openai.timeout(),
            )?)),
            None => None,
        };

        let tutor_service = Arc::new(TutorService::new(client, config.openai.timeout()));
        Ok(Self { tutor_service })
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::ask::ask,
        handlers::page::list_languages,
        handlers::page::get_status,
    ),
    components(schemas(
        models::AskRequest,
        models::AskResponse,
        models::LanguageInfo,
        models::StatusResponse,
        utils::error::ApiErrorResponse,
    )),
    tags(
        (name = "Tutor", description = "Language tutoring chat")
    )
)]
pub struct ApiDoc;

pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/", get(handlers::page::index))
        .route("/ask", post(handlers::ask::ask))
        .route("/api/languages", get(handlers::page::list_languages))
        .route("/api/status", get(handlers::page::get_status))
        .with_state(state);

    api.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
