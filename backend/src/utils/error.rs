use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::services::tutor::CompletionError;

/// Errors surfaced by the tutor endpoint.
///
/// The `Display` text of each variant is exactly what the client receives in
/// the `error` field, so the Czech messages below are part of the API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Prázdný dotaz")]
    EmptyInput,

    #[error("Proměnná OPENAI_API_KEY nebyla nalezena v prostředí")]
    MissingCredential,

    /// Any failure of the completion call; the upstream text is passed through verbatim.
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyInput | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::MissingCredential | Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body: `{"error": "..."}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed with {}: {}", status, self);
        } else {
            tracing::debug!("Request rejected with {}: {}", status, self);
        }

        (status, Json(ApiErrorResponse { error: self.to_string() })).into_response()
    }
}

impl From<CompletionError> for ApiError {
    fn from(err: CompletionError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_and_status_codes() {
        assert_eq!(ApiError::EmptyInput.to_string(), "Prázdný dotaz");
        assert_eq!(ApiError::EmptyInput.status_code(), StatusCode::BAD_REQUEST);

        assert_eq!(
            ApiError::MissingCredential.to_string(),
            "Proměnná OPENAI_API_KEY nebyla nalezena v prostředí"
        );
        assert_eq!(ApiError::MissingCredential.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = ApiError::Upstream("connection refused".to_string());
        assert_eq!(err.to_string(), "connection refused");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_completion_error_text_passes_through() {
        let err: ApiError = CompletionError::NoChoices.into();
        assert_eq!(err.to_string(), CompletionError::NoChoices.to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
