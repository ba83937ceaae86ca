use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};

use crate::AppState;
use crate::models::{AskRequest, AskResponse};
use crate::utils::ApiResult;

/// Send one learner message to the tutor
#[utoipa::path(
    post,
    path = "/ask",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Model answer", body = AskResponse),
        (status = 400, description = "Blank message or malformed body", body = crate::utils::error::ApiErrorResponse),
        (status = 500, description = "Missing credential or completion API failure", body = crate::utils::error::ApiErrorResponse),
    ),
    tag = "Tutor"
)]
pub async fn ask(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> ApiResult<Json<AskResponse>> {
    let Json(req) = payload?;
    let answer = state.tutor_service.ask(&req).await?;
    tracing::debug!("Answer ready ({} chars)", answer.chars().count());
    Ok(Json(AskResponse { answer }))
}
