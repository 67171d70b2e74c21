use std::sync::Arc;

use axum::extract::{Json, State, rejection::JsonRejection};
use tracing::{info, instrument};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::generate_captions::{
        generate_captions_request::GenerateCaptionsRequest,
        generate_captions_response::GenerateCaptionsResponse,
    },
};

/// HTTP endpoint generating ten captions for one image.
///
/// 400 when `imageUrl` is missing or blank (no model call is made),
/// 500 when the model is unconfigured or rejects our credentials.
/// Weak model output is not an error: the response is blank-padded.
#[instrument(name = "generate_captions_route", skip_all)]
pub async fn generate_captions_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateCaptionsRequest>, JsonRejection>,
) -> AppResult<Json<GenerateCaptionsResponse>> {
    let Json(body) = payload?;
    let image_url = body.image_url.as_deref().unwrap_or_default();

    let batch = state
        .captioner
        .generate(image_url, body.prompt.as_deref())
        .await?;

    info!(
        image_url = %batch.image_url(),
        attempts = batch.attempts(),
        filled = batch.filled(),
        outcome = ?batch.outcome(),
        "captions generated"
    );

    Ok(Json(GenerateCaptionsResponse {
        captions: batch.into_captions(),
    }))
}
