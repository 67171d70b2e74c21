use std::sync::Arc;

use axum::extract::{Json, State, rejection::JsonRejection};
use caption_engine::CAPTION_COUNT;
use futures::future::join_all;
use tracing::{info, instrument, warn};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::process_batch::{
        process_batch_request::ProcessBatchRequest,
        process_batch_response::{BatchItem, ProcessBatchResponse},
    },
};

/// Upper bound on images per batch.
pub const MAX_BATCH_IMAGES: usize = 8;

/// HTTP endpoint running captions + sheet lookup for up to eight images.
///
/// Images run concurrently, and so do the two lookups for one image.
#[instrument(name = "process_batch_route", skip_all)]
pub async fn process_batch_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProcessBatchRequest>, JsonRejection>,
) -> AppResult<Json<ProcessBatchResponse>> {
    let Json(body) = payload?;

    let (urls, truncated) = body
        .image_urls
        .map(|u| u.into_clean_list(MAX_BATCH_IMAGES))
        .unwrap_or_default();

    if urls.is_empty() {
        return Err(AppError::BadRequest(
            "At least one image URL is required".into(),
        ));
    }
    if truncated {
        warn!(
            kept = urls.len(),
            max = MAX_BATCH_IMAGES,
            "batch exceeds image limit, extra URLs dropped"
        );
    }

    let prompt = body.prompt.as_deref();
    let results = join_all(urls.iter().map(|url| process_one(&state, url, prompt))).await;

    info!(
        images = results.len(),
        failed = results.iter().filter(|r| r.error.is_some()).count(),
        truncated,
        "batch processed"
    );

    Ok(Json(ProcessBatchResponse { results, truncated }))
}

async fn process_one(state: &AppState, image_url: &str, prompt: Option<&str>) -> BatchItem {
    let (captions, link) = tokio::join!(
        state.captioner.generate(image_url, prompt),
        state.sheets.locate(image_url)
    );

    let (captions, error) = match captions {
        Ok(batch) => (batch.into_captions(), None),
        Err(err) => {
            let err = AppError::from(err);
            warn!(image_url, error = %err, "captions failed for image");
            (vec![String::new(); CAPTION_COUNT], Some(err.public_message()))
        }
    };

    BatchItem {
        image_url: image_url.to_string(),
        captions,
        sheet_url: link.as_ref().map(|l| l.sheet_url.clone()),
        sheet_name: link.as_ref().map(|l| l.sheet_name),
        row_number: link.as_ref().and_then(|l| l.row_number),
        error,
    }
}
