use std::sync::Arc;

use axum::extract::{Json, State, rejection::JsonRejection};
use tracing::{info, instrument};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::search_sheet::{
        search_sheet_request::SearchSheetRequest, search_sheet_response::SearchSheetResponse,
    },
};

/// HTTP endpoint resolving an image URL to a sheet deep link.
///
/// A URL that matches no tab is a normal 200 with `null` fields.
#[instrument(name = "search_sheet_route", skip_all)]
pub async fn search_sheet_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchSheetRequest>, JsonRejection>,
) -> AppResult<Json<SearchSheetResponse>> {
    let Json(body) = payload?;
    let image_url = body
        .image_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::BadRequest("Image URL is required".into()))?;

    let link = state.sheets.locate(image_url).await;

    info!(
        image_url,
        sheet = link.as_ref().map(|l| l.sheet_name),
        row = link.as_ref().and_then(|l| l.row_number),
        "sheet search finished"
    );

    Ok(Json(SearchSheetResponse::from(link)))
}
