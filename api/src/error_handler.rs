use ai_llm_service::AiLlmError;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use caption_engine::CaptionError;
use serde::Serialize;
use sheet_locator::SheetError;
use thiserror::Error;
use tracing::error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("configuration error: {0}")]
    Config(String),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    #[error("{0}")]
    BadRequest(String),

    /// Caption generation failed in a way the caller cannot fix.
    #[error(transparent)]
    Caption(#[from] CaptionError),

    /// Anything unexpected; details are logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Caption(CaptionError::MissingImageUrl) => StatusCode::BAD_REQUEST,
            AppError::Caption(CaptionError::Model(_)) => StatusCode::INTERNAL_SERVER_ERROR,

            // startup-only, but keep them renderable
            AppError::Config(_) | AppError::Bind(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Caption(CaptionError::MissingImageUrl) => "MISSING_IMAGE_URL",
            AppError::Caption(CaptionError::Model(_)) => "CAPTION_MODEL_UNAVAILABLE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to clients.
    pub fn public_message(&self) -> String {
        match self {
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Caption(CaptionError::MissingImageUrl) => self.to_string(),
            AppError::Caption(CaptionError::Model(_)) => "Failed to generate captions".into(),
            _ => "Failed to process request".into(),
        }
    }
}

/// Error body: `{ "error": "...", "code": "..." }`.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorBody {
            error: self.public_message(),
            code: self.error_code(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl From<AiLlmError> for AppError {
    fn from(err: AiLlmError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<SheetError> for AppError {
    fn from(err: SheetError) -> Self {
        AppError::Config(err.to_string())
    }
}
