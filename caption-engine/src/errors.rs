use ai_llm_service::AiLlmError;
use thiserror::Error;

/// Convenient alias for caption generation results.
pub type CaptionResult<T> = Result<T, CaptionError>;

/// Failures that abort a caption request.
///
/// Low-quality model output is not an error: it ends in an exhausted,
/// blank-padded batch instead.
#[derive(Debug, Error)]
pub enum CaptionError {
    /// Request had no (or a blank) image URL; no model call was made.
    #[error("Image URL is required")]
    MissingImageUrl,

    /// The model is unconfigured or rejected our credentials.
    #[error("caption model unavailable: {0}")]
    Model(#[source] AiLlmError),
}
