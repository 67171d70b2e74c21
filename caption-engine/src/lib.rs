//! Caption generation for promotional images.
//!
//! [`Captioner`] sends the fixed instructions plus an image URL to a
//! [`CaptionModel`], extracts numbered captions from the reply and retries
//! until enough were produced. The result is always a ten-slot
//! [`CaptionBatch`].

pub mod errors;
pub mod extractor;
pub mod model;
pub mod orchestrator;
pub mod prompt;

pub use errors::{CaptionError, CaptionResult};
pub use extractor::extract_captions;
pub use model::{CaptionModel, ModelFuture, UnconfiguredModel};
pub use orchestrator::{BatchOutcome, CAPTION_COUNT, CaptionBatch, Captioner, RetryPolicy};
pub use prompt::build_prompt;
