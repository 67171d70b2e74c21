use serde::Serialize;

/// Sampling parameters sent with every prediction request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationParams {
    /// Maximum number of output tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
}

impl GenerationParams {
    /// Parameters used for caption generation.
    pub const CAPTIONS: GenerationParams = GenerationParams {
        max_tokens: 250,
        temperature: 1.0,
        top_p: 0.95,
    };
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::CAPTIONS
    }
}
