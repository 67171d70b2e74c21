use crate::config::generation_params::GenerationParams;

/// One multimodal prediction: instruction text plus an image reference.
#[derive(Debug, Clone, Copy)]
pub struct VisionRequest<'a> {
    /// Full instruction text sent to the model.
    pub prompt: &'a str,
    /// Publicly reachable image URL.
    pub image_url: &'a str,
    /// Sampling parameters.
    pub params: GenerationParams,
}

impl<'a> VisionRequest<'a> {
    pub fn new(prompt: &'a str, image_url: &'a str, params: GenerationParams) -> Self {
        Self {
            prompt,
            image_url,
            params,
        }
    }
}
