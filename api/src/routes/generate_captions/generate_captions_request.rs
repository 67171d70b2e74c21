use serde::Deserialize;

/// Request body for `POST /api/generate-captions`.
///
/// Both fields are optional at the JSON level so that a missing `imageUrl`
/// is reported as a validation error instead of a deserialization error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCaptionsRequest {
    /// Publicly reachable image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Extra steering text appended to the fixed instructions.
    #[serde(default)]
    pub prompt: Option<String>,
}
