use serde::Serialize;

/// Always exactly ten entries; blanks pad a short result.
#[derive(Debug, Serialize)]
pub struct GenerateCaptionsResponse {
    pub captions: Vec<String>,
}
