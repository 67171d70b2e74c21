use serde::Deserialize;

/// Request body for `POST /api/process-batch`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessBatchRequest {
    #[serde(default)]
    pub image_urls: Option<ImageUrls>,
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Either a JSON array or the raw text-area contents.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ImageUrls {
    List(Vec<String>),
    /// Split on newlines and commas.
    Text(String),
}

impl ImageUrls {
    /// Trimmed, non-blank URLs (at most `max`) and whether any were dropped
    /// by the limit.
    pub fn into_clean_list(self, max: usize) -> (Vec<String>, bool) {
        let cleaned: Vec<String> = match self {
            ImageUrls::List(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            ImageUrls::Text(text) => text
                .split(['\n', ','])
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        };

        let truncated = cleaned.len() > max;
        (cleaned.into_iter().take(max).collect(), truncated)
    }
}
