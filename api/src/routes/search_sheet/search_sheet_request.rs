use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSheetRequest {
    #[serde(default)]
    pub image_url: Option<String>,
}
