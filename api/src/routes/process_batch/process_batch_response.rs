use serde::Serialize;

/// Response body for `POST /api/process-batch`; results keep input order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessBatchResponse {
    pub results: Vec<BatchItem>,
    /// `true` when more URLs were sent than one batch accepts.
    pub truncated: bool,
}

/// Outcome for one image. Caption and sheet results are independent:
/// a caption failure still carries the sheet link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItem {
    pub image_url: String,
    /// Always ten entries; all blank when `error` is set.
    pub captions: Vec<String>,
    pub sheet_url: Option<String>,
    pub sheet_name: Option<&'static str>,
    pub row_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
