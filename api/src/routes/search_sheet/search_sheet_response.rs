use serde::Serialize;
use sheet_locator::SheetLink;

/// All fields are `null` when no tab matches the URL.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSheetResponse {
    pub sheet_url: Option<String>,
    pub sheet_name: Option<&'static str>,
    pub row_number: Option<u32>,
}

impl From<Option<SheetLink>> for SearchSheetResponse {
    fn from(link: Option<SheetLink>) -> Self {
        match link {
            Some(link) => Self {
                sheet_url: Some(link.sheet_url),
                sheet_name: Some(link.sheet_name),
                row_number: link.row_number,
            },
            None => Self::default(),
        }
    }
}
