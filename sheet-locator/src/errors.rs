use reqwest::StatusCode;
use thiserror::Error;

/// Convenient alias for sheet-locator results.
pub type SheetResult<T> = Result<T, SheetError>;

/// Errors from configuration and from the spreadsheet read.
///
/// Read failures never reach HTTP callers; the locator logs them and
/// reports "row not found".
#[derive(Debug, Error)]
pub enum SheetError {
    /// Env value present but unusable.
    #[error("invalid value for {var}: {reason}")]
    InvalidConfig { var: &'static str, reason: String },

    /// Row lookup requested without an API key.
    #[error("missing sheets api key")]
    MissingApiKey,

    /// Network/transport failure (DNS, connect, timeout).
    #[error("sheets transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status from the Sheets API.
    #[error("sheets api returned {status}: {snippet}")]
    HttpStatus { status: StatusCode, snippet: String },

    /// Response body did not have the expected shape.
    #[error("invalid sheets response: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for SheetError {
    fn from(e: serde_json::Error) -> Self {
        SheetError::Decode(e.to_string())
    }
}
