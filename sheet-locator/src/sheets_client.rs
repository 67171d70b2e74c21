//! Read-only Google Sheets client for the lookup column.
//!
//! - GET {base}/{spreadsheet_id}/values/{'Tab'!B:B}?key=..&majorDimension=COLUMNS

use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::{
    errors::{SheetError, SheetResult},
    row_locator::{ColumnFuture, SheetColumnSource},
};

const SNIPPET_MAX: usize = 200;

/// Thin client over `spreadsheets.values.get`.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    values_base: String,
    api_key: String,
}

impl SheetsClient {
    /// # Errors
    /// - [`SheetError::MissingApiKey`] for a blank key
    /// - [`SheetError::Transport`] if the HTTP client cannot be built
    pub fn new(
        api_base: &str,
        spreadsheet_id: &str,
        api_key: &str,
        timeout: Duration,
    ) -> SheetResult<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(SheetError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()?;

        Ok(Self {
            http,
            values_base: format!(
                "{}/{}/values",
                api_base.trim_end_matches('/'),
                urlencoding::encode(spreadsheet_id.trim())
            ),
            api_key: api_key.to_string(),
        })
    }

    /// Full-column A1 range for `tab`, e.g. `'Bri Free'!B:B`.
    pub fn column_range(tab: &str, column: &str) -> String {
        format!("'{}'!{column}:{column}", tab.replace('\'', "''"))
    }

    #[instrument(skip(self))]
    async fn fetch_column(&self, tab: &str, column: &str) -> SheetResult<Vec<String>> {
        let started = Instant::now();
        let range = Self::column_range(tab, column);
        let url = format!("{}/{}", self.values_base, urlencoding::encode(&range));

        debug!(%range, "GET sheets values");

        let resp = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("majorDimension", "COLUMNS")])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(SNIPPET_MAX).collect();
            error!(%status, %snippet, latency_ms = started.elapsed().as_millis(), "sheets values.get failed");
            return Err(SheetError::HttpStatus { status, snippet });
        }

        let bytes = resp.bytes().await?;
        let parsed: ValueRange = serde_json::from_slice(&bytes)?;
        let cells = parsed.first_column();

        debug!(rows = cells.len(), latency_ms = started.elapsed().as_millis(), "sheets column read");
        Ok(cells)
    }
}

impl SheetColumnSource for SheetsClient {
    fn read_column<'a>(&'a self, tab: &'a str, column: &'a str) -> ColumnFuture<'a> {
        Box::pin(self.fetch_column(tab, column))
    }
}

/// `ValueRange` resource; `values` is omitted by the API for an empty range.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl ValueRange {
    fn first_column(self) -> Vec<String> {
        self.values
            .into_iter()
            .next()
            .unwrap_or_default()
            .into_iter()
            .map(cell_text)
            .collect()
    }
}

fn cell_text(v: Value) -> String {
    match v {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
