//! Image URL -> spreadsheet deep link.
//!
//! Pipeline: [`resolver`] picks a tab from the static [`directory`],
//! [`row_locator`] optionally finds the row that mentions the URL, and
//! [`url_builder`] renders the link. A miss at any stage is `None`, never
//! an error.

pub mod config;
pub mod directory;
pub mod errors;
pub mod resolver;
pub mod row_locator;
pub mod sheets_client;
pub mod url_builder;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

pub use config::SheetConfig;
pub use directory::{SHEET_DIRECTORY, SheetDirectoryEntry};
pub use errors::{SheetError, SheetResult};
pub use resolver::{NameMatch, resolve_sheet_name};
pub use row_locator::{ColumnFuture, SheetColumnSource, find_row, locate_row};
pub use sheets_client::SheetsClient;
pub use url_builder::build_sheet_url;

/// Result of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetLink {
    pub sheet_name: &'static str,
    pub grid_id: u64,
    pub row_number: Option<u32>,
    pub sheet_url: String,
}

/// Resolver + row locator + URL builder behind one call.
#[derive(Clone)]
pub struct SheetLocator {
    base_url: String,
    lookup_column: String,
    link_column: String,
    rows: Option<Arc<dyn SheetColumnSource>>,
}

impl SheetLocator {
    /// `rows = None` disables the row lookup; links then open the tab only.
    pub fn new(
        base_url: impl Into<String>,
        lookup_column: impl Into<String>,
        link_column: impl Into<String>,
        rows: Option<Arc<dyn SheetColumnSource>>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            lookup_column: lookup_column.into(),
            link_column: link_column.into(),
            rows,
        }
    }

    /// Builds the locator, with a Sheets client when an API key is configured.
    pub fn from_config(cfg: &SheetConfig) -> SheetResult<Self> {
        let rows = match cfg.api_key.as_deref() {
            Some(key) => {
                let client = SheetsClient::new(&cfg.api_base, &cfg.spreadsheet_id, key, cfg.timeout)?;
                Some(Arc::new(client) as Arc<dyn SheetColumnSource>)
            }
            None => None,
        };

        info!(
            spreadsheet_id = %cfg.spreadsheet_id,
            row_lookup = rows.is_some(),
            lookup_column = %cfg.lookup_column,
            link_column = %cfg.link_column,
            "sheet locator initialized"
        );

        Ok(Self::new(
            url_builder::spreadsheet_edit_url(&cfg.spreadsheet_id),
            cfg.lookup_column.clone(),
            cfg.link_column.clone(),
            rows,
        ))
    }

    pub fn row_lookup_enabled(&self) -> bool {
        self.rows.is_some()
    }

    /// Resolves `image_url` to a deep link. `None` when no tab matches.
    #[instrument(skip(self))]
    pub async fn locate(&self, image_url: &str) -> Option<SheetLink> {
        let image_url = image_url.trim();
        let Some(hit) = resolve_sheet_name(image_url) else {
            info!("no sheet matches image url");
            return None;
        };
        let entry: SheetDirectoryEntry = *hit.entry;

        let row_number = match &self.rows {
            Some(source) => locate_row(source.as_ref(), &entry, &self.lookup_column, image_url).await,
            None => None,
        };

        let sheet_url = build_sheet_url(&self.base_url, entry.grid_id, row_number, &self.link_column);
        debug!(sheet = entry.name, pattern = hit.pattern, row_number, %sheet_url, "sheet link built");

        Some(SheetLink {
            sheet_name: entry.name,
            grid_id: entry.grid_id,
            row_number,
            sheet_url,
        })
    }
}
