//! Environment-driven configuration for the sheet locator.

use std::time::Duration;

use crate::errors::{SheetError, SheetResult};

pub const DEFAULT_SPREADSHEET_ID: &str = "1IBlBPFGDw19PhexlPowIbFw0xKleMDn8JCxrOM17ExA";
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
pub const DEFAULT_LOOKUP_COLUMN: &str = "B";
pub const DEFAULT_LINK_COLUMN: &str = "A";
pub const DEFAULT_SHEETS_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetConfig {
    pub spreadsheet_id: String,
    pub api_base: String,
    /// Row lookup is disabled when absent.
    pub api_key: Option<String>,
    pub lookup_column: String,
    pub link_column: String,
    pub timeout: Duration,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: DEFAULT_SPREADSHEET_ID.to_string(),
            api_base: DEFAULT_SHEETS_API_BASE.to_string(),
            api_key: None,
            lookup_column: DEFAULT_LOOKUP_COLUMN.to_string(),
            link_column: DEFAULT_LINK_COLUMN.to_string(),
            timeout: Duration::from_secs(DEFAULT_SHEETS_TIMEOUT_SECS),
        }
    }
}

impl SheetConfig {
    /// Reads the process environment.
    pub fn from_env() -> SheetResult<Self> {
        Self::from_lookup(&|name: &str| std::env::var(name).ok())
    }

    /// Reads through `lookup`; blank values count as unset.
    ///
    /// Vars: `SHEET_SPREADSHEET_ID`, `SHEETS_API_BASE`, `GOOGLE_SHEETS_API_KEY`,
    /// `SHEET_LOOKUP_COLUMN`, `SHEET_LINK_COLUMN`, `SHEETS_TIMEOUT_SECS`.
    pub fn from_lookup<F>(lookup: &F) -> SheetResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let api_base = get("SHEETS_API_BASE").unwrap_or(defaults.api_base);
        if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
            return Err(SheetError::InvalidConfig {
                var: "SHEETS_API_BASE",
                reason: format!("expected http(s) URL, got `{api_base}`"),
            });
        }

        let timeout = match get("SHEETS_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.parse::<u64>().map_err(|e| {
                SheetError::InvalidConfig {
                    var: "SHEETS_TIMEOUT_SECS",
                    reason: e.to_string(),
                }
            })?),
            None => defaults.timeout,
        };

        Ok(Self {
            spreadsheet_id: get("SHEET_SPREADSHEET_ID").unwrap_or(defaults.spreadsheet_id),
            api_base,
            api_key: get("GOOGLE_SHEETS_API_KEY"),
            lookup_column: column_var(get("SHEET_LOOKUP_COLUMN"), "SHEET_LOOKUP_COLUMN", defaults.lookup_column)?,
            link_column: column_var(get("SHEET_LINK_COLUMN"), "SHEET_LINK_COLUMN", defaults.link_column)?,
            timeout,
        })
    }
}

/// Column letters (`A`..`ZZZ`), normalized to upper case.
fn column_var(value: Option<String>, var: &'static str, default: String) -> SheetResult<String> {
    let Some(raw) = value else {
        return Ok(default);
    };
    let upper = raw.to_ascii_uppercase();
    if upper.len() > 3 || !upper.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(SheetError::InvalidConfig {
            var,
            reason: format!("expected a column letter, got `{raw}`"),
        });
    }
    Ok(upper)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = SheetConfig::from_lookup(&lookup(&[])).unwrap();
        assert_eq!(cfg, SheetConfig::default());
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = SheetConfig::from_lookup(&lookup(&[
            ("SHEET_SPREADSHEET_ID", "staging"),
            ("GOOGLE_SHEETS_API_KEY", " key "),
            ("SHEET_LOOKUP_COLUMN", "c"),
            ("SHEETS_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(cfg.spreadsheet_id, "staging");
        assert_eq!(cfg.api_key.as_deref(), Some("key"));
        assert_eq!(cfg.lookup_column, "C");
        assert_eq!(cfg.link_column, "A");
        assert_eq!(cfg.timeout, Duration::from_secs(3));
    }

    #[test]
    fn blank_api_key_disables_lookup() {
        let cfg = SheetConfig::from_lookup(&lookup(&[("GOOGLE_SHEETS_API_KEY", "   ")])).unwrap();
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn rejects_bad_values() {
        let err = SheetConfig::from_lookup(&lookup(&[("SHEET_LINK_COLUMN", "A1")])).unwrap_err();
        assert!(matches!(err, SheetError::InvalidConfig { var: "SHEET_LINK_COLUMN", .. }));

        let err = SheetConfig::from_lookup(&lookup(&[("SHEETS_API_BASE", "ftp://x")])).unwrap_err();
        assert!(matches!(err, SheetError::InvalidConfig { var: "SHEETS_API_BASE", .. }));

        let err = SheetConfig::from_lookup(&lookup(&[("SHEETS_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, SheetError::InvalidConfig { var: "SHEETS_TIMEOUT_SECS", .. }));
    }
}
