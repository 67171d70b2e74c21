//! Finds the row of a tab whose lookup cell refers to a given image URL.
//!
//! Two linear passes over the column, both on trimmed lowercase values:
//! exact equality first, then equality of the numeric id found between the
//! last `/` and the next `?`. Rows are 1-based. Nothing is cached.

use std::{future::Future, pin::Pin};

use tracing::{debug, warn};

use crate::{directory::SheetDirectoryEntry, errors::SheetResult};

/// Boxed future returned by [`SheetColumnSource::read_column`].
pub type ColumnFuture<'a> = Pin<Box<dyn Future<Output = SheetResult<Vec<String>>> + Send + 'a>>;

/// Reads every cell of one column of one tab, top to bottom.
/// Empty cells come back as `""` so indexes stay aligned with rows.
pub trait SheetColumnSource: Send + Sync {
    fn read_column<'a>(&'a self, tab: &'a str, column: &'a str) -> ColumnFuture<'a>;
}

/// Reads the lookup column of `entry` and searches it for `url`.
///
/// Read failures are logged and reported as `None`.
pub async fn locate_row(
    source: &dyn SheetColumnSource,
    entry: &SheetDirectoryEntry,
    column: &str,
    url: &str,
) -> Option<u32> {
    let cells = match source.read_column(entry.name, column).await {
        Ok(cells) => cells,
        Err(err) => {
            warn!(sheet = entry.name, error = %err, "lookup column read failed");
            return None;
        }
    };

    let row = find_row(&cells, url);
    debug!(sheet = entry.name, rows = cells.len(), row, "row lookup finished");
    row
}

/// Pure two-pass search over already-fetched cells.
pub fn find_row<S: AsRef<str>>(cells: &[S], url: &str) -> Option<u32> {
    let needle = normalize(url);
    if needle.is_empty() {
        return None;
    }

    if let Some(idx) = cells.iter().position(|c| normalize(c.as_ref()) == needle) {
        return to_row(idx);
    }

    let id = extract_numeric_id(&needle)?;
    cells
        .iter()
        .position(|c| extract_numeric_id(&normalize(c.as_ref())) == Some(id))
        .and_then(to_row)
}

/// Digits between the last `/` and the following `?` (or the end).
///
/// Returns `None` unless that segment is non-empty and all ASCII digits.
pub fn extract_numeric_id(url: &str) -> Option<&str> {
    let (_, tail) = url.rsplit_once('/')?;
    let segment = tail.split('?').next().unwrap_or(tail);
    (!segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())).then_some(segment)
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

fn to_row(idx: usize) -> Option<u32> {
    u32::try_from(idx + 1).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SheetError;

    #[test]
    fn exact_match_is_case_and_whitespace_insensitive() {
        let cells = ["Link", "https://a.test/1", "  HTTPS://CDN.test/Bri.PNG  "];
        assert_eq!(find_row(&cells, "https://cdn.test/bri.png"), Some(3));
    }

    #[test]
    fn exact_match_returns_first_duplicate() {
        let cells = ["x", "https://a.test/p", "https://a.test/p"];
        assert_eq!(find_row(&cells, "https://a.test/p"), Some(2));
    }

    #[test]
    fn numeric_id_fallback_matches_other_hosts() {
        let cells = [
            "header",
            "",
            "https://old.host/posts/99",
            "https://old.host/posts/12345?ref=feed",
        ];
        assert_eq!(find_row(&cells, "https://new.host/p/12345?utm=x"), Some(4));
    }

    #[test]
    fn exact_pass_wins_over_numeric_pass() {
        let cells = ["https://a.test/77", "https://b.test/77"];
        assert_eq!(find_row(&cells, "https://b.test/77"), Some(2));
    }

    #[test]
    fn no_match_is_none() {
        let cells = ["https://a.test/1", "https://a.test/2"];
        assert_eq!(find_row(&cells, "https://a.test/3"), None);
        assert_eq!(find_row(&cells, "https://a.test/photo.png"), None);
        assert_eq!(find_row::<&str>(&[], "https://a.test/1"), None);
        assert_eq!(find_row(&cells, "   "), None);
    }

    #[test]
    fn numeric_id_rules() {
        assert_eq!(extract_numeric_id("https://h/p/123?x=1"), Some("123"));
        assert_eq!(extract_numeric_id("https://h/p/123"), Some("123"));
        assert_eq!(extract_numeric_id("https://h/p/12a"), None);
        assert_eq!(extract_numeric_id("https://h/p/?x"), None);
        assert_eq!(extract_numeric_id("123"), None);
    }

    struct FixedColumn(SheetResult<Vec<String>>);

    impl SheetColumnSource for FixedColumn {
        fn read_column<'a>(&'a self, _tab: &'a str, _column: &'a str) -> ColumnFuture<'a> {
            let out = match &self.0 {
                Ok(cells) => Ok(cells.clone()),
                Err(_) => Err(SheetError::MissingApiKey),
            };
            Box::pin(async move { out })
        }
    }

    #[tokio::test]
    async fn locate_reads_and_searches() {
        let source = FixedColumn(Ok(vec!["a".into(), "https://x.test/5".into()]));
        let entry = SheetDirectoryEntry::new("Bri Free", 1);
        assert_eq!(locate_row(&source, &entry, "B", "https://x.test/5").await, Some(2));
    }

    #[tokio::test]
    async fn read_failure_is_not_found() {
        let source = FixedColumn(Err(SheetError::MissingApiKey));
        let entry = SheetDirectoryEntry::new("Bri Free", 1);
        assert_eq!(locate_row(&source, &entry, "B", "https://x.test/5").await, None);
    }
}
