//! Image URL -> directory entry.
//!
//! Candidate tokens are pulled from the URL by four patterns, tried in order:
//!
//! | # | Pattern             | Captures                              |
//! |---|---------------------|---------------------------------------|
//! | 1 | `/([^/]+)\.[^.]+$`  | last path segment before an extension |
//! | 2 | `/([^/]+)$`         | last path segment                     |
//! | 3 | `([^/]+)\.[^.]+$`   | filename-like suffix                  |
//! | 4 | `([^/]+)$`          | trailing token                        |
//!
//! A candidate matches an entry (case-insensitively) when the entry name
//! contains the candidate, or the candidate contains the entry's first word.
//! The first pattern whose candidate hits the directory wins; within a
//! pattern the first entry in directory order wins.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::directory::{SHEET_DIRECTORY, SheetDirectoryEntry};

const NAME_PATTERNS: [&str; 4] = [
    r"/([^/]+)\.[^.]+$",
    r"/([^/]+)$",
    r"([^/]+)\.[^.]+$",
    r"([^/]+)$",
];

static NAME_REGEXES: OnceLock<Vec<Regex>> = OnceLock::new();

fn name_regexes() -> &'static [Regex] {
    NAME_REGEXES.get_or_init(|| {
        NAME_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("static name pattern must compile"))
            .collect()
    })
}

/// A successful resolution plus how it was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameMatch<'a> {
    pub entry: &'a SheetDirectoryEntry,
    /// Token extracted from the URL.
    pub candidate: &'a str,
    /// 1-based index of the pattern that produced `candidate`.
    pub pattern: usize,
}

/// Resolves against the built-in directory.
pub fn resolve_sheet_name(url: &str) -> Option<NameMatch<'_>> {
    resolve_in(SHEET_DIRECTORY, url)
}

/// Resolves against an arbitrary ordered directory.
pub fn resolve_in<'a>(directory: &'a [SheetDirectoryEntry], url: &'a str) -> Option<NameMatch<'a>> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    for (idx, re) in name_regexes().iter().enumerate() {
        let Some(candidate) = re.captures(url).and_then(|c| c.get(1)).map(|m| m.as_str()) else {
            continue;
        };
        if let Some(entry) = match_entry(directory, candidate) {
            debug!(candidate, pattern = idx + 1, sheet = entry.name, "resolved sheet name");
            return Some(NameMatch {
                entry,
                candidate,
                pattern: idx + 1,
            });
        }
        debug!(candidate, pattern = idx + 1, "candidate matched no sheet");
    }

    None
}

fn match_entry<'a>(directory: &'a [SheetDirectoryEntry], candidate: &str) -> Option<&'a SheetDirectoryEntry> {
    let needle = candidate.to_lowercase();
    directory.iter().find(|entry| {
        let name = entry.name.to_lowercase();
        name.contains(&needle) || needle.contains(&entry.first_word().to_lowercase())
    })
}
