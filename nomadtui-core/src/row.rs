//! Display rows and their composite lookup keys.

use crate::error::ParseKeyError;

/// Joins the identifiers inside a row key. Nomad ids, namespaces and task
/// names never contain ASCII control characters.
pub const KEY_SEPARATOR: char = '\u{1f}';

/// One line of a page: what is shown, plus an opaque key for reverse lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    pub display: String,
    pub key: String,
}

impl Row {
    /// A row whose key is its own text (detail pages and log lines).
    pub fn plain(display: impl Into<String>) -> Self {
        let display = display.into();
        Self {
            key: display.clone(),
            display,
        }
    }

    /// A row keyed by two identifiers, e.g. job id and namespace.
    pub fn keyed(display: impl Into<String>, first: &str, second: &str) -> Self {
        Self {
            display: display.into(),
            key: join_key(first, second),
        }
    }

    pub fn matches_filter(&self, filter: &str) -> bool {
        self.display.contains(filter)
    }
}

pub fn join_key(first: &str, second: &str) -> String {
    format!("{first}{KEY_SEPARATOR}{second}")
}

/// Splits a two-part key back into its identifiers.
pub fn split_key(key: &str) -> Result<(String, String), ParseKeyError> {
    key.split_once(KEY_SEPARATOR)
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .ok_or_else(|| ParseKeyError {
            key: key.to_string(),
        })
}

/// The payload of a successful load: an optional column header and the rows beneath it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageData {
    pub header: String,
    pub rows: Vec<Row>,
}

impl PageData {
    pub fn new(header: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            header: header.into(),
            rows,
        }
    }

    /// Rows without a header, one per line of `text`.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            header: String::new(),
            rows: lines.into_iter().map(Row::plain).collect(),
        }
    }
}
