//! Error types shared by the navigation core.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to produce rows for a page.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    /// The request never produced a response (connection refused, DNS, TLS, ...).
    #[error("request failed: {0}")]
    Transport(String),
    /// The API answered with a non-success status.
    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },
    /// The response body was not the JSON (or text) we expected.
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Decode(e.to_string())
    }
}

/// A composite row key without the separator its page expects.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("malformed row key: {key:?}")]
pub struct ParseKeyError {
    pub key: String,
}

/// Selection lookup on a page with nothing to select.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("no row selected")]
    NoRows,
}

/// Failure writing viewport content during save sub-mode.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("no filename given")]
    EmptyPath,
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a transition attempt was abandoned.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error(transparent)]
    NoRow(#[from] RowError),
    #[error(transparent)]
    Key(#[from] ParseKeyError),
}
