// src/error.rs
//! Error kinds of the pipeline.
//!
//! Page-level errors (`FetchError`, `ParseError`, `ValidationError`) are
//! recoverable: the driver logs them with the URL and skips the page.
//! A listing failure is fatal and surfaces as `ScrapeError::Listing`.

use std::io;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("timeout after {0:?}")]
    Timeout(Duration),
    #[error("no fixture for {0}")]
    NotFound(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no statistics block found")]
    NoStatBlock,
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("missing `{0}` section")]
    MissingSection(&'static str),
    #[error("invalid challenge rating `{0}`")]
    InvalidCr(String),
    #[error("third-party content: {0}")]
    ThirdParty(String),
    #[error("no monster links found on listing page")]
    NoMonsterLinks,
    #[error("suggestion chain not resolved, last suggestion {0}")]
    UnresolvedSuggestion(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("empty monster name")]
    EmptyName,
    #[error("{name}: missing core statistic `{key}`")]
    MissingCore { name: String, key: &'static str },
}

/// Why one page (or the whole run) failed.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("listing page {url}: {source}")]
    Listing {
        url: String,
        #[source]
        source: Box<ScrapeError>,
    },
}

impl ScrapeError {
    /// Short label for summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            ScrapeError::Fetch(_) => "fetch",
            ScrapeError::Parse(_) => "parse",
            ScrapeError::Validation(_) => "validation",
            ScrapeError::Listing { .. } => "listing",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("path exists but is not a directory: {0}")]
    NotADirectory(String),
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
