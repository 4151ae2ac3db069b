//! Error types for each layer of the harvester.
//!
//! Errors are split by how far they are allowed to travel:
//!
//! - [`BrowserError`]: anything the browsing capability reports
//! - [`ConfigError`]: job input that fails validation
//! - [`WorkQueueError`]: reading or completing a work item
//! - [`PipelineError`]: fatal, run-level failures that abort the run
//!
//! Per-item failures are not errors at this level; they are carried as
//! [`crate::models::SkipReason`] values and never escape the per-item step.

use thiserror::Error;

/// Failures reported by a [`crate::browser::Browser`] implementation.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("no element matches {0}")]
    ElementNotFound(String),

    #[error("element {0} cannot be submitted or followed")]
    NotActionable(String),

    #[error("element handle is stale (page changed since lookup)")]
    StaleHandle,

    #[error("no page is open")]
    NoPage,

    #[error("browser session is closed")]
    Closed,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for BrowserError {
    fn from(err: reqwest::Error) -> Self {
        BrowserError::Network(err.to_string())
    }
}

/// Job input that cannot be turned into a [`crate::config::NewsQuery`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required work item variable `{0}`")]
    Missing(&'static str),

    #[error("work item variable `{name}` must be a {expected}")]
    WrongType {
        name: &'static str,
        expected: &'static str,
    },

    #[error("`months` must be a positive integer, got `{0}`")]
    InvalidMonths(String),

    #[error("invalid news url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Failures talking to the work-queue capability.
#[derive(Debug, Error)]
pub enum WorkQueueError {
    #[error("no input work item available")]
    NoInput,

    #[error("malformed work item: {0}")]
    Malformed(String),

    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Fatal, run-level failures. Any of these aborts the run before a report is
/// produced (or, for [`PipelineError::Report`], while producing it).
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("could not open news site {url}: {source}")]
    SiteOpen {
        url: String,
        #[source]
        source: BrowserError,
    },

    #[error("search for `{phrase}` failed: {source}")]
    SearchFailure {
        phrase: String,
        #[source]
        source: BrowserError,
    },

    #[error("could not list articles: {0}")]
    Listing(#[source] BrowserError),

    #[error("failed writing report: {0}")]
    Report(#[from] ReportError),
}

/// Failures from the tabular report sink.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
