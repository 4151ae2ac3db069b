//! Data models for articles as they move through the pipeline.
//!
//! - [`ExtractedArticle`]: fields read off one search result
//! - [`EnrichedArticle`]: an admitted article with derived metrics and image
//! - [`ReportRow`]: the six-column projection written to the report
//! - [`ItemOutcome`] / [`SkipReason`]: what happened to each search result
//! - [`RunSummary`]: counts and settings of a finished run

use crate::error::BrowserError;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Column headers of the report, in output order.
pub const REPORT_COLUMNS: [&str; 6] = [
    "Title",
    "Date",
    "Description",
    "Image Filename",
    "Search Phrase Count",
    "Contains Money",
];

/// A search result after its required fields have been read and its date
/// parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArticle {
    /// Text of the first heading.
    pub title: String,
    /// Date text exactly as shown on the page.
    pub published_date_raw: String,
    /// `published_date_raw` parsed with [`crate::pipeline::extract::DATE_FORMAT`].
    pub published_date: NaiveDate,
    /// Text of the first paragraph.
    pub description: String,
    /// Absolute source URL of the first image.
    pub image_url: String,
}

impl ExtractedArticle {
    /// Title and description joined with a single space; the text the
    /// metrics are computed over.
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

/// An admitted article with its metrics computed and image downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedArticle {
    pub article: ExtractedArticle,
    /// Local path the image was saved to.
    pub image_filename: String,
    pub phrase_count: usize,
    pub contains_money: bool,
}

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Image Filename")]
    pub image_filename: String,
    #[serde(rename = "Search Phrase Count")]
    pub search_phrase_count: usize,
    #[serde(rename = "Contains Money", serialize_with = "python_bool")]
    pub contains_money: bool,
}

fn python_bool<S: serde::Serializer>(value: &bool, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(if *value { "True" } else { "False" })
}

impl From<&EnrichedArticle> for ReportRow {
    fn from(e: &EnrichedArticle) -> Self {
        ReportRow {
            title: e.article.title.clone(),
            date: e.article.published_date_raw.clone(),
            description: e.article.description.clone(),
            image_filename: e.image_filename.clone(),
            search_phrase_count: e.phrase_count,
            contains_money: e.contains_money,
        }
    }
}

/// Why a search result did not make it into the report.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("required element `{field}` missing")]
    MissingField { field: &'static str },

    #[error("date `{raw}` does not match the expected format")]
    DateParse { raw: String },

    #[error("published {published} is before cutoff {cutoff}")]
    OutsideWindow {
        published: NaiveDate,
        cutoff: NaiveDate,
    },

    #[error("image download from {url} failed: {reason}")]
    Download { url: String, reason: String },

    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),
}

impl SkipReason {
    /// Short stable label used when counting skips by kind.
    pub fn kind(&self) -> &'static str {
        match self {
            SkipReason::MissingField { .. } => "missing_field",
            SkipReason::DateParse { .. } => "date_parse",
            SkipReason::OutsideWindow { .. } => "outside_window",
            SkipReason::Download { .. } => "download",
            SkipReason::Browser(_) => "browser",
        }
    }
}

/// Result of running one search result through the per-item steps.
#[derive(Debug)]
pub enum ItemOutcome {
    Admitted(EnrichedArticle),
    Skipped(SkipReason),
}

/// Description of a finished run, written next to the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub search_phrase: String,
    pub category: String,
    pub category_applied: bool,
    pub months: u32,
    /// Earliest publication date admitted, `YYYY-MM-DD`.
    pub cutoff: String,
    pub items_found: usize,
    pub items_reported: usize,
    /// Skipped items per skip kind.
    pub skipped: BTreeMap<String, usize>,
    pub report_path: String,
}
