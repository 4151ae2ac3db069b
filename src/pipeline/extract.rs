//! Reading one search result into an [`ExtractedArticle`].

use crate::browser::{Browser, ElementHandle, Locator};
use crate::models::{ExtractedArticle, SkipReason};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Format of the date text shown on each search result, e.g. `Mar 14, 2024`.
pub const DATE_FORMAT: &str = "%b %d, %Y";

/// chrono lets a format space match no whitespace at all, so the separators
/// are checked here first.
static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{3}\s+\d{1,2},\s+\d{4}$").expect("valid date pattern"));

/// Read title, date, description and image URL from one result.
///
/// The first `h2`, `time`, `p` and `img[src]` inside the result are used. Any
/// of them missing, or a date that does not parse, skips the item.
pub async fn extract<B: Browser>(
    browser: &mut B,
    handle: ElementHandle,
) -> Result<ExtractedArticle, SkipReason> {
    let title = required_text(browser, handle, "h2").await?;
    let published_date_raw = required_text(browser, handle, "time").await?;
    let published_date = parse_published_date(&published_date_raw)?;
    let description = required_text(browser, handle, "p").await?;
    let image_url = browser
        .child_attribute(handle, &Locator::css("img"), "src")
        .await?
        .filter(|src| !src.trim().is_empty())
        .ok_or(SkipReason::MissingField { field: "img[src]" })?;

    Ok(ExtractedArticle {
        title,
        published_date_raw,
        published_date,
        description,
        image_url,
    })
}

async fn required_text<B: Browser>(
    browser: &mut B,
    handle: ElementHandle,
    field: &'static str,
) -> Result<String, SkipReason> {
    browser
        .child_text(handle, &Locator::css(field))
        .await?
        .ok_or(SkipReason::MissingField { field })
}

/// Parse a result's date text, e.g. `Mar 14, 2024`.
///
/// # Arguments
///
/// * `raw` - The text of the result's `time` element; surrounding whitespace
///   is ignored
///
/// # Errors
///
/// Returns [`SkipReason::DateParse`] unless the text is an abbreviated month
/// name, a day, a comma and a four-digit year, separated by whitespace.
pub fn parse_published_date(raw: &str) -> Result<NaiveDate, SkipReason> {
    let failed = || SkipReason::DateParse {
        raw: raw.to_string(),
    };
    let text = raw.trim();
    if !DATE_SHAPE.is_match(text) {
        return Err(failed());
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| failed())
}
