//! Derived signals computed from an article's title and description.

use crate::models::ExtractedArticle;
use once_cell::sync::Lazy;
use regex::Regex;

/// Dollar amounts: `$12`, `$12.50`, `12 dollars`, `12 USD`.
static MONEY_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"(?i)\$\d+(\.\d{2})?").expect("valid money pattern"),
        Regex::new(r"(?i)\d+ dollars").expect("valid money pattern"),
        Regex::new(r"(?i)\d+ USD").expect("valid money pattern"),
    ]
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    pub phrase_count: usize,
    pub contains_money: bool,
}

impl Metrics {
    pub fn compute(article: &ExtractedArticle, search_phrase: &str) -> Self {
        let text = article.combined_text();
        Metrics {
            phrase_count: phrase_count(&text, search_phrase),
            contains_money: contains_money(&text),
        }
    }
}

/// Non-overlapping, case-insensitive occurrences of `phrase` in `text`.
pub fn phrase_count(text: &str, phrase: &str) -> usize {
    if phrase.is_empty() {
        return 0;
    }
    text.to_lowercase().matches(&phrase.to_lowercase()).count()
}

pub fn contains_money(text: &str) -> bool {
    MONEY_PATTERNS.iter().any(|re| re.is_match(text))
}
