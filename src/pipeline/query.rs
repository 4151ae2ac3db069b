//! Search and category filtering against the news site.

use crate::browser::{Browser, ElementHandle, Locator};
use crate::config::NewsQuery;
use crate::error::PipelineError;
use tracing::{info, instrument, warn};

/// The site's search text box.
pub const SEARCH_FIELD: &str = r#"input[type="search"]"#;
/// Present once search results have rendered.
pub const RESULTS_CONTAINER: &str = r#"div[class*="search-results"]"#;
/// One search result.
pub const ARTICLE: &str = r#"article[class*="story"]"#;

/// What happened to the requested category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    Applied,
    /// No category was requested.
    NotRequested,
    /// A category was requested but could not be applied; results are
    /// unfiltered.
    NotFound,
}

/// Open the news site.
#[instrument(level = "info", skip_all, fields(url = %query.source_url))]
pub async fn open_site<B: Browser>(
    browser: &mut B,
    query: &NewsQuery,
) -> Result<(), PipelineError> {
    info!("Opening website");
    browser
        .open(&query.source_url)
        .await
        .map_err(|source| PipelineError::SiteOpen {
            url: query.source_url.clone(),
            source,
        })
}

/// Submit the search phrase and wait for the results container.
#[instrument(level = "info", skip_all, fields(phrase = %query.search_phrase))]
pub async fn search<B: Browser>(browser: &mut B, query: &NewsQuery) -> Result<(), PipelineError> {
    info!("Searching for news");
    let failure = |source| PipelineError::SearchFailure {
        phrase: query.search_phrase.clone(),
        source,
    };
    browser
        .submit_text(&Locator::css(SEARCH_FIELD), &query.search_phrase)
        .await
        .map_err(failure)?;
    browser
        .wait_for(&Locator::css(RESULTS_CONTAINER))
        .await
        .map_err(failure)
}

/// Click the link for the requested category, if there is one.
///
/// Never fails: a missing or unclickable category is logged and the run
/// carries on with the unfiltered results.
#[instrument(level = "info", skip_all, fields(category = %query.category))]
pub async fn filter_by_category<B: Browser>(browser: &mut B, query: &NewsQuery) -> CategoryFilter {
    if !query.has_category() {
        info!("No category requested");
        return CategoryFilter::NotRequested;
    }

    let link = Locator::css("a").containing_text(&query.category);
    match browser.contains(&link).await {
        Ok(true) => match browser.click(&link).await {
            Ok(()) => {
                info!("Filtered news by category");
                CategoryFilter::Applied
            }
            Err(e) => {
                warn!(
                    error = %e,
                    "Category link could not be followed; proceeding without category filter"
                );
                CategoryFilter::NotFound
            }
        },
        Ok(false) => {
            warn!("Category not found; proceeding without category filter");
            CategoryFilter::NotFound
        }
        Err(e) => {
            warn!(error = %e, "Category lookup failed; proceeding without category filter");
            CategoryFilter::NotFound
        }
    }
}

/// Handles for every search result on the current page, in page order.
pub async fn list_articles<B: Browser>(
    browser: &mut B,
) -> Result<Vec<ElementHandle>, PipelineError> {
    let handles = browser
        .find_all(&Locator::css(ARTICLE))
        .await
        .map_err(PipelineError::Listing)?;
    info!(count = handles.len(), "Found news items");
    Ok(handles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBrowser, query};

    #[tokio::test]
    async fn test_search_submits_phrase() {
        let mut browser = FakeBrowser::default();
        search(&mut browser, &query("tesla", "", 1)).await.unwrap();
        assert_eq!(browser.searched, vec!["tesla".to_string()]);
    }

    #[tokio::test]
    async fn test_search_without_results_is_fatal() {
        let mut browser = FakeBrowser {
            has_search_results: false,
            ..FakeBrowser::default()
        };
        let err = search(&mut browser, &query("tesla", "", 1)).await.unwrap_err();
        assert!(matches!(err, PipelineError::SearchFailure { .. }));
    }

    #[tokio::test]
    async fn test_category_applied() {
        let mut browser = FakeBrowser {
            categories: vec!["Business".to_string()],
            ..FakeBrowser::default()
        };
        let filter = filter_by_category(&mut browser, &query("tesla", "Business", 1)).await;
        assert_eq!(filter, CategoryFilter::Applied);
        assert_eq!(browser.clicked, vec!["Business".to_string()]);
    }

    #[tokio::test]
    async fn test_category_missing_degrades() {
        let mut browser = FakeBrowser::default();
        let filter = filter_by_category(&mut browser, &query("tesla", "Sports", 1)).await;
        assert_eq!(filter, CategoryFilter::NotFound);
        assert!(browser.clicked.is_empty());
    }

    #[tokio::test]
    async fn test_category_click_failure_degrades() {
        let mut browser = FakeBrowser {
            categories: vec!["Business".to_string()],
            click_fails: true,
            ..FakeBrowser::default()
        };
        let filter = filter_by_category(&mut browser, &query("tesla", "Business", 1)).await;
        assert_eq!(filter, CategoryFilter::NotFound);
        assert!(browser.clicked.is_empty());
        assert!(!browser.closed);
    }

    #[tokio::test]
    async fn test_no_category_requested() {
        let mut browser = FakeBrowser::default();
        let filter = filter_by_category(&mut browser, &query("tesla", "", 1)).await;
        assert_eq!(filter, CategoryFilter::NotRequested);
    }
}
