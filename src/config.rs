//! Typed run configuration built once from the input work item.

use crate::error::ConfigError;
use crate::workqueue::WorkItem;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use url::Url;

/// News site searched when the work item carries no `news_url`.
pub const DEFAULT_NEWS_URL: &str = "https://www.reuters.com/";

/// The validated search request for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsQuery {
    pub search_phrase: String,
    /// Empty when no category filter was requested.
    pub category: String,
    pub months: u32,
    pub source_url: String,
}

impl NewsQuery {
    /// Build a query from the work item payload.
    ///
    /// # Arguments
    ///
    /// * `item` - The input work item. `search_phrase` and `months` are
    ///   required; `news_category` and `news_url` are optional.
    ///
    /// # Returns
    ///
    /// The validated query, with the category trimmed and the source URL
    /// defaulted to [`DEFAULT_NEWS_URL`].
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Missing`] for an absent or blank required field
    /// - [`ConfigError::WrongType`] when a field is not a string
    /// - [`ConfigError::InvalidMonths`] unless `months` is an integer of at
    ///   least 1, given as a JSON number or a numeric string
    /// - [`ConfigError::InvalidUrl`] when `news_url` does not parse
    pub fn from_work_item(item: &WorkItem) -> Result<Self, ConfigError> {
        let search_phrase = required_string(item, "search_phrase")?;
        if search_phrase.trim().is_empty() {
            return Err(ConfigError::Missing("search_phrase"));
        }

        let category = optional_string(item, "news_category")?.unwrap_or_default();

        let months = match item.variable("months") {
            None | Some(Value::Null) => return Err(ConfigError::Missing("months")),
            Some(v) => parse_months(v)?,
        };

        let source_url =
            optional_string(item, "news_url")?.unwrap_or_else(|| DEFAULT_NEWS_URL.to_string());
        Url::parse(&source_url).map_err(|e| ConfigError::InvalidUrl {
            url: source_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(NewsQuery {
            search_phrase,
            category: category.trim().to_string(),
            months,
            source_url,
        })
    }

    pub fn has_category(&self) -> bool {
        !self.category.is_empty()
    }
}

fn required_string(item: &WorkItem, name: &'static str) -> Result<String, ConfigError> {
    optional_string(item, name)?.ok_or(ConfigError::Missing(name))
}

fn optional_string(item: &WorkItem, name: &'static str) -> Result<Option<String>, ConfigError> {
    match item.variable(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ConfigError::WrongType {
            name,
            expected: "string",
        }),
    }
}

fn parse_months(value: &Value) -> Result<u32, ConfigError> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => {
            return Err(ConfigError::WrongType {
                name: "months",
                expected: "positive integer",
            });
        }
    };
    match text.parse::<u32>() {
        Ok(m) if m > 0 => Ok(m),
        _ => Err(ConfigError::InvalidMonths(text)),
    }
}

/// Where the run writes its artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub root: PathBuf,
}

impl OutputPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    pub fn report_path(&self) -> PathBuf {
        self.root.join("news_data.csv")
    }

    pub fn summary_path(&self) -> PathBuf {
        self.root.join("run_summary.json")
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self::new("output")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(payload: Value) -> WorkItem {
        WorkItem::from_payload(payload).unwrap()
    }

    #[test]
    fn test_full_payload() {
        let q = NewsQuery::from_work_item(&item(json!({
            "search_phrase": "tesla",
            "news_category": " Business ",
            "months": "2",
            "news_url": "https://news.example.com/"
        })))
        .unwrap();

        assert_eq!(q.search_phrase, "tesla");
        assert_eq!(q.category, "Business");
        assert_eq!(q.months, 2);
        assert_eq!(q.source_url, "https://news.example.com/");
        assert!(q.has_category());
    }

    #[test]
    fn test_defaults() {
        let q = NewsQuery::from_work_item(&item(json!({
            "search_phrase": "tesla",
            "months": 1
        })))
        .unwrap();

        assert_eq!(q.source_url, DEFAULT_NEWS_URL);
        assert_eq!(q.category, "");
        assert!(!q.has_category());
    }

    #[test]
    fn test_missing_search_phrase() {
        let err = NewsQuery::from_work_item(&item(json!({ "months": 1 }))).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("search_phrase")));
    }

    #[test]
    fn test_missing_months() {
        let err = NewsQuery::from_work_item(&item(json!({ "search_phrase": "x" }))).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("months")));
    }

    #[test]
    fn test_rejects_non_positive_months() {
        for bad in [json!(0), json!("-3"), json!("two"), json!("1.5")] {
            let err = NewsQuery::from_work_item(&item(json!({
                "search_phrase": "x",
                "months": bad
            })))
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidMonths(_)), "{err:?}");
        }
    }

    #[test]
    fn test_rejects_bad_url() {
        let err = NewsQuery::from_work_item(&item(json!({
            "search_phrase": "x",
            "months": 1,
            "news_url": "not a url"
        })))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn test_output_paths() {
        let p = OutputPaths::default();
        assert_eq!(p.report_path(), PathBuf::from("output/news_data.csv"));
        assert_eq!(p.images_dir(), PathBuf::from("output/images"));
    }
}
