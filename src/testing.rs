//! In-memory capability fakes shared by the unit tests.

use crate::browser::{Browser, ElementHandle, Locator};
use crate::config::NewsQuery;
use crate::error::{BrowserError, ReportError};
use crate::models::ReportRow;
use crate::outputs::report::ReportWriter;
use crate::pipeline::query::RESULTS_CONTAINER;
use std::path::{Path, PathBuf};

pub fn query(phrase: &str, category: &str, months: u32) -> NewsQuery {
    NewsQuery {
        search_phrase: phrase.to_string(),
        category: category.to_string(),
        months,
        source_url: "https://news.example.com/".to_string(),
    }
}

/// One search result; `None` fields are absent from the page.
#[derive(Debug, Clone, Default)]
pub struct FakeArticle {
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl FakeArticle {
    pub fn new(title: &str, date: &str, description: &str, image: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            date: Some(date.to_string()),
            description: Some(description.to_string()),
            image: Some(image.to_string()),
        }
    }
}

/// Scripted browser that records what the pipeline asked it to do.
#[derive(Debug)]
pub struct FakeBrowser {
    pub open_fails: bool,
    pub has_search_results: bool,
    /// Link texts present on the results page.
    pub categories: Vec<String>,
    /// Category links are present but clicking them errors.
    pub click_fails: bool,
    pub articles: Vec<FakeArticle>,
    pub failing_downloads: Vec<String>,

    pub opened: Vec<String>,
    pub searched: Vec<String>,
    pub clicked: Vec<String>,
    pub downloads: Vec<(String, PathBuf)>,
    pub closed: bool,
    pub(crate) generation: u64,
}

impl Default for FakeBrowser {
    fn default() -> Self {
        Self {
            open_fails: false,
            has_search_results: true,
            categories: Vec::new(),
            click_fails: false,
            articles: Vec::new(),
            failing_downloads: Vec::new(),
            opened: Vec::new(),
            searched: Vec::new(),
            clicked: Vec::new(),
            downloads: Vec::new(),
            closed: false,
            generation: 1,
        }
    }
}

impl FakeBrowser {
    pub fn with_articles(articles: Vec<FakeArticle>) -> Self {
        Self {
            articles,
            ..Self::default()
        }
    }

    fn article(&self, handle: ElementHandle) -> Result<&FakeArticle, BrowserError> {
        if handle.page() != self.generation {
            return Err(BrowserError::StaleHandle);
        }
        self.articles
            .get(handle.index())
            .ok_or(BrowserError::StaleHandle)
    }

    fn ensure_open(&self) -> Result<(), BrowserError> {
        if self.closed {
            Err(BrowserError::Closed)
        } else {
            Ok(())
        }
    }
}

impl Browser for FakeBrowser {
    async fn open(&mut self, url: &str) -> Result<(), BrowserError> {
        self.ensure_open()?;
        if self.open_fails {
            return Err(BrowserError::Network("connection refused".to_string()));
        }
        self.opened.push(url.to_string());
        Ok(())
    }

    async fn submit_text(&mut self, _field: &Locator, text: &str) -> Result<(), BrowserError> {
        self.ensure_open()?;
        self.searched.push(text.to_string());
        Ok(())
    }

    async fn wait_for(&mut self, locator: &Locator) -> Result<(), BrowserError> {
        if self.contains(locator).await? {
            Ok(())
        } else {
            Err(BrowserError::ElementNotFound(locator.to_string()))
        }
    }

    async fn contains(&mut self, locator: &Locator) -> Result<bool, BrowserError> {
        self.ensure_open()?;
        Ok(match (&locator.css[..], &locator.text) {
            (RESULTS_CONTAINER, _) => self.has_search_results,
            ("a", Some(text)) => self.categories.iter().any(|c| c.contains(text.as_str())),
            _ => false,
        })
    }

    async fn click(&mut self, locator: &Locator) -> Result<(), BrowserError> {
        self.ensure_open()?;
        if !self.contains(locator).await? {
            return Err(BrowserError::ElementNotFound(locator.to_string()));
        }
        if self.click_fails {
            return Err(BrowserError::NotActionable(locator.to_string()));
        }
        self.clicked.push(locator.text.clone().unwrap_or_default());
        self.generation += 1;
        Ok(())
    }

    async fn find_all(&mut self, _locator: &Locator) -> Result<Vec<ElementHandle>, BrowserError> {
        self.ensure_open()?;
        Ok((0..self.articles.len())
            .map(|i| ElementHandle::new(self.generation, i))
            .collect())
    }

    async fn child_text(
        &mut self,
        handle: ElementHandle,
        locator: &Locator,
    ) -> Result<Option<String>, BrowserError> {
        self.ensure_open()?;
        let article = self.article(handle)?;
        Ok(match locator.css.as_str() {
            "h2" => article.title.clone(),
            "time" => article.date.clone(),
            "p" => article.description.clone(),
            _ => None,
        })
    }

    async fn child_attribute(
        &mut self,
        handle: ElementHandle,
        locator: &Locator,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        self.ensure_open()?;
        let article = self.article(handle)?;
        Ok(match (locator.css.as_str(), name) {
            ("img", "src") => article.image.clone(),
            _ => None,
        })
    }

    async fn download(&mut self, url: &str, dest: &Path) -> Result<(), BrowserError> {
        self.ensure_open()?;
        if self.failing_downloads.iter().any(|u| u == url) {
            return Err(BrowserError::Status {
                status: 404,
                url: url.to_string(),
            });
        }
        self.downloads.push((url.to_string(), dest.to_path_buf()));
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        self.closed = true;
        Ok(())
    }
}

/// Report sink that keeps rows in memory.
#[derive(Debug, Default)]
pub struct MemoryReportWriter {
    pub rows: Option<Vec<ReportRow>>,
}

impl ReportWriter for MemoryReportWriter {
    async fn write(&mut self, rows: &[ReportRow]) -> Result<String, ReportError> {
        self.rows = Some(rows.to_vec());
        Ok("memory://news_data.csv".to_string())
    }
}
