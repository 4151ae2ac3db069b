//! Browsing capability used by the pipeline.
//!
//! The pipeline never talks to a page directly; it goes through the
//! [`Browser`] trait so a live implementation ([`http::HttpBrowser`]) and test
//! fakes are interchangeable.
//!
//! # Element addressing
//!
//! Elements are located with a [`Locator`] (a CSS selector plus an optional
//! "text contains" constraint). [`Browser::find_all`] returns
//! [`ElementHandle`]s that stay valid only until the page changes; children of
//! a handle are read with [`Browser::child_text`] and
//! [`Browser::child_attribute`].

pub mod http;

use crate::error::BrowserError;
use std::fmt;
use std::path::Path;

/// A CSS selector, optionally narrowed to elements whose text contains a
/// given string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub css: String,
    pub text: Option<String>,
}

impl Locator {
    pub fn css(css: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            text: None,
        }
    }

    pub fn containing_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(t) => write!(f, "`{}` containing {:?}", self.css, t),
            None => write!(f, "`{}`", self.css),
        }
    }
}

/// Opaque reference to an element found on the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementHandle {
    page: u64,
    index: usize,
}

impl ElementHandle {
    pub fn new(page: u64, index: usize) -> Self {
        Self { page, index }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// Navigation, lookup, interaction and download against a web page.
///
/// Waiting and timeouts are the implementation's concern; callers add none.
pub trait Browser {
    /// Load `url` as the current page.
    async fn open(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Type `text` into the field matched by `field` and submit it.
    async fn submit_text(&mut self, field: &Locator, text: &str) -> Result<(), BrowserError>;

    /// Block until an element matching `locator` is present on the page.
    async fn wait_for(&mut self, locator: &Locator) -> Result<(), BrowserError>;

    /// Whether the current page has an element matching `locator`.
    async fn contains(&mut self, locator: &Locator) -> Result<bool, BrowserError>;

    /// Click the first element matching `locator`.
    async fn click(&mut self, locator: &Locator) -> Result<(), BrowserError>;

    /// Handles for every element matching `locator`, in document order.
    async fn find_all(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>, BrowserError>;

    /// Text of the first descendant of `handle` matching `locator`.
    async fn child_text(
        &mut self,
        handle: ElementHandle,
        locator: &Locator,
    ) -> Result<Option<String>, BrowserError>;

    /// Attribute `name` of the first descendant of `handle` matching
    /// `locator`. URL-valued attributes come back absolute.
    async fn child_attribute(
        &mut self,
        handle: ElementHandle,
        locator: &Locator,
        name: &str,
    ) -> Result<Option<String>, BrowserError>;

    /// Save the resource at `url` to `dest`.
    async fn download(&mut self, url: &str, dest: &Path) -> Result<(), BrowserError>;

    /// Release the session. Further calls fail with [`BrowserError::Closed`].
    async fn close(&mut self) -> Result<(), BrowserError>;
}
