//! Static-HTML browsing over HTTP.
//!
//! [`HttpBrowser`] fetches pages with `reqwest` and queries them with
//! `scraper` CSS selectors. It does not run JavaScript: "typing and
//! submitting" a search field builds the GET request its enclosing form would
//! send, and "clicking" a link follows its `href`. Pages are complete once
//! fetched, so [`Browser::wait_for`] is a single presence check.

use super::{Browser, ElementHandle, Locator};
use crate::error::BrowserError;
use scraper::{ElementRef, Html, Selector};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info, instrument};
use url::Url;

/// Name given to a search field that has no `name` attribute.
const DEFAULT_FIELD_NAME: &str = "q";

#[derive(Debug)]
struct Page {
    url: Url,
    html: String,
}

/// A browsing session backed by plain HTTP requests.
#[derive(Debug)]
pub struct HttpBrowser {
    client: reqwest::Client,
    page: Option<Page>,
    /// Outer HTML of the elements returned by the last `find_all`.
    elements: Vec<String>,
    /// Bumped on every navigation and every `find_all`; handles from an
    /// older generation are stale.
    generation: u64,
    closed: bool,
}

impl HttpBrowser {
    pub fn new(user_agent: &str) -> Result<Self, BrowserError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            page: None,
            elements: Vec::new(),
            generation: 0,
            closed: false,
        })
    }

    fn ensure_open(&self) -> Result<(), BrowserError> {
        if self.closed {
            Err(BrowserError::Closed)
        } else {
            Ok(())
        }
    }

    fn current(&self) -> Result<&Page, BrowserError> {
        self.ensure_open()?;
        self.page.as_ref().ok_or(BrowserError::NoPage)
    }

    fn set_page(&mut self, url: Url, html: String) {
        self.page = Some(Page { url, html });
        self.elements.clear();
        self.generation += 1;
    }

    fn element(&self, handle: ElementHandle) -> Result<&str, BrowserError> {
        self.ensure_open()?;
        if handle.page() != self.generation {
            return Err(BrowserError::StaleHandle);
        }
        self.elements
            .get(handle.index())
            .map(String::as_str)
            .ok_or(BrowserError::StaleHandle)
    }

    #[instrument(level = "debug", skip_all, fields(url = %url))]
    async fn navigate(&mut self, url: Url) -> Result<(), BrowserError> {
        self.ensure_open()?;
        let resp = self.client.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(BrowserError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        // Redirects land us somewhere else; relative links resolve from there.
        let final_url = resp.url().clone();
        let html = resp.text().await?;
        debug!(bytes = html.len(), %final_url, "Loaded page");
        self.set_page(final_url, html);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn with_page(url: &str, html: &str) -> Self {
        let mut browser = Self::new("test").unwrap();
        browser.set_page(Url::parse(url).unwrap(), html.to_string());
        browser
    }
}

fn parse_selector(css: &str) -> Result<Selector, BrowserError> {
    Selector::parse(css).map_err(|e| BrowserError::InvalidSelector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// Visible text of an element with runs of whitespace collapsed.
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn matching<'a>(
    doc: &'a Html,
    selector: &'a Selector,
    locator: &'a Locator,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    doc.select(selector).filter(move |el| match &locator.text {
        Some(t) => element_text(*el).contains(t.as_str()),
        None => true,
    })
}

fn first_match<'a>(
    doc: &'a Html,
    selector: &'a Selector,
    locator: &'a Locator,
) -> Result<ElementRef<'a>, BrowserError> {
    matching(doc, selector, locator)
        .next()
        .ok_or_else(|| BrowserError::ElementNotFound(locator.to_string()))
}

fn join_url(base: &Url, href: &str) -> Result<Url, BrowserError> {
    base.join(href.trim()).map_err(|e| BrowserError::InvalidUrl {
        url: href.to_string(),
        reason: e.to_string(),
    })
}

/// The GET request the form around `field` would send with `text` typed in.
fn search_request(
    html: &str,
    base: &Url,
    field: &Locator,
    text: &str,
) -> Result<Url, BrowserError> {
    let doc = Html::parse_document(html);
    let selector = parse_selector(&field.css)?;
    let input = first_match(&doc, &selector, field)?;
    let name = input
        .value()
        .attr("name")
        .unwrap_or(DEFAULT_FIELD_NAME)
        .to_string();

    let form = input
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "form")
        .ok_or_else(|| BrowserError::NotActionable(field.to_string()))?;

    let mut target = join_url(base, form.value().attr("action").unwrap_or(""))?;
    let hidden = parse_selector(r#"input[type="hidden"][name]"#)?;
    {
        let mut pairs = target.query_pairs_mut();
        pairs.clear();
        for h in form.select(&hidden) {
            if let Some(n) = h.value().attr("name") {
                pairs.append_pair(n, h.value().attr("value").unwrap_or(""));
            }
        }
        pairs.append_pair(&name, text);
    }
    target.set_fragment(None);
    Ok(target)
}

/// Where clicking the first element matching `locator` leads.
fn link_target(html: &str, base: &Url, locator: &Locator) -> Result<Url, BrowserError> {
    let doc = Html::parse_document(html);
    let selector = parse_selector(&locator.css)?;
    let el = first_match(&doc, &selector, locator)?;
    let href = el
        .value()
        .attr("href")
        .ok_or_else(|| BrowserError::NotActionable(locator.to_string()))?;
    join_url(base, href)
}

fn page_contains(html: &str, locator: &Locator) -> Result<bool, BrowserError> {
    let doc = Html::parse_document(html);
    let selector = parse_selector(&locator.css)?;
    Ok(matching(&doc, &selector, locator).next().is_some())
}

fn outer_html_of_matches(html: &str, locator: &Locator) -> Result<Vec<String>, BrowserError> {
    let doc = Html::parse_document(html);
    let selector = parse_selector(&locator.css)?;
    Ok(matching(&doc, &selector, locator).map(|el| el.html()).collect())
}

fn fragment_child<T>(
    fragment: &str,
    locator: &Locator,
    read: impl Fn(ElementRef<'_>) -> Option<T>,
) -> Result<Option<T>, BrowserError> {
    let doc = Html::parse_fragment(fragment);
    let selector = parse_selector(&locator.css)?;
    Ok(matching(&doc, &selector, locator).next().and_then(read))
}

impl Browser for HttpBrowser {
    #[instrument(level = "info", skip(self))]
    async fn open(&mut self, url: &str) -> Result<(), BrowserError> {
        let url = Url::parse(url).map_err(|e| BrowserError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        self.navigate(url).await
    }

    #[instrument(level = "info", skip_all, fields(field = %field))]
    async fn submit_text(&mut self, field: &Locator, text: &str) -> Result<(), BrowserError> {
        let page = self.current()?;
        let target = search_request(&page.html, &page.url, field, text)?;
        info!(%target, "Submitting search form");
        self.navigate(target).await
    }

    async fn wait_for(&mut self, locator: &Locator) -> Result<(), BrowserError> {
        if self.contains(locator).await? {
            Ok(())
        } else {
            Err(BrowserError::ElementNotFound(locator.to_string()))
        }
    }

    async fn contains(&mut self, locator: &Locator) -> Result<bool, BrowserError> {
        page_contains(&self.current()?.html, locator)
    }

    #[instrument(level = "info", skip_all, fields(locator = %locator))]
    async fn click(&mut self, locator: &Locator) -> Result<(), BrowserError> {
        let page = self.current()?;
        let target = link_target(&page.html, &page.url, locator)?;
        self.navigate(target).await
    }

    async fn find_all(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>, BrowserError> {
        let found = outer_html_of_matches(&self.current()?.html, locator)?;
        self.generation += 1;
        self.elements = found;
        Ok((0..self.elements.len())
            .map(|i| ElementHandle::new(self.generation, i))
            .collect())
    }

    async fn child_text(
        &mut self,
        handle: ElementHandle,
        locator: &Locator,
    ) -> Result<Option<String>, BrowserError> {
        fragment_child(self.element(handle)?, locator, |el| Some(element_text(el)))
    }

    async fn child_attribute(
        &mut self,
        handle: ElementHandle,
        locator: &Locator,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        let value = fragment_child(self.element(handle)?, locator, |el| {
            el.value().attr(name).map(str::to_string)
        })?;
        match value {
            // An empty link would resolve to the page itself.
            Some(v) if matches!(name, "src" | "href") && v.trim().is_empty() => Ok(None),
            Some(v) if matches!(name, "src" | "href") => {
                let base = &self.current()?.url;
                Ok(Some(join_url(base, &v)?.to_string()))
            }
            other => Ok(other),
        }
    }

    #[instrument(level = "info", skip_all, fields(%url, dest = %dest.display()))]
    async fn download(&mut self, url: &str, dest: &Path) -> Result<(), BrowserError> {
        self.ensure_open()?;
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(BrowserError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let bytes = resp.bytes().await?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(dest, &bytes).await?;
        debug!(bytes = bytes.len(), "Saved download");
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        self.page = None;
        self.elements.clear();
        self.closed = true;
        info!("Browser session closed");
        Ok(())
    }
}
