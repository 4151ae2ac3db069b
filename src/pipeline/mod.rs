//! The search → extract → filter → score → fetch → aggregate pipeline.
//!
//! # Stages
//!
//! | Stage | Module | Failure scope |
//! |-------|--------|---------------|
//! | Open site, search | [`query`] | fatal |
//! | Category filter | [`query`] | logged, run continues unfiltered |
//! | Extract fields | [`extract`] | item skipped |
//! | Recency cutoff | [`recency`] | item skipped |
//! | Phrase count, money flag | [`metrics`] | cannot fail |
//! | Image download | [`assets`] | item skipped |
//! | Collect rows | [`aggregate`] | cannot fail |
//!
//! Items are processed one at a time, in page order. Whatever happens, the
//! browsing session is closed before [`Pipeline::run`] returns.

pub mod aggregate;
pub mod assets;
pub mod extract;
pub mod metrics;
pub mod query;
pub mod recency;

use crate::browser::{Browser, ElementHandle};
use crate::config::NewsQuery;
use crate::error::PipelineError;
use crate::models::{EnrichedArticle, ItemOutcome, ReportRow, RunSummary, SkipReason};
use crate::outputs::report::ReportWriter;
use crate::utils::truncate_for_log;
use aggregate::Aggregator;
use chrono::NaiveDate;
use metrics::Metrics;
use query::CategoryFilter;
use recency::RecencyWindow;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

/// Where a run is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    SiteOpened,
    Searched,
    CategoryFiltered,
    CategorySkipped,
    Gathering,
    Aggregated,
    Reported,
    Closed,
}

/// Everything a successful run produced.
#[derive(Debug)]
pub struct RunReport {
    pub rows: Vec<ReportRow>,
    pub summary: RunSummary,
}

/// One harvesting run over a browsing session.
pub struct Pipeline<'a, B: Browser, W: ReportWriter> {
    browser: &'a mut B,
    writer: &'a mut W,
    query: &'a NewsQuery,
    window: RecencyWindow,
    images_dir: PathBuf,
    states: Vec<RunState>,
}

impl<'a, B: Browser, W: ReportWriter> Pipeline<'a, B, W> {
    /// `today` anchors the recency window.
    pub fn new(
        browser: &'a mut B,
        writer: &'a mut W,
        query: &'a NewsQuery,
        images_dir: impl Into<PathBuf>,
        today: NaiveDate,
    ) -> Self {
        Self {
            browser,
            writer,
            query,
            window: RecencyWindow::new(query.months, today),
            images_dir: images_dir.into(),
            states: vec![RunState::Idle],
        }
    }

    /// States visited so far, in order.
    pub fn states(&self) -> &[RunState] {
        &self.states
    }

    fn enter(&mut self, state: RunState) {
        debug!(?state, "Run state");
        self.states.push(state);
    }

    /// Run the pipeline and close the browsing session.
    ///
    /// The session is closed whether or not the run succeeds, and
    /// [`RunState::Closed`] is always the last recorded state.
    ///
    /// # Returns
    ///
    /// The report rows and the run summary. Per-item problems only shrink
    /// the report and are counted in the summary.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::SiteOpen`] if the site cannot be opened
    /// - [`PipelineError::SearchFailure`] if the search or its results fail
    /// - [`PipelineError::Listing`] if the results cannot be listed
    /// - [`PipelineError::Report`] if the report cannot be written
    #[instrument(
        level = "info",
        skip_all,
        fields(phrase = %self.query.search_phrase, months = self.query.months)
    )]
    pub async fn run(&mut self) -> Result<RunReport, PipelineError> {
        let result = self.run_session().await;
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "Failed to close browser session");
        }
        self.enter(RunState::Closed);
        result
    }

    async fn run_session(&mut self) -> Result<RunReport, PipelineError> {
        query::open_site(self.browser, self.query).await?;
        self.enter(RunState::SiteOpened);

        query::search(self.browser, self.query).await?;
        self.enter(RunState::Searched);

        let category = query::filter_by_category(self.browser, self.query).await;
        self.enter(match category {
            CategoryFilter::Applied => RunState::CategoryFiltered,
            CategoryFilter::NotRequested | CategoryFilter::NotFound => RunState::CategorySkipped,
        });

        let handles = query::list_articles(self.browser).await?;
        self.enter(RunState::Gathering);
        info!(
            months = self.query.months,
            cutoff = %self.window.cutoff(),
            "Gathering news data"
        );

        let mut aggregator = Aggregator::default();
        for (index, handle) in handles.iter().copied().enumerate() {
            let outcome = self.process_item(handle).await;
            log_outcome(index, &outcome);
            aggregator.record(index, outcome);
        }
        self.enter(RunState::Aggregated);
        info!(
            found = aggregator.seen(),
            reported = aggregator.articles().len(),
            skipped = aggregator.skipped().len(),
            "Gathered news data"
        );

        let rows = aggregator.rows();
        let report_path = self.writer.write(&rows).await?;
        self.enter(RunState::Reported);

        let summary = RunSummary {
            search_phrase: self.query.search_phrase.clone(),
            category: self.query.category.clone(),
            category_applied: category == CategoryFilter::Applied,
            months: self.query.months,
            cutoff: self.window.cutoff().to_string(),
            items_found: aggregator.seen(),
            items_reported: rows.len(),
            skipped: aggregator.skip_counts(),
            report_path,
        };
        Ok(RunReport { rows, summary })
    }

    async fn process_item(&mut self, handle: ElementHandle) -> ItemOutcome {
        match self.enrich(handle).await {
            Ok(article) => ItemOutcome::Admitted(article),
            Err(reason) => ItemOutcome::Skipped(reason),
        }
    }

    async fn enrich(&mut self, handle: ElementHandle) -> Result<EnrichedArticle, SkipReason> {
        let article = extract::extract(self.browser, handle).await?;
        self.window.check(&article)?;
        let metrics = Metrics::compute(&article, &self.query.search_phrase);
        let image_filename =
            assets::fetch_image(self.browser, &article.image_url, &self.images_dir).await?;

        Ok(EnrichedArticle {
            article,
            image_filename,
            phrase_count: metrics.phrase_count,
            contains_money: metrics.contains_money,
        })
    }
}

fn log_outcome(index: usize, outcome: &ItemOutcome) {
    match outcome {
        ItemOutcome::Admitted(a) => info!(
            index,
            title = %truncate_for_log(&a.article.title, 80),
            phrase_count = a.phrase_count,
            contains_money = a.contains_money,
            "Collected news item"
        ),
        ItemOutcome::Skipped(reason @ SkipReason::OutsideWindow { .. }) => {
            info!(index, %reason, "News item older than window")
        }
        ItemOutcome::Skipped(reason) => {
            warn!(index, kind = reason.kind(), %reason, "Error processing a news item; skipping")
        }
    }
}
