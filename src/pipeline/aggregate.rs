//! Ordered collection of per-item outcomes.

use crate::models::{EnrichedArticle, ItemOutcome, ReportRow, SkipReason};
use itertools::Itertools;
use std::collections::BTreeMap;

/// Keeps admitted articles in the order they were seen and remembers why the
/// others were skipped. No sorting, deduplication or capping.
#[derive(Debug, Default)]
pub struct Aggregator {
    articles: Vec<EnrichedArticle>,
    skipped: Vec<(usize, SkipReason)>,
}

impl Aggregator {
    pub fn record(&mut self, index: usize, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Admitted(article) => self.articles.push(article),
            ItemOutcome::Skipped(reason) => self.skipped.push((index, reason)),
        }
    }

    pub fn articles(&self) -> &[EnrichedArticle] {
        &self.articles
    }

    pub fn skipped(&self) -> &[(usize, SkipReason)] {
        &self.skipped
    }

    pub fn seen(&self) -> usize {
        self.articles.len() + self.skipped.len()
    }

    pub fn rows(&self) -> Vec<ReportRow> {
        self.articles.iter().map(ReportRow::from).collect()
    }

    /// Number of skipped items per [`SkipReason::kind`].
    pub fn skip_counts(&self) -> BTreeMap<String, usize> {
        self.skipped
            .iter()
            .map(|(_, reason)| reason.kind())
            .counts()
            .into_iter()
            .map(|(kind, n)| (kind.to_string(), n))
            .collect()
    }
}
