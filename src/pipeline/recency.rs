//! Recency cutoff.
//!
//! A "month" is a fixed 30 days; the window is not calendar-month aware.

use crate::models::{ExtractedArticle, SkipReason};
use chrono::{NaiveDate, TimeDelta};

pub const DAYS_PER_MONTH: i64 = 30;

/// Admits articles published on or after `today - 30 * months` days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyWindow {
    cutoff: NaiveDate,
}

impl RecencyWindow {
    pub fn new(months: u32, today: NaiveDate) -> Self {
        let cutoff = TimeDelta::try_days(DAYS_PER_MONTH * i64::from(months))
            .and_then(|span| today.checked_sub_signed(span))
            .unwrap_or(NaiveDate::MIN);
        Self { cutoff }
    }

    pub fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }

    pub fn admits(&self, published: NaiveDate) -> bool {
        published >= self.cutoff
    }

    pub fn check(&self, article: &ExtractedArticle) -> Result<(), SkipReason> {
        if self.admits(article.published_date) {
            Ok(())
        } else {
            Err(SkipReason::OutsideWindow {
                published: article.published_date,
                cutoff: self.cutoff,
            })
        }
    }
}
