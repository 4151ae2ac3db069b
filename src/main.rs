//! # News Harvester
//!
//! Searches a news site for a phrase, keeps the articles published within a
//! recency window, and writes a tabular report with two derived signals per
//! article: how often the search phrase appears and whether a dollar amount is
//! mentioned. Each article's image is downloaded alongside the report.
//!
//! ## Usage
//!
//! ```sh
//! news_harvester --input-work-item devdata/work-items-in/input.json
//! ```
//!
//! with a work item such as:
//!
//! ```json
//! [{"payload": {"search_phrase": "tesla", "news_category": "Business", "months": 2}}]
//! ```
//!
//! ## Architecture
//!
//! 1. **Input**: read the work item and validate it into a [`config::NewsQuery`]
//! 2. **Search**: open the site, search, optionally filter by category
//! 3. **Gather**: extract, date-filter, score and fetch images one article at a time
//! 4. **Output**: write `news_data.csv` and `run_summary.json`, then complete the work item
//!
//! The browsing session is closed on every path. The work item is only
//! completed when the whole run succeeds.

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod browser;
mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod pipeline;
#[cfg(test)]
mod testing;
mod utils;
mod workqueue;

use browser::http::HttpBrowser;
use cli::Cli;
use config::{NewsQuery, OutputPaths};
use outputs::{json, report::CsvReportWriter};
use pipeline::Pipeline;
use utils::ensure_writable_dir;
use workqueue::{CompletionPayload, LocalWorkQueue, WorkQueue};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_harvester starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Job input ----
    let mut queue = LocalWorkQueue::new(&args.input_work_item, &args.output_work_item);
    let item = queue.input().await?;
    let query = match NewsQuery::from_work_item(&item) {
        Ok(q) => q,
        Err(e) => {
            error!(error = %e, "Invalid work item");
            return Err(e.into());
        }
    };
    info!(
        phrase = %query.search_phrase,
        category = %query.category,
        months = query.months,
        url = %query.source_url,
        "Loaded news query"
    );

    let paths = OutputPaths::new(&args.output_dir);
    if let Err(e) = ensure_writable_dir(&paths.images_dir()).await {
        error!(
            path = %paths.images_dir().display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Run ----
    let mut browser = HttpBrowser::new(&args.user_agent)?;
    let mut writer = CsvReportWriter::new(paths.report_path());
    let today = Local::now().date_naive();

    let report = {
        let mut pipeline = Pipeline::new(
            &mut browser,
            &mut writer,
            &query,
            paths.images_dir(),
            today,
        );
        let result = pipeline.run().await;
        match result {
            Ok(report) => report,
            Err(e) => {
                error!(
                    error = %e,
                    states = ?pipeline.states(),
                    "Run aborted; work item left incomplete"
                );
                return Err(e.into());
            }
        }
    };

    // ---- Outputs ----
    let summary_path = paths.summary_path();
    if let Err(e) = json::write_summary(&report.summary, &summary_path).await {
        warn!(path = %summary_path.display(), error = %e, "Failed to write run summary");
    }

    queue
        .complete(CompletionPayload {
            report_path: report.summary.report_path.clone(),
            summary_path: summary_path.display().to_string(),
            rows: report.rows.len(),
        })
        .await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        rows = report.rows.len(),
        skipped = ?report.summary.skipped,
        "Execution complete"
    );

    Ok(())
}
