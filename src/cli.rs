//! Command-line interface definitions for News Harvester.
//!
//! Every option can also come from an environment variable, so the binary
//! runs unchanged under an RPA runner that only sets the work item paths.

use clap::Parser;

const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Command-line arguments for the News Harvester application.
///
/// # Examples
///
/// ```sh
/// # Local run against a work item file
/// news_harvester --input-work-item devdata/work-items-in/input.json
///
/// # As launched by a runner
/// RPA_INPUT_WORKITEM_PATH=/tmp/in.json RPA_OUTPUT_WORKITEM_PATH=/tmp/out.json news_harvester
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// JSON file holding the input work item
    #[arg(long, env = "RPA_INPUT_WORKITEM_PATH")]
    pub input_work_item: String,

    /// Where the completed work item is written
    #[arg(
        long,
        env = "RPA_OUTPUT_WORKITEM_PATH",
        default_value = "output/output-work-item.json"
    )]
    pub output_work_item: String,

    /// Output directory for the report, summary and images
    #[arg(short, long, env = "NEWS_OUTPUT_DIR", default_value = "output")]
    pub output_dir: String,

    /// User-Agent sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}
