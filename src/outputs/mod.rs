//! Run artifacts written after the pipeline finishes.
//!
//! # Submodules
//!
//! - [`report`]: the six-column tabular report (CSV)
//! - [`json`]: a JSON summary of the run
//!
//! # Output Structure
//!
//! ```text
//! output/
//! ├── images/
//! │   └── <image basename>...
//! ├── news_data.csv
//! └── run_summary.json
//! ```

pub mod json;
pub mod report;
