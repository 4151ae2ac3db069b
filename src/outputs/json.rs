//! JSON run summary.

use crate::models::RunSummary;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write the run summary as pretty JSON.
///
/// # Arguments
///
/// * `summary` - Counts and paths for the finished run
/// * `path` - Target file; parent directories are created as needed
///
/// # Errors
///
/// Returns an error if the directory cannot be created, serialization fails,
/// or the file cannot be written.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_summary(summary: &RunSummary, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(summary)?;

    if let Some(dir) = path.parent() {
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create summary dir");
            return Err(e.into());
        }
    }

    fs::write(path, json).await?;
    info!("Wrote run summary");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_write_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run_summary.json");
        let summary = RunSummary {
            search_phrase: "tesla".to_string(),
            category: "Business".to_string(),
            category_applied: true,
            months: 2,
            cutoff: "2024-01-15".to_string(),
            items_found: 3,
            items_reported: 2,
            skipped: BTreeMap::from([("outside_window".to_string(), 1)]),
            report_path: "output/news_data.csv".to_string(),
        };

        write_summary(&summary, &path).await.unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["items_reported"], 2);
        assert_eq!(value["skipped"]["outside_window"], 1);
    }
}
