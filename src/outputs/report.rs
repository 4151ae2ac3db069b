//! Tabular report sink.

use crate::error::ReportError;
use crate::models::{REPORT_COLUMNS, ReportRow};
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

/// Serializes report rows somewhere. Returns where they went.
pub trait ReportWriter {
    async fn write(&mut self, rows: &[ReportRow]) -> Result<String, ReportError>;
}

/// Writes rows as CSV with a header line, overwriting any previous report.
#[derive(Debug, Clone)]
pub struct CsvReportWriter {
    path: PathBuf,
}

impl CsvReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Render rows as CSV bytes, header first.
pub fn to_csv(rows: &[ReportRow]) -> Result<Vec<u8>, ReportError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(REPORT_COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.into_inner().map_err(|e| ReportError::Io {
        path: "<buffer>".to_string(),
        source: e.into_error(),
    })
}

impl ReportWriter for CsvReportWriter {
    #[instrument(level = "info", skip_all, fields(path = %self.path.display(), rows = rows.len()))]
    async fn write(&mut self, rows: &[ReportRow]) -> Result<String, ReportError> {
        let bytes = to_csv(rows)?;
        let io_err = |source| ReportError::Io {
            path: self.path.display().to_string(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(io_err)?;
            }
        }
        fs::write(&self.path, bytes).await.map_err(io_err)?;
        info!("Saved news data to report");
        Ok(self.path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str, money: bool) -> ReportRow {
        ReportRow {
            title: title.to_string(),
            date: "Mar 14, 2024".to_string(),
            description: "Shares rose, analysts said".to_string(),
            image_filename: "output/images/a.jpg".to_string(),
            search_phrase_count: 2,
            contains_money: money,
        }
    }

    #[test]
    fn test_csv_header_and_quoting() {
        let csv = String::from_utf8(to_csv(&[row("Tesla, again", true)]).unwrap()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Title,Date,Description,Image Filename,Search Phrase Count,Contains Money")
        );
        assert_eq!(
            lines.next(),
            Some(concat!(
                r#""Tesla, again","Mar 14, 2024","Shares rose, analysts said","#,
                "output/images/a.jpg,2,True"
            ))
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_empty_report_has_header_only() {
        let csv = String::from_utf8(to_csv(&[]).unwrap()).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_writer_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("news_data.csv");
        let mut writer = CsvReportWriter::new(&path);

        let written = writer.write(&[row("a", false), row("b", true)]).await.unwrap();
        assert_eq!(written, path.display().to_string());

        let body = std::fs::read_to_string(&path).unwrap();
        assert_eq!(body.lines().count(), 3);
        assert!(body.lines().nth(1).unwrap().ends_with(",False"));
    }
}
