//! Work-queue capability: where job input comes from and where completion is
//! reported.
//!
//! The pipeline only sees the [`WorkQueue`] trait. [`LocalWorkQueue`] is the
//! file-backed implementation used by the binary; it understands the local
//! work item layout used by RPA runners:
//!
//! ```json
//! [{ "payload": { "search_phrase": "tesla", "months": 2 } }]
//! ```
//!
//! A single `{"payload": {...}}` object or a bare payload object is accepted
//! too.

use crate::error::WorkQueueError;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Input variables of one job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkItem {
    payload: Map<String, Value>,
}

impl WorkItem {
    /// Accepts either `{"payload": {...}}` or the payload object itself.
    pub fn from_payload(value: Value) -> Result<Self, WorkQueueError> {
        let value = match value {
            Value::Object(mut map) if map.contains_key("payload") => {
                map.remove("payload").unwrap_or(Value::Null)
            }
            other => other,
        };
        match value {
            Value::Object(payload) => Ok(WorkItem { payload }),
            other => Err(WorkQueueError::Malformed(format!(
                "payload must be an object, got {other}"
            ))),
        }
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.payload.get(name)
    }
}

/// What a successful run hands back to the queue.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompletionPayload {
    pub report_path: String,
    pub summary_path: String,
    pub rows: usize,
}

/// Source of job input and sink for completion status.
pub trait WorkQueue {
    /// Fetch the input work item for this run.
    async fn input(&mut self) -> Result<WorkItem, WorkQueueError>;

    /// Mark the current work item as done. Only called after a fully
    /// successful run.
    async fn complete(&mut self, payload: CompletionPayload) -> Result<(), WorkQueueError>;
}

/// Work items backed by local JSON files.
#[derive(Debug, Clone)]
pub struct LocalWorkQueue {
    input_path: PathBuf,
    output_path: PathBuf,
}

impl LocalWorkQueue {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
        }
    }
}

fn io_err(path: &Path, source: std::io::Error) -> WorkQueueError {
    WorkQueueError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl WorkQueue for LocalWorkQueue {
    #[instrument(level = "info", skip_all, fields(path = %self.input_path.display()))]
    async fn input(&mut self) -> Result<WorkItem, WorkQueueError> {
        let raw = fs::read_to_string(&self.input_path)
            .await
            .map_err(|e| io_err(&self.input_path, e))?;
        let value: Value = serde_json::from_str(&raw)?;

        let first = match value {
            Value::Array(items) => items.into_iter().next().ok_or(WorkQueueError::NoInput)?,
            other => other,
        };
        let item = WorkItem::from_payload(first)?;
        info!(variables = item.payload.len(), "Loaded input work item");
        Ok(item)
    }

    #[instrument(level = "info", skip_all, fields(path = %self.output_path.display()))]
    async fn complete(&mut self, payload: CompletionPayload) -> Result<(), WorkQueueError> {
        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| io_err(parent, e))?;
            }
        }
        let body = json!([{ "payload": payload, "state": "COMPLETED" }]);
        fs::write(&self.output_path, serde_json::to_vec_pretty(&body)?)
            .await
            .map_err(|e| io_err(&self.output_path, e))?;
        info!(rows = payload.rows, "Work item completed");
        Ok(())
    }
}
