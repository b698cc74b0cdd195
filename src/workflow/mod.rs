//! The redaction workflow: registration, sequential classification,
//! per-field configuration, and batch submission.
//!
//! [`WorkflowController`] owns all state; the classifier and submitter
//! passes live in their own submodules and run under separate size-one
//! admission gates, so at most one classification call and one submission
//! run are ever in flight.

mod classifier;
mod controller;
mod submitter;

pub use controller::WorkflowController;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::types::SelectedField;
use crate::fields::{display_name, FieldControl};
use crate::files::FileKind;

/// Classification lifecycle of one registered file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// Waiting in the processing queue
    Pending,
    /// Classification call currently in flight
    Classifying,
    /// Fields available for configuration
    Classified,
    /// Classification failed; terminal until explicitly retried
    Failed,
}

/// Outcome of a batch submission run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Run is currently executing
    Running,
    /// Run finished and produced at least one artifact
    Completed,
    /// Run finished without producing any artifact
    CompletedEmpty,
    /// Run aborted on a failed redaction call
    Failed,
}

/// Record of one batch submission run. The controller retains the most
/// recent record for the status surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    /// Unique run identifier
    pub id: Uuid,
    /// Current status
    pub status: SubmissionStatus,
    /// Artifact filenames, in production order
    pub artifacts: Vec<String>,
    /// Error message if the run failed
    pub error: Option<String>,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run finished, completed or failed
    pub finished_at: Option<DateTime<Utc>>,
}

impl SubmissionRecord {
    pub(crate) fn start() -> Self {
        Self {
            id: Uuid::new_v4(),
            status: SubmissionStatus::Running,
            artifacts: Vec::new(),
            error: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Mark the run finished; zero artifacts is its own outcome.
    pub(crate) fn mark_completed(&mut self) {
        self.status = if self.artifacts.is_empty() {
            SubmissionStatus::CompletedEmpty
        } else {
            SubmissionStatus::Completed
        };
        self.finished_at = Some(Utc::now());
    }

    pub(crate) fn mark_failed(&mut self, error: String) {
        self.status = SubmissionStatus::Failed;
        self.error = Some(error);
        self.finished_at = Some(Utc::now());
    }

    /// One status line for the progress surface.
    pub fn summary(&self) -> String {
        match self.status {
            SubmissionStatus::Running => "submission in progress".to_string(),
            SubmissionStatus::Completed => {
                format!("produced {} artifact(s)", self.artifacts.len())
            }
            SubmissionStatus::CompletedEmpty => {
                "files processed, check the output folder".to_string()
            }
            SubmissionStatus::Failed => format!(
                "submission failed: {}",
                self.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}

/// One classified field with its configuration. Order matches the
/// classification reply, so every field has exactly one control by
/// construction.
#[derive(Debug, Clone)]
pub(crate) struct FieldEntry {
    pub id: String,
    pub control: FieldControl,
}

/// A field as presented for editing: the raw id is the mutation key, the
/// label has the ordinal prefix stripped.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub id: String,
    pub label: String,
    pub control: FieldControl,
}

/// Per-file line of the status surface.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStatusView {
    pub index: usize,
    pub name: String,
    pub kind: FileKind,
    pub status: FileStatus,
    /// Classified field count; 0 while pending or failed
    pub field_count: usize,
    pub error: Option<String>,
}

/// Read-only view of the whole workflow, for progress indicators.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSnapshot {
    /// Files awaiting classification, the in-flight one included
    pub queue_depth: usize,
    pub in_flight: Option<usize>,
    pub active_index: Option<usize>,
    pub files: Vec<FileStatusView>,
    pub last_submission: Option<SubmissionRecord>,
}

/// Review projection of one classified file: what submission would send.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub file_name: String,
    pub fields: Vec<SelectedField>,
}

/// Project a file's controls to the submission payload: visible fields
/// only, names stripped, unset modes as null.
pub(crate) fn project_selection(entries: &[FieldEntry]) -> Vec<SelectedField> {
    entries
        .iter()
        .filter(|entry| entry.control.visible)
        .map(|entry| SelectedField {
            name: display_name(&entry.id),
            mode: entry.control.wire_mode(),
            prompt: entry.control.prompt.clone(),
        })
        .collect()
}
