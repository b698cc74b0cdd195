//! The workflow controller.
//!
//! Owns the file registry, the processing queue, the per-file field
//! configuration, the active selection, and the last submission record.
//! Callers never touch these directly: registration and the synchronous
//! mutation API go through `&self` methods that lock the state for the
//! duration of the call, and the two async passes (classification drain,
//! batch submission) copy what they need out of the lock before awaiting.

use std::collections::{HashMap, VecDeque};
use std::ops::Range;
use std::sync::{Mutex, MutexGuard};

use tokio::sync::Semaphore;

use super::{
    classifier, project_selection, submitter, FieldEntry, FieldView, FileStatus, FileStatusView,
    ManifestEntry, SubmissionRecord, WorkflowSnapshot,
};
use crate::backend::{HttpBackend, RedactionBackend};
use crate::config::BackendConfig;
use crate::error::{Result, WorkflowError};
use crate::fields::{display_name, FieldControl, RedactionMode};
use crate::files::{FileDescriptor, FileKind, FileRecord};

/// Everything the controller owns, behind one mutex.
///
/// Invariants: queue indices always refer to entries of `files`; an index
/// sits in the queue at most once and never while in flight; `fields` and
/// `failures` are disjoint; `active` refers to a registered file or is
/// `None`.
#[derive(Default)]
pub(crate) struct WorkflowState {
    pub files: Vec<FileRecord>,
    pub queue: VecDeque<usize>,
    pub in_flight: Option<usize>,
    pub fields: HashMap<usize, Vec<FieldEntry>>,
    pub failures: HashMap<usize, String>,
    pub active: Option<usize>,
    pub folder_path: String,
    pub output_path: String,
    pub last_submission: Option<SubmissionRecord>,
}

impl WorkflowState {
    pub fn control_mut(&mut self, index: usize, field: &str) -> Option<&mut FieldControl> {
        self.fields
            .get_mut(&index)?
            .iter_mut()
            .find(|entry| entry.id == field)
            .map(|entry| &mut entry.control)
    }

    pub fn status_of(&self, index: usize) -> FileStatus {
        if self.failures.contains_key(&index) {
            FileStatus::Failed
        } else if self.fields.contains_key(&index) {
            FileStatus::Classified
        } else if self.in_flight == Some(index) {
            FileStatus::Classifying
        } else {
            FileStatus::Pending
        }
    }
}

/// Orchestrates the whole redaction workflow against one backend.
pub struct WorkflowController<B: RedactionBackend> {
    pub(crate) backend: B,
    pub(crate) inner: Mutex<WorkflowState>,
    /// Admits one classification drain at a time.
    pub(crate) classify_gate: Semaphore,
    /// Admits one submission run at a time, independent of the classifier.
    pub(crate) submit_gate: Semaphore,
}

impl WorkflowController<HttpBackend> {
    /// Controller wired to the HTTP redaction service.
    pub fn connect(config: BackendConfig) -> Self {
        Self::new(HttpBackend::new(config))
    }
}

impl<B: RedactionBackend> WorkflowController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            inner: Mutex::new(WorkflowState::default()),
            classify_gate: Semaphore::new(1),
            submit_gate: Semaphore::new(1),
        }
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, WorkflowState> {
        self.inner.lock().expect("workflow state poisoned")
    }

    // --- Registration ---

    /// Append files to the registry and enqueue them for classification.
    /// Returns the range of newly assigned indices. The first registration
    /// of the session also becomes the active file.
    pub fn register(&self, descriptors: Vec<FileDescriptor>) -> Range<usize> {
        let mut state = self.state();
        let start = state.files.len();

        for descriptor in descriptors {
            let index = state.files.len();
            let record = FileRecord::from_descriptor(index, descriptor);
            tracing::debug!(
                "[Workflow] Registered #{} {} ({})",
                index,
                record.name,
                record.kind.as_str()
            );
            state.files.push(record);
            state.queue.push_back(index);
        }

        let end = state.files.len();
        if end > start {
            if state.active.is_none() {
                state.active = Some(start);
            }
            tracing::info!(
                "[Workflow] Registered {} file(s), queue depth {}",
                end - start,
                state.queue.len() + usize::from(state.in_flight.is_some())
            );
        }
        start..end
    }

    /// Register every supported file the backend lists under a folder.
    /// The folder also becomes the session input path used by tabular
    /// redaction payloads.
    pub async fn register_from_folder(&self, folder_path: &str) -> Result<Range<usize>> {
        let folder = folder_path.trim();
        if folder.is_empty() {
            return Err(WorkflowError::MissingFolderPath);
        }

        {
            let mut state = self.state();
            state.folder_path = folder.to_string();
        }

        tracing::info!("[Workflow] Listing folder {}", folder);
        let listed = self.backend.list_folder(folder).await?;

        let supported: Vec<FileDescriptor> = listed
            .into_iter()
            .map(FileDescriptor::from_path)
            .filter(|descriptor| FileKind::from_name(&descriptor.name).is_supported())
            .collect();

        if supported.is_empty() {
            return Err(WorkflowError::NoSupportedFiles {
                folder: folder.to_string(),
            });
        }

        Ok(self.register(supported))
    }

    // --- Session paths ---

    pub fn set_output_path(&self, path: &str) {
        self.state().output_path = path.to_string();
    }

    pub fn set_folder_path(&self, path: &str) {
        self.state().folder_path = path.to_string();
    }

    // --- Field configuration (all no-ops without an active file) ---

    /// Flip a field's visibility on the active file.
    pub fn toggle_visible(&self, field: &str) {
        let mut state = self.state();
        let Some(index) = state.active else { return };
        if let Some(control) = state.control_mut(index, field) {
            control.toggle_visible();
        }
    }

    /// Set a field's redaction mode on the active file. Radio semantics:
    /// the new mode replaces any previous one.
    pub fn set_mode(&self, field: &str, mode: RedactionMode) {
        let mut state = self.state();
        let Some(index) = state.active else { return };
        if let Some(control) = state.control_mut(index, field) {
            control.set_mode(mode);
        }
    }

    /// Replace a field's prompt on the active file, verbatim.
    pub fn set_prompt(&self, field: &str, text: &str) {
        let mut state = self.state();
        let Some(index) = state.active else { return };
        if let Some(control) = state.control_mut(index, field) {
            control.prompt = text.to_string();
        }
    }

    /// Make a file the active one. Only classified files can be selected;
    /// anything else is a no-op.
    pub fn select_file(&self, index: usize) {
        let mut state = self.state();
        if state.fields.contains_key(&index) {
            state.active = Some(index);
            tracing::debug!("[Workflow] Active file is now #{}", index);
        }
    }

    // --- Recovery and reset ---

    /// Re-enqueue a file whose classification failed. Returns whether the
    /// file was actually re-enqueued; files in any other state are left
    /// alone. Nothing is ever retried automatically.
    pub fn retry_classification(&self, index: usize) -> bool {
        let mut state = self.state();
        if !state.failures.contains_key(&index) {
            return false;
        }
        if state.queue.contains(&index) || state.in_flight == Some(index) {
            return false;
        }
        state.failures.remove(&index);
        state.queue.push_back(index);
        tracing::info!("[Workflow] Re-enqueued #{} for classification", index);
        true
    }

    /// Discard all client-side state: registry, queue, configuration,
    /// active selection, and the last submission record. Does not abort an
    /// in-flight request; a drain resuming afterwards finds the queue empty
    /// and stops. Session paths survive.
    pub fn clear(&self) {
        let mut state = self.state();
        state.files.clear();
        state.queue.clear();
        state.in_flight = None;
        state.fields.clear();
        state.failures.clear();
        state.active = None;
        state.last_submission = None;
        tracing::info!("[Workflow] Cleared all files and configuration");
    }

    // --- Read-only snapshots ---

    /// Files still awaiting classification, the in-flight one included.
    pub fn queue_depth(&self) -> usize {
        let state = self.state();
        state.queue.len() + usize::from(state.in_flight.is_some())
    }

    pub fn active_index(&self) -> Option<usize> {
        self.state().active
    }

    pub fn file_status(&self, index: usize) -> Option<FileStatus> {
        let state = self.state();
        if index >= state.files.len() {
            return None;
        }
        Some(state.status_of(index))
    }

    /// The active file's fields, in classification order, with display
    /// labels. Empty while nothing is active or classified.
    pub fn active_fields(&self) -> Vec<FieldView> {
        let state = self.state();
        let Some(index) = state.active else {
            return Vec::new();
        };
        state
            .fields
            .get(&index)
            .map(|entries| {
                entries
                    .iter()
                    .map(|entry| FieldView {
                        id: entry.id.clone(),
                        label: display_name(&entry.id),
                        control: entry.control.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn last_submission(&self) -> Option<SubmissionRecord> {
        self.state().last_submission.clone()
    }

    /// Full status view for progress rendering.
    pub fn snapshot(&self) -> WorkflowSnapshot {
        let state = self.state();
        let files = state
            .files
            .iter()
            .map(|record| FileStatusView {
                index: record.index,
                name: record.name.clone(),
                kind: record.kind,
                status: state.status_of(record.index),
                field_count: state
                    .fields
                    .get(&record.index)
                    .map(Vec::len)
                    .unwrap_or(0),
                error: state.failures.get(&record.index).cloned(),
            })
            .collect();

        WorkflowSnapshot {
            queue_depth: state.queue.len() + usize::from(state.in_flight.is_some()),
            in_flight: state.in_flight,
            active_index: state.active,
            files,
            last_submission: state.last_submission.clone(),
        }
    }

    /// What submission would send, per classified file, in registration
    /// order: visible fields only, names stripped.
    pub fn selection_manifest(&self) -> Vec<ManifestEntry> {
        let state = self.state();
        state
            .files
            .iter()
            .filter_map(|record| {
                state.fields.get(&record.index).map(|entries| ManifestEntry {
                    file_name: record.name.clone(),
                    fields: project_selection(entries),
                })
            })
            .collect()
    }

    // --- Async passes ---

    /// Drain the processing queue, one classification at a time. Safe to
    /// call from several tasks; a second caller waits for the running drain
    /// and then finds whatever is left. Returns the number of attempts made
    /// by this call.
    pub async fn process_pending(&self) -> usize {
        classifier::drain_queue(self).await
    }

    /// Run one batch submission over all registered files.
    pub async fn submit(&self) -> Result<SubmissionRecord> {
        submitter::run_batch(self).await
    }
}
