//! Batch redaction submission.
//!
//! One run walks every registered file in registration order and sends
//! the kind-specific redaction request for it. The first failure aborts
//! the rest of the batch; artifacts already produced stay on the record.
//! At most one run is in flight at a time.

use std::collections::HashMap;

use crate::backend::types::{
    AudioRedactionRequest, CsvRedactionRequest, ImageRedactionRequest, SelectedField, PINK_FILL,
};
use crate::backend::{BackendError, RedactionBackend};
use crate::error::{Result, WorkflowError};
use crate::files::{FileKind, FileRecord};

use super::{project_selection, SubmissionRecord, WorkflowController};

pub(crate) async fn run_batch<B: RedactionBackend>(
    controller: &WorkflowController<B>,
) -> Result<SubmissionRecord> {
    let _permit = controller
        .submit_gate
        .acquire()
        .await
        .expect("Semaphore closed");

    // Validate and snapshot under one lock. Validation failures return
    // before a run record exists, so nothing reaches the backend.
    let (files, selections, output_path, input_path, mut record) = {
        let mut state = controller.state();
        if state.files.is_empty() {
            return Err(WorkflowError::NoFilesRegistered);
        }
        let output_path = state.output_path.trim().to_string();
        if output_path.is_empty() {
            return Err(WorkflowError::MissingOutputPath);
        }

        let selections: HashMap<usize, Vec<SelectedField>> = state
            .fields
            .iter()
            .map(|(&index, entries)| (index, project_selection(entries)))
            .collect();

        let record = SubmissionRecord::start();
        state.last_submission = Some(record.clone());
        (
            state.files.clone(),
            selections,
            output_path,
            state.folder_path.clone(),
            record,
        )
    };

    tracing::info!(
        "[Submitter] Run {} over {} file(s)",
        record.id,
        files.len()
    );

    for file in &files {
        // Files that never classified submit with an empty selection.
        let selection = selections.get(&file.index).cloned().unwrap_or_default();
        match dispatch_file(&controller.backend, file, selection, &output_path, &input_path).await {
            Ok(Some(artifact)) => {
                tracing::info!("[Submitter] {} produced {}", file.name, artifact);
                record.artifacts.push(artifact);
                controller.state().last_submission = Some(record.clone());
            }
            Ok(None) => {}
            Err(source) => {
                let error = WorkflowError::SubmissionFailed {
                    file: file.name.clone(),
                    source,
                };
                record.mark_failed(error.to_string());
                tracing::warn!("[Submitter] Run {} aborted: {}", record.id, error);
                controller.state().last_submission = Some(record.clone());
                return Err(error);
            }
        }
    }

    record.mark_completed();
    tracing::info!("[Submitter] Run {}: {}", record.id, record.summary());
    controller.state().last_submission = Some(record.clone());
    Ok(record)
}

/// Send the redaction request matching the file kind. `Ok(None)` means the
/// file was skipped or the service reported no artifact.
async fn dispatch_file<B: RedactionBackend>(
    backend: &B,
    file: &FileRecord,
    selection: Vec<SelectedField>,
    output_path: &str,
    input_path: &str,
) -> std::result::Result<Option<String>, BackendError> {
    match file.kind {
        FileKind::Tabular => {
            let request = CsvRedactionRequest {
                file_name: file.name.clone(),
                headers: selection,
                output_path: output_path.to_string(),
                input_path: input_path.to_string(),
            };
            backend.redact_csv(&request).await
        }
        FileKind::Image => {
            let entities = selection.into_iter().map(|field| field.name).collect();
            let request = ImageRedactionRequest {
                file_path: file.path.clone(),
                entities,
                fill_color: PINK_FILL,
            };
            backend.redact_image(&request).await
        }
        FileKind::Audio => {
            let request = AudioRedactionRequest {
                file_path: file.path.clone(),
                output_path: output_path.to_string(),
            };
            backend.redact_audio(&request).await
        }
        FileKind::Document => {
            // No document redaction service exists yet. Skipped, not failed.
            tracing::debug!("[Submitter] Skipping document {}", file.name);
            Ok(None)
        }
        FileKind::Unsupported => {
            tracing::debug!("[Submitter] Skipping unsupported file {}", file.name);
            Ok(None)
        }
    }
}
