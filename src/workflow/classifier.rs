//! Sequential classification of registered files.
//!
//! Classification discovers what a file offers for redaction: column
//! headers for tabular and document files, detected entities for images,
//! transcript fields for audio. Files are processed strictly one at a
//! time, in registration order; a failure marks the file and the drain
//! moves on.

use crate::backend::RedactionBackend;
use crate::error::WorkflowError;
use crate::fields::FieldControl;
use crate::files::{FileKind, FileRecord};

use super::{FieldEntry, WorkflowController};

/// Drain the processing queue until it is empty. At most one drain runs
/// at a time; concurrent callers queue on the gate and pick up whatever
/// work remains. Returns the number of classification attempts made.
pub(crate) async fn drain_queue<B: RedactionBackend>(controller: &WorkflowController<B>) -> usize {
    let _permit = controller
        .classify_gate
        .acquire()
        .await
        .expect("Semaphore closed");

    let mut processed = 0;
    loop {
        let (record, output_path) = {
            let mut state = controller.state();
            let Some(index) = state.queue.pop_front() else {
                break;
            };
            state.in_flight = Some(index);
            let output = match state.output_path.trim() {
                "" => None,
                path => Some(path.to_string()),
            };
            (state.files[index].clone(), output)
        };

        tracing::info!(
            "[Classifier] Classifying #{} {} ({})",
            record.index,
            record.name,
            record.kind.as_str()
        );
        let outcome = classify_record(&controller.backend, &record, output_path.as_deref()).await;
        processed += 1;

        let mut state = controller.state();
        state.in_flight = None;

        // The registry may have been cleared and repopulated while the
        // request was out. Only write the result back if this index still
        // holds the same file.
        let still_registered = state
            .files
            .get(record.index)
            .map(|file| file.path == record.path)
            .unwrap_or(false);
        if !still_registered {
            tracing::debug!(
                "[Classifier] #{} was cleared mid-flight, dropping result",
                record.index
            );
            continue;
        }

        match outcome {
            Ok(fields) => {
                tracing::info!(
                    "[Classifier] #{} classified with {} field(s)",
                    record.index,
                    fields.len()
                );
                state.fields.insert(record.index, fields);
            }
            Err(error) => {
                tracing::warn!("[Classifier] #{} failed: {}", record.index, error);
                state.failures.insert(record.index, error.to_string());
            }
        }
    }
    processed
}

/// One classification attempt, dispatched on the file kind.
async fn classify_record<B: RedactionBackend>(
    backend: &B,
    record: &FileRecord,
    output_path: Option<&str>,
) -> Result<Vec<FieldEntry>, WorkflowError> {
    match record.kind {
        FileKind::Tabular => {
            let headers = backend.csv_headers(&record.path).await?;
            Ok(seed_entries(
                drop_row_identifier(headers),
                FieldControl::default(),
            ))
        }
        FileKind::Document => {
            let headers = backend.pdf_headers(&record.path).await?;
            Ok(seed_entries(
                drop_row_identifier(headers),
                FieldControl::default(),
            ))
        }
        FileKind::Image => {
            // Detected entities are redacted unless the user opts out, so
            // they start masked rather than untouched.
            let entities = backend.image_entities(&record.path, output_path).await?;
            Ok(seed_entries(entities, FieldControl::masked()))
        }
        FileKind::Audio => {
            let fields = backend.audio_fields(&record.path).await?;
            Ok(seed_entries(fields, FieldControl::default()))
        }
        FileKind::Unsupported => Err(WorkflowError::UnsupportedFile {
            name: record.name.clone(),
        }),
    }
}

/// The first extracted column is a row identifier, never offered for
/// redaction.
fn drop_row_identifier(headers: Vec<String>) -> Vec<String> {
    headers.into_iter().skip(1).collect()
}

fn seed_entries(fields: Vec<String>, template: FieldControl) -> Vec<FieldEntry> {
    fields
        .into_iter()
        .map(|id| FieldEntry {
            id,
            control: template.clone(),
        })
        .collect()
}
