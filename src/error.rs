//! Workflow error taxonomy.
//!
//! Four classes of failure, each terminal for its own unit of work:
//! - unsupported file type: one file, recorded at classification
//! - backend failure during classification: one file
//! - backend failure during submission: the whole batch run
//! - invalid workflow state: rejected before any network call

use crate::backend::BackendError;

pub type Result<T> = std::result::Result<T, WorkflowError>;

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// Submission requested with an empty registry.
    #[error("no files registered")]
    NoFilesRegistered,

    /// Submission requested before an output location was set.
    #[error("no output path set")]
    MissingOutputPath,

    /// Folder registration requested with a blank folder path.
    #[error("no folder path provided")]
    MissingFolderPath,

    /// Folder listing succeeded but contained no supported files.
    #[error("no supported files found in {folder}")]
    NoSupportedFiles { folder: String },

    /// The file's extension maps to no classification endpoint.
    #[error("unsupported file type: {name}")]
    UnsupportedFile { name: String },

    /// A backend call failed outside a batch run (listing, classification).
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A redaction call failed mid-batch; the run is aborted.
    #[error("redaction of {file} failed: {source}")]
    SubmissionFailed {
        file: String,
        #[source]
        source: BackendError,
    },
}

impl WorkflowError {
    /// Whether the error was raised by workflow validation, before any
    /// request went out.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WorkflowError::NoFilesRegistered
                | WorkflowError::MissingOutputPath
                | WorkflowError::MissingFolderPath
        )
    }
}
