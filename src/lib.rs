//! Client-side orchestration for a file redaction service.
//!
//! Files are registered into a session, classified one at a time to
//! discover their redactable fields, configured per field, and finally
//! submitted as one batch of redaction requests. [`WorkflowController`]
//! is the entry point; everything else supports it.

pub mod backend;
pub mod config;
pub mod error;
pub mod fields;
pub mod files;
pub mod workflow;

pub use backend::{BackendError, HttpBackend, RedactionBackend};
pub use config::BackendConfig;
pub use error::{Result, WorkflowError};
pub use fields::{display_name, FieldControl, RedactionMode};
pub use files::{FileDescriptor, FileKind, FileRecord};
pub use workflow::{
    FieldView, FileStatus, FileStatusView, ManifestEntry, SubmissionRecord, SubmissionStatus,
    WorkflowController, WorkflowSnapshot,
};

use tracing_subscriber::EnvFilter;

/// Initialize tracing with the RUST_LOG env filter.
/// Default: warn for most crates, info for this one. Safe to call more
/// than once; later calls are no-ops.
pub fn init_tracing() {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,fidelius=info")),
        )
        .try_init();
}
