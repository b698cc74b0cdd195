//! Redaction service access.
//!
//! The workflow talks to the service exclusively through the
//! [`RedactionBackend`] trait so tests can script it; [`HttpBackend`] is the
//! production implementation. One method per service operation, grouped as
//! the workflow uses them: four classification reads, one listing, three
//! redaction writes.

mod http;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use http::HttpBackend;

use async_trait::async_trait;

use types::{AudioRedactionRequest, CsvRedactionRequest, ImageRedactionRequest};

/// Failure talking to the redaction service.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The request never produced a decodable reply (connect, send, or
    /// body-decode failure).
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-2xx status. The body is kept; the
    /// service puts its error message there.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },
}

/// The eight service operations the workflow depends on.
#[async_trait]
pub trait RedactionBackend: Send + Sync {
    /// Column headers of a tabular file.
    async fn csv_headers(&self, file_path: &str) -> Result<Vec<String>, BackendError>;

    /// Field headers of a document file.
    async fn pdf_headers(&self, file_path: &str) -> Result<Vec<String>, BackendError>;

    /// Detected entities in an image. The service writes a masked preview as
    /// a side effect; only the entity list comes back here.
    async fn image_entities(
        &self,
        file_path: &str,
        output_path: Option<&str>,
    ) -> Result<Vec<String>, BackendError>;

    /// Service-reported audio fields, taken verbatim.
    async fn audio_fields(&self, file_path: &str) -> Result<Vec<String>, BackendError>;

    /// Supported files under a folder, as server-side paths.
    async fn list_folder(&self, folder_path: &str) -> Result<Vec<String>, BackendError>;

    /// Mask/obfuscate selected columns of a tabular file.
    async fn redact_csv(
        &self,
        request: &CsvRedactionRequest,
    ) -> Result<Option<String>, BackendError>;

    /// Paint over selected entities in an image.
    async fn redact_image(
        &self,
        request: &ImageRedactionRequest,
    ) -> Result<Option<String>, BackendError>;

    /// Produce a censored audio artifact.
    async fn redact_audio(
        &self,
        request: &AudioRedactionRequest,
    ) -> Result<Option<String>, BackendError>;
}
