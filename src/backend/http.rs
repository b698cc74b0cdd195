//! HTTP implementation of the redaction backend.
//!
//! All calls are `POST` with a JSON body against a configurable base
//! address. A non-2xx reply is a hard failure carrying the body text, which
//! is where the service reports its error message.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::types::*;
use super::{BackendError, RedactionBackend};
use crate::config::BackendConfig;

/// Global HTTP client for redaction service calls.
///
/// Connection pooling tuned for a single local service. Deliberately built
/// without a request timeout: classification and redaction run server-side
/// for as long as they need, and the workflow has no cancellation primitive
/// to pair a timeout with.
static REDACTION_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_nodelay(true)
        .build()
        .expect("Failed to create redaction HTTP client")
});

/// Get the global redaction HTTP client
#[inline]
pub(crate) fn redaction_client() -> &'static Client {
    &REDACTION_CLIENT
}

/// Production backend speaking to the redaction service over HTTP.
pub struct HttpBackend {
    config: BackendConfig,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn post_json<Req, Resp>(
        &self,
        endpoint: &'static str,
        request: &Req,
    ) -> Result<Resp, BackendError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.config.base_url, endpoint);
        tracing::debug!("[HttpBackend] POST {}", url);

        let response = redaction_client()
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|source| BackendError::Request { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("[HttpBackend] {} returned {}: {}", endpoint, status, body);
            return Err(BackendError::Status {
                endpoint,
                status,
                body,
            });
        }

        response
            .json::<Resp>()
            .await
            .map_err(|source| BackendError::Request { endpoint, source })
    }
}

#[async_trait]
impl RedactionBackend for HttpBackend {
    async fn csv_headers(&self, file_path: &str) -> Result<Vec<String>, BackendError> {
        let request = FilePathRequest {
            file_path: file_path.to_string(),
        };
        let reply: HeadersResponse = self.post_json("/getcsvheader", &request).await?;
        Ok(reply.headers)
    }

    async fn pdf_headers(&self, file_path: &str) -> Result<Vec<String>, BackendError> {
        let request = FilePathRequest {
            file_path: file_path.to_string(),
        };
        let reply: HeadersResponse = self.post_json("/getpdfheader", &request).await?;
        Ok(reply.headers)
    }

    async fn image_entities(
        &self,
        file_path: &str,
        output_path: Option<&str>,
    ) -> Result<Vec<String>, BackendError> {
        let request = EntityDetectionRequest {
            file_path: file_path.to_string(),
            output_path: output_path.map(str::to_string),
        };
        let reply: EntitiesResponse = self.post_json("/getimageentities", &request).await?;
        Ok(reply.entities)
    }

    async fn audio_fields(&self, file_path: &str) -> Result<Vec<String>, BackendError> {
        let request = FilePathRequest {
            file_path: file_path.to_string(),
        };
        let reply: AudioFieldsResponse = self.post_json("/getaudioheader", &request).await?;
        Ok(reply.headers)
    }

    async fn list_folder(&self, folder_path: &str) -> Result<Vec<String>, BackendError> {
        let request = FolderListingRequest {
            folder_path: folder_path.to_string(),
        };
        let reply: FolderListingResponse = self.post_json("/getfolderfiles", &request).await?;
        Ok(reply.files)
    }

    async fn redact_csv(
        &self,
        request: &CsvRedactionRequest,
    ) -> Result<Option<String>, BackendError> {
        let reply: ArtifactResponse = self.post_json("/maskobfcsv", request).await?;
        Ok(reply.filename)
    }

    async fn redact_image(
        &self,
        request: &ImageRedactionRequest,
    ) -> Result<Option<String>, BackendError> {
        let reply: ArtifactResponse = self.post_json("/redactimage", request).await?;
        Ok(reply.filename)
    }

    async fn redact_audio(
        &self,
        request: &AudioRedactionRequest,
    ) -> Result<Option<String>, BackendError> {
        let reply: ArtifactResponse = self.post_json("/getaudio", request).await?;
        Ok(reply.filename)
    }
}
