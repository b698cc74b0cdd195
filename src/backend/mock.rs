//! Scripted backend for workflow tests.
//!
//! Replies are keyed by file path (classification) or file name
//! (redaction). Every call is appended to an ordered log, and an in-flight
//! counter records the highest concurrency the mock ever observed, which the
//! single-flight tests assert on.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::types::{AudioRedactionRequest, CsvRedactionRequest, ImageRedactionRequest};
use super::{BackendError, RedactionBackend};

type Scripted = Result<Vec<String>, String>;

#[derive(Default)]
pub(crate) struct MockBackend {
    /// Classification replies by file path, shared by all four read calls.
    classifications: Mutex<HashMap<String, Scripted>>,
    /// Folder listings by folder path.
    folders: Mutex<HashMap<String, Vec<String>>>,
    /// File names whose redaction call should fail.
    failing_redactions: Mutex<HashSet<String>>,
    /// Ordered `operation:path` log of every call received.
    pub calls: Mutex<Vec<String>>,
    pub csv_requests: Mutex<Vec<CsvRedactionRequest>>,
    pub image_requests: Mutex<Vec<ImageRedactionRequest>>,
    pub audio_requests: Mutex<Vec<AudioRedactionRequest>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_fields(&self, path: &str, fields: &[&str]) {
        self.classifications.lock().unwrap().insert(
            path.to_string(),
            Ok(fields.iter().map(|f| f.to_string()).collect()),
        );
    }

    pub fn fail_fields(&self, path: &str, message: &str) {
        self.classifications
            .lock()
            .unwrap()
            .insert(path.to_string(), Err(message.to_string()));
    }

    pub fn script_folder(&self, folder: &str, files: &[&str]) {
        self.folders.lock().unwrap().insert(
            folder.to_string(),
            files.iter().map(|f| f.to_string()).collect(),
        );
    }

    pub fn fail_redaction(&self, file_name: &str) {
        self.failing_redactions
            .lock()
            .unwrap()
            .insert(file_name.to_string());
    }

    pub fn call_log(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &str, path: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}:{}", operation, path));
    }

    /// Hold the in-flight counter up across a yield so overlapping calls
    /// would be observed.
    async fn observe(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(2)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    async fn classification_reply(
        &self,
        endpoint: &'static str,
        path: &str,
    ) -> Result<Vec<String>, BackendError> {
        self.observe().await;
        let scripted = self.classifications.lock().unwrap().get(path).cloned();
        match scripted {
            Some(Ok(fields)) => Ok(fields),
            Some(Err(message)) => Err(scripted_failure(endpoint, &message)),
            None => Err(scripted_failure(endpoint, "no scripted reply")),
        }
    }

    async fn redaction_reply(
        &self,
        endpoint: &'static str,
        file_name: &str,
    ) -> Result<Option<String>, BackendError> {
        self.observe().await;
        if self.failing_redactions.lock().unwrap().contains(file_name) {
            return Err(scripted_failure(endpoint, "scripted redaction failure"));
        }
        Ok(Some(format!("redacted_{}", file_name)))
    }
}

fn scripted_failure(endpoint: &'static str, message: &str) -> BackendError {
    BackendError::Status {
        endpoint,
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        body: message.to_string(),
    }
}

fn base_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

#[async_trait]
impl RedactionBackend for MockBackend {
    async fn csv_headers(&self, file_path: &str) -> Result<Vec<String>, BackendError> {
        self.record("csv_headers", file_path);
        self.classification_reply("/getcsvheader", file_path).await
    }

    async fn pdf_headers(&self, file_path: &str) -> Result<Vec<String>, BackendError> {
        self.record("pdf_headers", file_path);
        self.classification_reply("/getpdfheader", file_path).await
    }

    async fn image_entities(
        &self,
        file_path: &str,
        _output_path: Option<&str>,
    ) -> Result<Vec<String>, BackendError> {
        self.record("image_entities", file_path);
        self.classification_reply("/getimageentities", file_path)
            .await
    }

    async fn audio_fields(&self, file_path: &str) -> Result<Vec<String>, BackendError> {
        self.record("audio_fields", file_path);
        self.classification_reply("/getaudioheader", file_path).await
    }

    async fn list_folder(&self, folder_path: &str) -> Result<Vec<String>, BackendError> {
        self.record("list_folder", folder_path);
        self.observe().await;
        let listing = self.folders.lock().unwrap().get(folder_path).cloned();
        listing.ok_or_else(|| BackendError::Status {
            endpoint: "/getfolderfiles",
            status: reqwest::StatusCode::BAD_REQUEST,
            body: "Invalid folder path".to_string(),
        })
    }

    async fn redact_csv(
        &self,
        request: &CsvRedactionRequest,
    ) -> Result<Option<String>, BackendError> {
        self.record("redact_csv", &request.file_name);
        self.csv_requests.lock().unwrap().push(request.clone());
        self.redaction_reply("/maskobfcsv", &request.file_name).await
    }

    async fn redact_image(
        &self,
        request: &ImageRedactionRequest,
    ) -> Result<Option<String>, BackendError> {
        let name = base_name(&request.file_path);
        self.record("redact_image", &name);
        self.image_requests.lock().unwrap().push(request.clone());
        self.redaction_reply("/redactimage", &name).await
    }

    async fn redact_audio(
        &self,
        request: &AudioRedactionRequest,
    ) -> Result<Option<String>, BackendError> {
        let name = base_name(&request.file_path);
        self.record("redact_audio", &name);
        self.audio_requests.lock().unwrap().push(request.clone());
        self.redaction_reply("/getaudio", &name).await
    }
}
