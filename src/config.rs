//! Backend endpoint configuration.

use serde::{Deserialize, Serialize};

/// Default service address, the development deployment.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Where the redaction service lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base address, without a trailing slash, e.g. `http://localhost:5000`.
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Read `FIDELIUS_BASE_URL` from the environment, falling back to the
    /// default address.
    pub fn from_env() -> Self {
        match std::env::var("FIDELIUS_BASE_URL").ok().filter(|v| !v.trim().is_empty()) {
            Some(url) => Self::new(url),
            None => Self::default(),
        }
    }
}
