//! Neural Bridge client configuration.

use eidos_common::JobId;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Neural Bridge client configuration. The base URL is the single
/// external configuration point of the system.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub base_url: String,
    /// Per-request ceiling on uploads (image and video submissions).
    pub upload_timeout: std::time::Duration,
    /// Per-request ceiling on status and liveness queries.
    pub query_timeout: std::time::Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl BridgeConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            upload_timeout: std::time::Duration::from_secs(300),
            query_timeout: std::time::Duration::from_secs(30),
        }
    }

    /// Read the base URL from `EIDOS_BRIDGE_URL`, falling back to the
    /// local development default.
    pub fn from_env() -> Self {
        match std::env::var("EIDOS_BRIDGE_URL") {
            Ok(url) if !url.trim().is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    pub fn with_upload_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.upload_timeout = timeout;
        self
    }

    pub fn with_query_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub(crate) fn root_url(&self) -> String {
        format!("{}/", self.base_url)
    }

    pub(crate) fn analyze_url(&self) -> String {
        format!("{}/analyze", self.base_url)
    }

    pub(crate) fn analyze_video_url(&self) -> String {
        format!("{}/analyze_video", self.base_url)
    }

    pub(crate) fn status_url(&self, job_id: &JobId) -> String {
        format!("{}/status/{}", self.base_url, job_id)
    }

    pub(crate) fn result_url(&self, job_id: &JobId) -> String {
        format!("{}/result/{}", self.base_url, job_id)
    }
}
