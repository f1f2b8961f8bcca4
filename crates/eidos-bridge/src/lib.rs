//! HTTP client for the Eidos Neural Bridge segmentation service.
//!
//! The service exposes a synchronous image path and an asynchronous
//! video path:
//! - `POST /analyze` — image + prompt, returns the overlay inline
//! - `POST /analyze_video` — video + prompt, returns a job id
//! - `GET /status/{job_id}` — polled until the job settles
//! - `GET /result/{job_id}` — rendered artifact, referenced by URI
//! - `GET /` — liveness probe
//!
//! The orchestration core talks to the service exclusively through the
//! [`SegmentationService`] trait so tests can substitute a scripted
//! implementation.

mod api;
mod client;
mod config;

use async_trait::async_trait;

pub use client::BridgeClient;
pub use config::BridgeConfig;

use eidos_common::JobId;

/// A media payload ready for upload: raw bytes plus the multipart
/// metadata the service expects.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

/// Result of a synchronous image analysis: a URI (data URI in practice)
/// for the segmentation overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAnalysis {
    pub overlay_uri: String,
}

/// Current state of an asynchronous video job as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Processing { progress: u8 },
    Completed,
    Failed { error: String },
}

/// Payload of the `GET /` liveness probe.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub system: String,
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
}

impl ServiceStatus {
    pub fn is_online(&self) -> bool {
        self.status == "ONLINE"
    }
}

#[async_trait]
pub trait SegmentationService: Send + Sync {
    /// Synchronous path: upload an image and get the overlay back inline.
    async fn analyze_image(
        &self,
        upload: MediaUpload,
        prompt: &str,
    ) -> Result<ImageAnalysis, BridgeError>;

    /// Asynchronous path: upload a video, receive the id of the job the
    /// service started for it.
    async fn start_video_analysis(
        &self,
        upload: MediaUpload,
        prompt: &str,
    ) -> Result<JobId, BridgeError>;

    /// One status query for a running job.
    async fn job_status(&self, job_id: &JobId) -> Result<JobStatus, BridgeError>;

    /// URI of the rendered artifact for a completed job. The core never
    /// downloads it; a presentation layer dereferences the URI.
    fn result_uri(&self, job_id: &JobId) -> String;

    /// Liveness probe (`GET /`).
    async fn liveness(&self) -> Result<ServiceStatus, BridgeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("service error {code}: {message}")]
    Service { code: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
}
