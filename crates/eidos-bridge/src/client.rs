//! Bridge client struct, multipart form building, and wire parsing.

use serde::Deserialize;

use eidos_common::JobId;

use crate::{BridgeError, ImageAnalysis, JobStatus, MediaUpload};

use super::config::BridgeConfig;

/// Neural Bridge HTTP client.
pub struct BridgeClient {
    pub(crate) config: BridgeConfig,
    pub(crate) http: reqwest::Client,
}

impl BridgeClient {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Build the `{file, prompt}` multipart body shared by both analyze
    /// endpoints.
    pub(crate) fn build_form(
        &self,
        upload: MediaUpload,
        prompt: &str,
    ) -> Result<reqwest::multipart::Form, BridgeError> {
        let file_part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.filename)
            .mime_str(&upload.content_type)
            .map_err(|e| BridgeError::Parse(format!("invalid content type: {e}")))?;

        Ok(reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("prompt", prompt.to_string()))
    }

    /// Turn a non-2xx response body into a service error, preferring the
    /// JSON `detail` / `message` fields the service uses.
    pub(crate) fn service_error(code: u16, body: &str) -> BridgeError {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|e| e.detail.or(e.message))
            .unwrap_or_else(|| body.chars().take(200).collect());
        BridgeError::Service { code, message }
    }

    pub(crate) fn parse_analyze(body: &str) -> Result<ImageAnalysis, BridgeError> {
        let resp: AnalyzeResponse =
            serde_json::from_str(body).map_err(|e| BridgeError::Parse(e.to_string()))?;
        if resp.status != "success" {
            return Err(BridgeError::Service {
                code: 200,
                message: resp
                    .message
                    .unwrap_or_else(|| format!("analysis {}", resp.status)),
            });
        }
        let overlay_uri = resp
            .image
            .ok_or_else(|| BridgeError::Parse("no 'image' field in response".into()))?;
        Ok(ImageAnalysis { overlay_uri })
    }

    pub(crate) fn parse_start(body: &str) -> Result<JobId, BridgeError> {
        let resp: StartResponse =
            serde_json::from_str(body).map_err(|e| BridgeError::Parse(e.to_string()))?;
        if resp.status != "started" {
            return Err(BridgeError::Service {
                code: 200,
                message: resp
                    .message
                    .unwrap_or_else(|| format!("video analysis {}", resp.status)),
            });
        }
        resp.job_id
            .map(JobId::from)
            .ok_or_else(|| BridgeError::Parse("no 'job_id' field in response".into()))
    }

    pub(crate) fn parse_status(body: &str) -> Result<JobStatus, BridgeError> {
        let resp: StatusResponse =
            serde_json::from_str(body).map_err(|e| BridgeError::Parse(e.to_string()))?;
        match resp.status.as_str() {
            "processing" | "queued" => Ok(JobStatus::Processing {
                progress: resp.progress.unwrap_or(0).min(100),
            }),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed {
                error: resp.error.unwrap_or_else(|| "job failed".into()),
            }),
            other => Err(BridgeError::Parse(format!("unknown job status '{other}'"))),
        }
    }
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    status: String,
    image: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct StartResponse {
    status: String,
    job_id: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct StatusResponse {
    status: String,
    progress: Option<u8>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
    message: Option<String>,
}
