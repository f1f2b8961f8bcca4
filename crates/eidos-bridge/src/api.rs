//! SegmentationService trait implementation for BridgeClient.

use async_trait::async_trait;
use tracing::debug;

use eidos_common::JobId;

use crate::{
    BridgeError, ImageAnalysis, JobStatus, MediaUpload, SegmentationService, ServiceStatus,
};

use super::client::BridgeClient;

impl BridgeClient {
    async fn read_body(response: reqwest::Response) -> Result<String, BridgeError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BridgeError::Network(e.to_string()))?;
        if !status.is_success() {
            return Err(Self::service_error(status.as_u16(), &body));
        }
        Ok(body)
    }
}

#[async_trait]
impl SegmentationService for BridgeClient {
    async fn analyze_image(
        &self,
        upload: MediaUpload,
        prompt: &str,
    ) -> Result<ImageAnalysis, BridgeError> {
        debug!(
            filename = %upload.filename,
            size = upload.bytes.len(),
            "image analysis request"
        );

        let form = self.build_form(upload, prompt)?;
        let response = self
            .http
            .post(self.config.analyze_url())
            .timeout(self.config.upload_timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| BridgeError::Network(e.to_string()))?;

        let body = Self::read_body(response).await?;
        Self::parse_analyze(&body)
    }

    async fn start_video_analysis(
        &self,
        upload: MediaUpload,
        prompt: &str,
    ) -> Result<JobId, BridgeError> {
        debug!(
            filename = %upload.filename,
            size = upload.bytes.len(),
            "video analysis request"
        );

        let form = self.build_form(upload, prompt)?;
        let response = self
            .http
            .post(self.config.analyze_video_url())
            .timeout(self.config.upload_timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| BridgeError::Network(e.to_string()))?;

        let body = Self::read_body(response).await?;
        let job_id = Self::parse_start(&body)?;
        debug!(job_id = %job_id, "video job started");
        Ok(job_id)
    }

    async fn job_status(&self, job_id: &JobId) -> Result<JobStatus, BridgeError> {
        let response = self
            .http
            .get(self.config.status_url(job_id))
            .timeout(self.config.query_timeout)
            .send()
            .await
            .map_err(|e| BridgeError::Network(e.to_string()))?;

        let body = Self::read_body(response).await?;
        Self::parse_status(&body)
    }

    fn result_uri(&self, job_id: &JobId) -> String {
        self.config.result_url(job_id)
    }

    async fn liveness(&self) -> Result<ServiceStatus, BridgeError> {
        let response = self
            .http
            .get(self.config.root_url())
            .timeout(self.config.query_timeout)
            .send()
            .await
            .map_err(|e| BridgeError::Network(e.to_string()))?;

        let body = Self::read_body(response).await?;
        serde_json::from_str(&body).map_err(|e| BridgeError::Parse(e.to_string()))
    }
}
