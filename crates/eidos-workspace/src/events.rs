use eidos_common::JobId;

/// Events reported into the workspace by background work.
///
/// Submission-scoped events carry the submission sequence number they
/// belong to; job-scoped events carry their job id. The workspace uses
/// those to discard anything that refers to superseded work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceEvent {
    /// Synchronous image analysis finished.
    ImageCompleted { submission: u64, overlay_uri: String },
    /// A submission failed before any job existed (either path).
    SubmissionFailed { submission: u64, error: String },
    /// The service accepted a video and started a job for it.
    JobStarted { submission: u64, job_id: JobId },
    /// Poll tick observed the job still running.
    JobProgress { job_id: JobId, progress: u8 },
    /// Poll tick observed the job completed.
    JobCompleted { job_id: JobId, output_uri: String },
    /// Poll tick observed the job failed, or polling itself broke down.
    JobFailed { job_id: JobId, error: String },
}
