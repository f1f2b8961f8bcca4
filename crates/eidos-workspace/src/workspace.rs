//! Top-level coordinator: owns the state machine and applies events.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use eidos_bridge::SegmentationService;
use eidos_common::JobId;

use crate::poller::JobPoller;
use crate::{
    AnalysisResult, MediaAsset, MediaStore, SubmissionDispatcher, WorkspaceError, WorkspaceEvent,
    WorkspaceState,
};

/// One segmentation workspace: a single asset, a single live result, and
/// at most one running job.
///
/// All mutation goes through `&mut self` on one logical thread; the
/// background request and polling tasks only report back over the event
/// channel, and [`apply`](Self::apply) is the sole consumer.
pub struct Workspace {
    state: WorkspaceState,
    store: MediaStore,
    dispatcher: SubmissionDispatcher,
    poller: JobPoller,
    service: Arc<dyn SegmentationService>,
    /// Job currently owned by this workspace, if any. Poll events for
    /// any other job are stale and dropped.
    active_job: Option<JobId>,
    /// Monotonic submission counter; bumped on every accepted submission
    /// and on asset replacement, orphaning in-flight request outcomes.
    submission: u64,
    events_tx: mpsc::UnboundedSender<WorkspaceEvent>,
    events_rx: mpsc::UnboundedReceiver<WorkspaceEvent>,
}

impl Workspace {
    pub fn new(service: Arc<dyn SegmentationService>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            state: WorkspaceState::default(),
            store: MediaStore::new(),
            dispatcher: SubmissionDispatcher::new(service.clone(), events_tx.clone()),
            poller: JobPoller::default(),
            service,
            active_job: None,
            submission: 0,
            events_tx,
            events_rx,
        }
    }

    /// Override the job polling cadence (default 1 s).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poller.set_interval(interval);
        self
    }

    pub fn state(&self) -> &WorkspaceState {
        &self.state
    }

    pub fn asset(&self) -> Option<&MediaAsset> {
        self.store.current()
    }

    /// Adopt a newly selected file as the workspace asset.
    ///
    /// Any active poller is cancelled and any in-flight submission is
    /// orphaned before the new asset is adopted; the prior result and
    /// error are cleared. Fails with `UnsupportedMediaKind` (and no
    /// state change) when the declared content type is blank.
    pub fn select_asset(
        &mut self,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<&MediaAsset, WorkspaceError> {
        let asset = MediaAsset::new(filename, content_type, bytes)?;

        self.poller.cancel();
        self.active_job = None;
        self.submission += 1;
        self.state.asset_replaced();

        let (replaced, asset) = self.store.adopt(asset);
        if replaced {
            debug!("previous asset handle released");
        }
        Ok(asset)
    }

    /// Submit the current asset with a target prompt.
    ///
    /// Validation failures (`NoAsset`, `EmptyPrompt`,
    /// `SubmissionInProgress`) are returned to the caller and leave the
    /// state untouched. On acceptance the workspace moves to
    /// `TargetLocked` and immediately to `Processing`; the outcome
    /// arrives as events.
    pub fn submit(&mut self, prompt: &str) -> Result<(), WorkspaceError> {
        let asset = self.store.current().ok_or(WorkspaceError::NoAsset)?;
        if self.state.is_processing() {
            return Err(WorkspaceError::SubmissionInProgress);
        }
        if prompt.trim().is_empty() {
            return Err(WorkspaceError::EmptyPrompt);
        }

        let submission = self.submission + 1;
        self.dispatcher.submit(asset, prompt, submission)?;
        self.submission = submission;
        self.state.lock_target();
        self.state.begin_processing();
        Ok(())
    }

    /// Receive the next event reported by background work.
    pub async fn next_event(&mut self) -> Option<WorkspaceEvent> {
        self.events_rx.recv().await
    }

    /// Apply one event to the state machine. Events tied to a superseded
    /// submission or a job that is no longer active are discarded.
    pub fn apply(&mut self, event: WorkspaceEvent) {
        match event {
            WorkspaceEvent::ImageCompleted {
                submission,
                overlay_uri,
            } if submission == self.submission => {
                self.state.complete(AnalysisResult::Image { overlay_uri });
            }
            WorkspaceEvent::SubmissionFailed { submission, error }
                if submission == self.submission =>
            {
                self.state.fail(error);
            }
            WorkspaceEvent::JobStarted { submission, job_id }
                if submission == self.submission =>
            {
                // Poller may still be Settled from a previous job.
                self.poller.cancel();
                self.active_job = Some(job_id.clone());
                self.poller
                    .start(self.service.clone(), job_id, self.events_tx.clone());
            }
            WorkspaceEvent::JobProgress { job_id, progress }
                if self.active_job.as_ref() == Some(&job_id) =>
            {
                self.state.apply_progress(progress);
            }
            WorkspaceEvent::JobCompleted { job_id, output_uri }
                if self.active_job.as_ref() == Some(&job_id) =>
            {
                self.poller.settle();
                self.active_job = None;
                self.state.complete(AnalysisResult::Video { output_uri });
            }
            WorkspaceEvent::JobFailed { job_id, error }
                if self.active_job.as_ref() == Some(&job_id) =>
            {
                self.poller.settle();
                self.active_job = None;
                self.state.fail(error);
            }
            stale => debug!(?stale, "discarding stale event"),
        }
    }

    /// Drive the workspace until the current submission settles.
    /// Returns the live result, or `JobFailed` with the recorded error.
    pub async fn run_until_settled(&mut self) -> Result<&AnalysisResult, WorkspaceError> {
        while self.state.is_processing() {
            match self.events_rx.recv().await {
                Some(event) => self.apply(event),
                // Both sender halves live in self, so this cannot happen
                // while the workspace itself is alive.
                None => break,
            }
        }
        match self.state.result() {
            Some(result) => Ok(result),
            None => Err(WorkspaceError::JobFailed(
                self.state.last_error().unwrap_or("analysis failed").into(),
            )),
        }
    }

    /// Drop the asset, cancel any job, and return to `Empty`.
    pub fn reset(&mut self) {
        self.poller.cancel();
        self.active_job = None;
        self.submission += 1;
        self.store.clear();
        self.state.reset();
    }
}
