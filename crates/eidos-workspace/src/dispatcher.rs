//! Routes a submission down the synchronous (image) or asynchronous
//! (video) analysis path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use eidos_bridge::SegmentationService;
use eidos_common::MediaKind;

use crate::{MediaAsset, WorkspaceError, WorkspaceEvent};

/// Clears the in-flight flag on drop, so the dispatcher is released even
/// if the request task errors or is dropped mid-flight.
struct InFlightGuard(Arc<AtomicBool>);

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self, WorkspaceError> {
        if flag
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(WorkspaceError::SubmissionInProgress);
        }
        Ok(Self(flag.clone()))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Issues at most one outbound analysis request at a time.
///
/// `submit` validates, spawns the request, and returns immediately; the
/// outcome arrives later as a [`WorkspaceEvent`]. A second `submit`
/// while a request is in flight is rejected with `SubmissionInProgress`
/// on both paths.
pub struct SubmissionDispatcher {
    service: Arc<dyn SegmentationService>,
    events: mpsc::UnboundedSender<WorkspaceEvent>,
    in_flight: Arc<AtomicBool>,
}

impl SubmissionDispatcher {
    pub fn new(
        service: Arc<dyn SegmentationService>,
        events: mpsc::UnboundedSender<WorkspaceEvent>,
    ) -> Self {
        Self {
            service,
            events,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Dispatch `asset` + `prompt`, tagging resulting events with
    /// `submission` so superseded outcomes can be discarded.
    pub fn submit(
        &self,
        asset: &MediaAsset,
        prompt: &str,
        submission: u64,
    ) -> Result<(), WorkspaceError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(WorkspaceError::EmptyPrompt);
        }
        let guard = InFlightGuard::acquire(&self.in_flight)?;

        let kind = asset.kind;
        let upload = asset.to_upload();
        let prompt = prompt.to_string();
        let service = self.service.clone();
        let events = self.events.clone();
        debug!(?kind, submission, "dispatching submission");

        tokio::spawn(async move {
            let _guard = guard;
            match kind {
                MediaKind::Image => match service.analyze_image(upload, &prompt).await {
                    Ok(analysis) => {
                        let _ = events.send(WorkspaceEvent::ImageCompleted {
                            submission,
                            overlay_uri: analysis.overlay_uri,
                        });
                    }
                    Err(e) => {
                        let _ = events.send(WorkspaceEvent::SubmissionFailed {
                            submission,
                            error: e.to_string(),
                        });
                    }
                },
                MediaKind::Video => match service.start_video_analysis(upload, &prompt).await {
                    Ok(job_id) => {
                        let _ = events.send(WorkspaceEvent::JobStarted { submission, job_id });
                    }
                    Err(e) => {
                        let _ = events.send(WorkspaceEvent::SubmissionFailed {
                            submission,
                            error: e.to_string(),
                        });
                    }
                },
            }
        });

        Ok(())
    }
}
