//! Fixed-cadence status polling for asynchronous video jobs.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use eidos_bridge::{JobStatus, SegmentationService};
use eidos_common::JobId;

use crate::WorkspaceEvent;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Poller lifecycle. `Settled` means the job reached a terminal status;
/// `cancel` returns to `Idle` from anywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PollerPhase {
    #[default]
    Idle,
    Polling,
    Settled,
}

/// Polls one job's status on a fixed interval until it settles.
///
/// Ticks are strictly serialized: the next query is scheduled only after
/// the previous one finished, so two queries for the same job never
/// overlap. The cancellation token is checked before any response is
/// turned into an event, so a response that arrives after `cancel()` is
/// discarded rather than applied.
#[derive(Debug)]
pub struct JobPoller {
    phase: PollerPhase,
    interval: Duration,
    cancel: Option<CancellationToken>,
}

impl Default for JobPoller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl JobPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            phase: PollerPhase::Idle,
            interval,
            cancel: None,
        }
    }

    pub fn phase(&self) -> PollerPhase {
        self.phase
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Begin polling `job_id`, emitting events into `events`.
    ///
    /// # Panics
    /// Panics if the poller is already `Polling`; callers must `cancel()`
    /// first. A settled poller may be started again.
    pub fn start(
        &mut self,
        service: Arc<dyn SegmentationService>,
        job_id: JobId,
        events: mpsc::UnboundedSender<WorkspaceEvent>,
    ) {
        assert!(
            self.phase != PollerPhase::Polling,
            "JobPoller::start called while already polling"
        );

        let token = CancellationToken::new();
        self.cancel = Some(token.clone());
        self.phase = PollerPhase::Polling;
        debug!(job_id = %job_id, interval = ?self.interval, "polling started");

        let interval = self.interval;
        tokio::spawn(async move {
            poll_loop(service, job_id, events, interval, token).await;
        });
    }

    /// Stop polling. Idempotent, valid in any state; any in-flight query
    /// response is discarded.
    pub fn cancel(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
            debug!("polling cancelled");
        }
        self.phase = PollerPhase::Idle;
    }

    /// Record that the job reached a terminal status; the loop has
    /// already stopped on its own.
    pub(crate) fn settle(&mut self) {
        self.cancel = None;
        self.phase = PollerPhase::Settled;
    }
}

impl Drop for JobPoller {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn poll_loop(
    service: Arc<dyn SegmentationService>,
    job_id: JobId,
    events: mpsc::UnboundedSender<WorkspaceEvent>,
    interval: Duration,
    token: CancellationToken,
) {
    let mut ticks = tokio::time::interval(interval);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first interval tick resolves immediately; consume it so the
    // first query happens one full interval after start.
    ticks.tick().await;

    loop {
        tokio::select! {
            _ = token.cancelled() => return,
            _ = ticks.tick() => {}
        }

        let status = tokio::select! {
            _ = token.cancelled() => return,
            status = service.job_status(&job_id) => status,
        };
        if token.is_cancelled() {
            return;
        }

        match status {
            Ok(JobStatus::Processing { progress }) => {
                let _ = events.send(WorkspaceEvent::JobProgress {
                    job_id: job_id.clone(),
                    progress,
                });
            }
            Ok(JobStatus::Completed) => {
                let output_uri = service.result_uri(&job_id);
                let _ = events.send(WorkspaceEvent::JobCompleted { job_id, output_uri });
                return;
            }
            Ok(JobStatus::Failed { error }) => {
                let _ = events.send(WorkspaceEvent::JobFailed { job_id, error });
                return;
            }
            Err(e) => {
                // Never free-run after an unrecoverable query failure.
                warn!(job_id = %job_id, "polling error: {e}");
                let _ = events.send(WorkspaceEvent::JobFailed {
                    job_id,
                    error: format!("polling error: {e}"),
                });
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use eidos_bridge::{BridgeError, ImageAnalysis, MediaUpload, ServiceStatus};

    /// Serves a scripted sequence of status responses; repeats the last
    /// one if polled past the end of the script.
    struct ScriptedStatus {
        script: Mutex<VecDeque<Result<JobStatus, BridgeError>>>,
        queries: AtomicUsize,
    }

    impl ScriptedStatus {
        fn new(script: Vec<Result<JobStatus, BridgeError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                queries: AtomicUsize::new(0),
            })
        }

        fn queries(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SegmentationService for ScriptedStatus {
        async fn analyze_image(
            &self,
            _upload: MediaUpload,
            _prompt: &str,
        ) -> Result<ImageAnalysis, BridgeError> {
            unimplemented!("not used by poller tests")
        }

        async fn start_video_analysis(
            &self,
            _upload: MediaUpload,
            _prompt: &str,
        ) -> Result<JobId, BridgeError> {
            unimplemented!("not used by poller tests")
        }

        async fn job_status(&self, _job_id: &JobId) -> Result<JobStatus, BridgeError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.pop_front().unwrap()
            } else {
                clone_status(script.front().expect("script exhausted"))
            }
        }

        fn result_uri(&self, job_id: &JobId) -> String {
            format!("/result/{job_id}")
        }

        async fn liveness(&self) -> Result<ServiceStatus, BridgeError> {
            unimplemented!("not used by poller tests")
        }
    }

    fn clone_status(s: &Result<JobStatus, BridgeError>) -> Result<JobStatus, BridgeError> {
        match s {
            Ok(status) => Ok(status.clone()),
            Err(BridgeError::Network(m)) => Err(BridgeError::Network(m.clone())),
            Err(BridgeError::Parse(m)) => Err(BridgeError::Parse(m.clone())),
            Err(BridgeError::Service { code, message }) => Err(BridgeError::Service {
                code: *code,
                message: message.clone(),
            }),
        }
    }

    const TICK: Duration = Duration::from_millis(10);

    fn poller() -> JobPoller {
        JobPoller::new(TICK)
    }

    #[tokio::test]
    async fn emits_progress_then_done() {
        let service = ScriptedStatus::new(vec![
            Ok(JobStatus::Processing { progress: 40 }),
            Ok(JobStatus::Completed),
        ]);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut poller = poller();
        poller.start(service.clone(), JobId::new("abc"), tx);
        assert_eq!(poller.phase(), PollerPhase::Polling);

        let first = rx.recv().await.unwrap();
        assert_eq!(
            first,
            WorkspaceEvent::JobProgress {
                job_id: JobId::new("abc"),
                progress: 40
            }
        );

        let second = rx.recv().await.unwrap();
        assert_eq!(
            second,
            WorkspaceEvent::JobCompleted {
                job_id: JobId::new("abc"),
                output_uri: "/result/abc".into()
            }
        );

        // Loop stopped after the terminal status.
        tokio::time::sleep(TICK * 5).await;
        assert_eq!(service.queries(), 2);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn failed_status_stops_polling() {
        let service = ScriptedStatus::new(vec![Ok(JobStatus::Failed { error: "oom".into() })]);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut poller = poller();
        poller.start(service.clone(), JobId::new("abc"), tx);

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            WorkspaceEvent::JobFailed {
                job_id: JobId::new("abc"),
                error: "oom".into()
            }
        );

        tokio::time::sleep(TICK * 5).await;
        assert_eq!(service.queries(), 1);
    }

    #[tokio::test]
    async fn transport_error_reports_failure_and_stops() {
        let service =
            ScriptedStatus::new(vec![Err(BridgeError::Network("connection reset".into()))]);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut poller = poller();
        poller.start(service.clone(), JobId::new("abc"), tx);

        let event = rx.recv().await.unwrap();
        match event {
            WorkspaceEvent::JobFailed { error, .. } => {
                assert!(error.starts_with("polling error:"), "{error}");
            }
            other => panic!("unexpected event: {other:?}"),
        }

        tokio::time::sleep(TICK * 5).await;
        assert_eq!(service.queries(), 1);
    }

    #[tokio::test]
    async fn cancel_discards_pending_work() {
        let service = ScriptedStatus::new(vec![Ok(JobStatus::Processing { progress: 40 })]);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut poller = poller();
        poller.start(service, JobId::new("abc"), tx);
        poller.cancel();
        assert_eq!(poller.phase(), PollerPhase::Idle);

        // Even well past several intervals, nothing is emitted.
        tokio::time::sleep(TICK * 5).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn cancel_is_idempotent_from_idle() {
        let mut poller = poller();
        poller.cancel();
        poller.cancel();
        assert_eq!(poller.phase(), PollerPhase::Idle);
    }

    #[tokio::test]
    async fn restart_after_cancel() {
        let service = ScriptedStatus::new(vec![Ok(JobStatus::Completed)]);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut poller = poller();
        poller.start(service.clone(), JobId::new("a"), tx.clone());
        poller.cancel();
        poller.start(service, JobId::new("b"), tx);

        let event = rx.recv().await.unwrap();
        assert!(matches!(
            event,
            WorkspaceEvent::JobCompleted { ref job_id, .. } if job_id.as_str() == "b"
        ));
    }

    #[tokio::test]
    #[should_panic(expected = "already polling")]
    async fn start_while_polling_panics() {
        let service = ScriptedStatus::new(vec![Ok(JobStatus::Processing { progress: 0 })]);
        let (tx, _rx) = mpsc::unbounded_channel();

        let mut poller = poller();
        poller.start(service.clone(), JobId::new("a"), tx.clone());
        poller.start(service, JobId::new("b"), tx);
    }
}
