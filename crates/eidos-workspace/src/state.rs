//! Render-ready workspace state, mutated only through named transitions.

use serde::Serialize;

use eidos_common::Progress;

/// Top-level phase of the workspace.
///
/// `Empty → HasAsset → TargetLocked → Processing → (Complete | Failed)`;
/// a new upload from `Complete`/`Failed` returns to `HasAsset`, and an
/// explicit reset returns to `Empty` from anywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspacePhase {
    #[default]
    Empty,
    HasAsset,
    TargetLocked,
    Processing,
    Complete,
    Failed,
}

/// The one live analysis result of the workspace, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisResult {
    Image { overlay_uri: String },
    Video { output_uri: String },
}

/// Everything a presentation layer needs to render the workspace.
/// Owned by [`crate::Workspace`]; other components report into it via
/// events and never touch it directly.
#[derive(Debug, Default, Serialize)]
pub struct WorkspaceState {
    phase: WorkspacePhase,
    has_asset: bool,
    target_locked: bool,
    processing: bool,
    progress: Progress,
    result: Option<AnalysisResult>,
    last_error: Option<String>,
}

impl WorkspaceState {
    pub fn phase(&self) -> WorkspacePhase {
        self.phase
    }

    pub fn has_asset(&self) -> bool {
        self.has_asset
    }

    pub fn target_locked(&self) -> bool {
        self.target_locked
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn progress(&self) -> u8 {
        self.progress.value()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// A new asset was adopted: back to `HasAsset`, everything tied to
    /// the previous asset (lock, job, result, error) is cleared.
    pub(crate) fn asset_replaced(&mut self) {
        self.phase = WorkspacePhase::HasAsset;
        self.has_asset = true;
        self.target_locked = false;
        self.processing = false;
        self.progress = Progress::default();
        self.result = None;
        self.last_error = None;
    }

    /// A non-empty prompt was accepted against the current asset.
    pub(crate) fn lock_target(&mut self) {
        self.target_locked = true;
        self.phase = WorkspacePhase::TargetLocked;
    }

    /// A submission went out; progress restarts from zero.
    pub(crate) fn begin_processing(&mut self) {
        self.processing = true;
        self.progress = Progress::default();
        self.result = None;
        self.last_error = None;
        self.phase = WorkspacePhase::Processing;
    }

    /// Apply a progress report. Regressing values are ignored.
    pub(crate) fn apply_progress(&mut self, value: u8) {
        if self.processing {
            self.progress.advance_to(value);
        }
    }

    pub(crate) fn complete(&mut self, result: AnalysisResult) {
        self.processing = false;
        self.progress = Progress::COMPLETE;
        self.result = Some(result);
        self.phase = WorkspacePhase::Complete;
    }

    pub(crate) fn fail(&mut self, error: impl Into<String>) {
        self.processing = false;
        self.result = None;
        self.last_error = Some(error.into());
        self.phase = WorkspacePhase::Failed;
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
