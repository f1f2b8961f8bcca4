//! Orchestration core of the Eidos segmentation workspace.
//!
//! Coordinates one media asset, one submission, and at most one
//! asynchronous job at a time:
//! - [`MediaStore`] holds the currently selected asset
//! - [`SubmissionDispatcher`] routes a submission down the synchronous
//!   (image) or asynchronous (video) path
//! - [`JobPoller`] polls video job status on a fixed cadence
//! - [`Workspace`] owns the state machine and is the single writer of
//!   [`WorkspaceState`]
//!
//! Everything the background tasks learn comes back over one event
//! channel, so state mutations are serialized and late responses for
//! cancelled work are discarded instead of applied.

mod dispatcher;
mod error;
mod events;
mod media;
mod poller;
mod state;
mod workspace;

pub use dispatcher::SubmissionDispatcher;
pub use error::WorkspaceError;
pub use events::WorkspaceEvent;
pub use media::{MediaAsset, MediaStore};
pub use poller::{JobPoller, PollerPhase};
pub use state::{AnalysisResult, WorkspacePhase, WorkspaceState};
pub use workspace::Workspace;
