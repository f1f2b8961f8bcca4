//! Shared leaf types for the Eidos segmentation workspace.
//!
//! No dependencies on other workspace crates: job and handle ids,
//! media-kind classification, and the monotonic progress counter.

pub mod id;
pub mod media;
pub mod progress;

pub use id::{new_display_handle, JobId};
pub use media::MediaKind;
pub use progress::Progress;
