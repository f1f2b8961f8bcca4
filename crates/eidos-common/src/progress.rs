use serde::{Deserialize, Serialize};
use std::fmt;

/// Job completion percentage, 0..=100.
///
/// Once observed, progress never moves backwards: late or out-of-order
/// status responses carrying a lower value are ignored by `advance_to`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress(u8);

impl Progress {
    pub const COMPLETE: Progress = Progress(100);

    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Advance to `value` if it is ahead of the current position.
    /// Returns true when the value actually moved.
    pub fn advance_to(&mut self, value: u8) -> bool {
        let next = value.min(100);
        if next > self.0 {
            self.0 = next;
            true
        } else {
            false
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
