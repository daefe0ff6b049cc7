// src/progress.rs
use std::time::Duration;

use crate::reconcile::Outcome;

/// Lightweight progress reporting used by long-running passes.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of items (if known).
    fn begin(&mut self, _label: &str, _total: Option<usize>) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One identifier reconciled.
    fn item_done(&mut self, _key: &str, _outcome: Outcome, _elapsed: Duration) {}

    /// One identifier passed over.
    fn item_failed(&mut self, _key: &str, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self, _elapsed: Duration) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
