//! Progress reporting for the per-event and per-client geocoding loops.
//!
//! The pipeline performs one network round trip per event and two per
//! client, so a run over a busy week can take minutes. [`ProgressCallback`]
//! lets the binary draw progress bars while library code and tests stay
//! free of any terminal dependency.

/// Receives progress updates from a long-running loop.
pub trait ProgressCallback: Send + Sync {
    /// Total number of items that will be processed.
    fn set_total(&self, total: u64);

    /// Advance by `delta` items.
    fn inc(&self, delta: u64);

    /// Replace the label shown next to the indicator.
    fn set_message(&self, msg: String);

    /// Mark the loop as complete with a final message.
    fn finish(&self, msg: String);
}

/// Discards every update. Used where no progress is rendered.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}
