//! Progress reporting for layer downloads.
//!
//! [`ProgressCallback`] keeps the fetchers independent of how progress is
//! shown. The CLI plugs in `indicatif` bars; tests and library callers
//! use [`null_progress`].

use std::sync::Arc;

/// Receives progress updates from a paginated download.
pub trait ProgressCallback: Send + Sync {
    /// Set the total expected features (enables percentage/ETA).
    fn set_total(&self, total: u64);

    /// Advance progress by `delta` features.
    fn inc(&self, delta: u64);

    /// Mark the download complete with a final message.
    fn finish(&self, msg: String);
}

/// Ignores every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`] instance for convenient use.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
