//! Progress reporting for long-running checks

use async_trait::async_trait;

/// Receives progress updates while a batch of checks runs
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Free-form status message
    async fn on_message(&self, message: &str);

    /// One more pair finished (successfully or not)
    async fn on_pair_checked(&self, done: usize, total: usize);
}

/// Progress sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_message(&self, _message: &str) {}

    async fn on_pair_checked(&self, _done: usize, _total: usize) {}
}
