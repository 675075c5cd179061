//! CLI commands

pub mod check;
pub mod context;
pub mod dry_merge;
pub mod order;
pub mod style;

use async_trait::async_trait;
use indicatif::ProgressBar;
use merge_radar::error::{Error, Result};
use merge_radar::progress::ProgressCallback;
use std::future::Future;
use std::time::Duration;

/// Progress reporter backed by an `indicatif` bar on stderr
pub struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    /// Bar for a batch of pair checks
    pub fn bar(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(style::bar_style());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    /// Reporter that draws nothing (used for `--json`)
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Remove the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    async fn on_pair_checked(&self, done: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(done as u64);
    }
}

/// Run `fut`, failing with [`Error::Timeout`] after `secs` seconds
pub async fn with_timeout<T>(secs: Option<u64>, fut: impl Future<Output = T>) -> Result<T> {
    match secs {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), fut)
            .await
            .map_err(|_| Error::Timeout(secs)),
        None => Ok(fut.await),
    }
}
