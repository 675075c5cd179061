//! Change collection - effectful gathering of per-branch file sets

use super::detect::detect_overlaps;
use crate::error::{Error, Result};
use crate::types::CheckResult;
use crate::vcs::DiffCollector;
use futures::stream::{self, StreamExt, TryStreamExt};
use glob::Pattern;
use std::collections::HashMap;
use tracing::debug;

/// Paths excluded from overlap detection (lockfiles, generated code, ...)
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    patterns: Vec<Pattern>,
}

impl IgnoreSet {
    /// Compile glob patterns such as `Cargo.lock` or `docs/**`
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p.as_ref())
                    .map_err(|e| Error::Config(format!("invalid ignore pattern '{}': {e}", p.as_ref())))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Whether `path` matches any pattern
    pub fn is_ignored(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }

    /// True if no patterns are configured
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Collect changed files for every branch relative to `base`
///
/// Up to `concurrency` diffs run at once. The first diff failure aborts the
/// whole batch: a partial file map would produce a misleading overlap report.
pub async fn collect_branch_files(
    collector: &dyn DiffCollector,
    base: &str,
    branches: &[String],
    ignore: &IgnoreSet,
    concurrency: usize,
) -> Result<HashMap<String, Vec<String>>> {
    let collected: Vec<(String, Vec<String>)> = stream::iter(branches)
        .map(|branch| async move {
            let mut files = collector.changed_files(base, branch).await?;
            if !ignore.is_empty() {
                files.retain(|f| !ignore.is_ignored(f));
            }
            Ok::<_, Error>((branch.clone(), files))
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    debug!(base, branches = collected.len(), "collected branch changes");
    Ok(collected.into_iter().collect())
}

/// Collect changes for `branches` and detect overlapping files
pub async fn check_overlaps(
    collector: &dyn DiffCollector,
    base: &str,
    branches: &[String],
    ignore: &IgnoreSet,
    concurrency: usize,
) -> Result<CheckResult> {
    let branch_files = collect_branch_files(collector, base, branches, ignore, concurrency).await?;
    Ok(detect_overlaps(&branch_files))
}
