//! Dry-merge execution - effectful operations
//!
//! This module pairs branches up, asks a `MergeSimulator` for a
//! non-destructive merge of each pair and turns the raw output into
//! `DryMergeResult`s. Pair checks run concurrently behind a semaphore;
//! results keep pair order no matter which check finishes first.

use crate::error::{Error, Result};
use crate::progress::ProgressCallback;
use crate::types::{DryMergeReport, DryMergeResult, PairFailure};
use crate::vcs::MergeSimulator;
use futures::future::join_all;
use regex::Regex;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Default number of simultaneous merge simulations
pub const DEFAULT_CONCURRENCY: usize = 4;

static CONFLICT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^CONFLICT \(.*\): Merge conflict in (.+)$").expect("valid conflict line pattern")
});

/// Conflict information extracted from simulator output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedMergeOutput {
    /// Whether at least one `CONFLICT` line was present
    pub has_conflicts: bool,
    /// Conflicting paths in line order
    pub conflict_files: Vec<String>,
}

/// Options for a dry-merge batch
#[derive(Debug, Clone)]
pub struct DryMergeOptions {
    /// Maximum simultaneous simulator calls (values below 1 are treated as 1)
    pub concurrency: usize,
}

impl Default for DryMergeOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Extract conflicting paths from merge simulation output (PURE)
///
/// Every line of the form `CONFLICT (<kind>): Merge conflict in <path>`
/// contributes `<path>`. Other lines (the tree id, `Auto-merging ...`,
/// conflict kinds without content markers) are ignored.
pub fn parse_merge_output(raw_output: &str) -> ParsedMergeOutput {
    let conflict_files: Vec<String> = raw_output
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter_map(|line| CONFLICT_LINE.captures(line))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect();

    ParsedMergeOutput {
        has_conflicts: !conflict_files.is_empty(),
        conflict_files,
    }
}

/// Whether any line reports a conflict of any kind (`CONFLICT (...)`)
fn has_conflict_marker(raw_output: &str) -> bool {
    raw_output.lines().any(|line| line.starts_with("CONFLICT ("))
}

/// Paths from the `--name-only` block: the lines between the tree id and
/// the first blank line. Empty when the output has no such block.
fn name_only_paths(raw_output: &str) -> Vec<String> {
    let mut lines = raw_output.lines().map(|line| line.trim_end_matches('\r'));
    lines.next();

    let mut paths = Vec::new();
    for line in lines {
        if line.is_empty() {
            return paths;
        }
        if line.starts_with("CONFLICT (") || line.starts_with("Auto-merging ") {
            break;
        }
        paths.push(line.to_string());
    }
    Vec::new()
}

/// Every unordered pair `(i, j)` with `i < j`, in index order
pub fn all_pairs(branches: &[String]) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (i, a) in branches.iter().enumerate() {
        for b in &branches[i + 1..] {
            pairs.push((a.clone(), b.clone()));
        }
    }
    pairs
}

/// Simulate merging one pair of branches
///
/// A failed simulation that still reports `CONFLICT` lines is the normal
/// "conflicts found" signal, whatever the conflict kind. A failed
/// simulation without any is an error, never a clean result.
pub async fn dry_merge_pair(
    simulator: &dyn MergeSimulator,
    branch1: &str,
    branch2: &str,
) -> Result<DryMergeResult> {
    let to_pair_error = |e: Error| match e {
        err @ Error::MergeSimulation { .. } => err,
        other => Error::MergeSimulation {
            branch1: branch1.to_string(),
            branch2: branch2.to_string(),
            message: other.to_string(),
        },
    };

    let ancestor = simulator
        .merge_base(branch1, branch2)
        .await
        .map_err(to_pair_error)?;
    let simulated = simulator
        .simulate_merge(&ancestor, branch1, branch2)
        .await
        .map_err(to_pair_error)?;

    let mut parsed = parse_merge_output(&simulated.output);
    if simulated.failed && has_conflict_marker(&simulated.output) {
        // modify/delete, rename/delete and file/directory conflicts have no
        // content markers; git still lists their paths before the messages.
        for path in name_only_paths(&simulated.output) {
            if !parsed.conflict_files.contains(&path) {
                parsed.conflict_files.push(path);
            }
        }
        parsed.has_conflicts = true;
    }
    if simulated.failed && !parsed.has_conflicts {
        let detail = simulated.output.trim();
        return Err(Error::MergeSimulation {
            branch1: branch1.to_string(),
            branch2: branch2.to_string(),
            message: if detail.is_empty() {
                "merge simulation failed without conflict markers".to_string()
            } else {
                detail.to_string()
            },
        });
    }

    debug!(
        branch1,
        branch2,
        conflicts = parsed.conflict_files.len(),
        "dry merge finished"
    );

    Ok(DryMergeResult {
        branch1: branch1.to_string(),
        branch2: branch2.to_string(),
        has_conflicts: parsed.has_conflicts,
        conflict_files: parsed.conflict_files,
    })
}

/// Dry-merge the given pairs (EFFECTFUL)
///
/// At most `options.concurrency` simulations run at once. A failing pair is
/// recorded in `failures` and does not stop the others.
pub async fn dry_merge_pairs(
    pairs: &[(String, String)],
    simulator: &dyn MergeSimulator,
    options: &DryMergeOptions,
    progress: &dyn ProgressCallback,
) -> DryMergeReport {
    let semaphore = Semaphore::new(options.concurrency.max(1));
    let done = AtomicUsize::new(0);
    let total = pairs.len();

    let checks = pairs.iter().map(|(a, b)| {
        let semaphore = &semaphore;
        let done = &done;
        async move {
            // The semaphore is never closed, so acquire cannot fail.
            let _permit = semaphore.acquire().await.ok();
            let outcome = dry_merge_pair(simulator, a, b).await;
            let finished = done.fetch_add(1, Ordering::SeqCst) + 1;
            progress.on_pair_checked(finished, total).await;
            outcome
        }
    });

    let mut report = DryMergeReport::default();
    for ((a, b), outcome) in pairs.iter().zip(join_all(checks).await) {
        match outcome {
            Ok(result) => report.results.push(result),
            Err(e) => {
                warn!(branch1 = %a, branch2 = %b, error = %e, "dry merge could not complete");
                report.failures.push(PairFailure {
                    branch1: a.clone(),
                    branch2: b.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    report
}

/// Dry-merge every pair of `branches` (EFFECTFUL)
///
/// Pairs are enumerated `(b0, b1), (b0, b2), ..., (b1, b2), ...` and the
/// report keeps that order.
pub async fn dry_merge_all(
    branches: &[String],
    simulator: &dyn MergeSimulator,
    options: &DryMergeOptions,
    progress: &dyn ProgressCallback,
) -> DryMergeReport {
    let pairs = all_pairs(branches);
    progress
        .on_message(&format!("Checking {} branch pair(s)", pairs.len()))
        .await;
    dry_merge_pairs(&pairs, simulator, options, progress).await
}
