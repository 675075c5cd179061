//! Dry-merge command - confirm real conflicts with simulated merges

use crate::cli::context::{CommandContext, Selection};
use crate::cli::style::{Stylize, arrow, check, cross};
use crate::cli::{CliProgress, with_timeout};
use anstream::println;
use merge_radar::error::{Error, Result};
use merge_radar::merge::{DryMergeOptions, all_pairs, dry_merge_pairs};
use merge_radar::overlap::check_overlaps;
use merge_radar::progress::ProgressCallback;
use merge_radar::types::{CheckResult, DryMergeReport};
use serde::Serialize;
use std::path::Path;

/// Options for the dry-merge command
#[derive(Debug, Clone, Default)]
pub struct DryMergeCommandOptions {
    /// Print JSON instead of text
    pub json: bool,
    /// Check every pair, not only pairs sharing an overlapping file
    pub all_pairs: bool,
    /// Timeout for the whole batch, in seconds
    pub timeout_secs: Option<u64>,
}

#[derive(Serialize)]
struct DryMergeOutput<'a> {
    base: &'a str,
    branches: &'a [String],
    #[serde(flatten)]
    report: &'a DryMergeReport,
}

/// Run the dry-merge command
pub async fn run_dry_merge(
    path: &Path,
    selection: Selection,
    options: DryMergeCommandOptions,
) -> Result<()> {
    let ctx = CommandContext::new(path, selection).await?;
    let all = options.all_pairs || !ctx.config.only_overlapping;

    let check_result = if all {
        None
    } else {
        Some(
            check_overlaps(
                &ctx.repo,
                &ctx.base,
                &ctx.branches,
                &ctx.ignore,
                ctx.config.concurrency,
            )
            .await?,
        )
    };

    let timeout = options.timeout_secs.or(ctx.config.timeout_secs);
    let report = run_batch(&ctx, check_result.as_ref(), timeout, options.json).await?;

    if options.json {
        let output = DryMergeOutput {
            base: &ctx.base,
            branches: &ctx.branches,
            report: &report,
        };
        println!("{}", to_json(&output)?);
    } else {
        print_dry_merge_report(&report);
    }

    ensure_complete(&report)
}

/// Dry-merge the pairs selected for `ctx`
///
/// With an overlap report, only pairs sharing an overlapping file are
/// checked; without one, every pair is. Pairs keep branch-list order.
pub async fn run_batch(
    ctx: &CommandContext,
    overlaps: Option<&CheckResult>,
    timeout_secs: Option<u64>,
    quiet: bool,
) -> Result<DryMergeReport> {
    let mut pairs = all_pairs(&ctx.branches);
    if let Some(check_result) = overlaps {
        let overlapping = check_result.overlapping_pairs();
        pairs.retain(|(a, b)| {
            let key = if a <= b {
                (a.clone(), b.clone())
            } else {
                (b.clone(), a.clone())
            };
            overlapping.contains(&key)
        });
    }

    let progress = if quiet {
        CliProgress::hidden()
    } else {
        CliProgress::bar(pairs.len())
    };
    let options = DryMergeOptions {
        concurrency: ctx.config.concurrency,
    };

    progress
        .on_message(&format!("Dry-merging {} pair(s)", pairs.len()))
        .await;
    let result = with_timeout(
        timeout_secs,
        dry_merge_pairs(&pairs, &ctx.repo, &options, &progress),
    )
    .await;
    progress.finish();
    result
}

/// Fail with [`Error::PartialDryMerge`] if any pair could not be checked
pub fn ensure_complete(report: &DryMergeReport) -> Result<()> {
    if report.is_complete() {
        Ok(())
    } else {
        Err(Error::PartialDryMerge {
            failed: report.failures.len(),
            total: report.checked_pairs(),
        })
    }
}

/// Print a dry-merge report as text
pub fn print_dry_merge_report(report: &DryMergeReport) {
    println!("{}:", "Dry merge".emphasis());

    if report.checked_pairs() == 0 {
        println!("  {}", "No branch pairs to check".muted());
        return;
    }

    for result in &report.results {
        if result.has_conflicts {
            println!(
                "  {} {} + {}: {} conflicting file(s)",
                cross(),
                result.branch1.accent(),
                result.branch2.accent(),
                result.conflict_files.len().danger()
            );
            for file in &result.conflict_files {
                println!("      {} {file}", arrow());
            }
        } else {
            println!(
                "  {} {} + {}: {}",
                check(),
                result.branch1.accent(),
                result.branch2.accent(),
                "clean".success()
            );
        }
    }

    for failure in &report.failures {
        println!(
            "  {} {} + {}: {}",
            "?".warn(),
            failure.branch1.accent(),
            failure.branch2.accent(),
            "could not check".warn()
        );
        println!("      {}", failure.error.muted());
    }

    let conflicting = report.conflicting().count();
    println!();
    if conflicting == 0 && report.is_complete() {
        println!("{}", "No real conflicts found.".success());
    } else if conflicting > 0 {
        println!(
            "{} of {} pair(s) would conflict",
            conflicting.danger(),
            report.checked_pairs()
        );
    }
    if !report.is_complete() {
        println!(
            "{}",
            format!(
                "{} conflict check(s) could not complete",
                report.failures.len()
            )
            .warn()
        );
    }
}

/// Pretty JSON, mapping serialization failure to an internal error
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| Error::Internal(format!("failed to serialize output: {e}")))
}
