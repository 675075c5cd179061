//! Check command - report files touched by more than one branch

use crate::cli::context::{CommandContext, Selection};
use crate::cli::dry_merge::{ensure_complete, print_dry_merge_report, run_batch, to_json};
use crate::cli::style::{Stylize, check, spinner_style};
use anstream::println;
use indicatif::ProgressBar;
use merge_radar::error::Result;
use merge_radar::overlap::check_overlaps;
use merge_radar::types::{CheckResult, DryMergeReport, Severity};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Print JSON instead of text
    pub json: bool,
    /// Confirm overlaps with simulated merges
    pub dry_merge: bool,
    /// With `dry_merge`, check every pair instead of overlapping pairs only
    pub all_pairs: bool,
    /// Timeout for the dry-merge batch, in seconds
    pub timeout_secs: Option<u64>,
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    base: &'a str,
    branches: &'a [String],
    #[serde(flatten)]
    check: &'a CheckResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    dry_merge: Option<&'a DryMergeReport>,
}

/// Run the check command
pub async fn run_check(path: &Path, selection: Selection, options: CheckOptions) -> Result<()> {
    let ctx = CommandContext::new(path, selection).await?;

    let spinner = if options.json {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    };
    spinner.set_message(format!(
        "Comparing {} branch(es) against {}...",
        ctx.branches.len(),
        ctx.base.emphasis()
    ));

    let check_result = check_overlaps(
        &ctx.repo,
        &ctx.base,
        &ctx.branches,
        &ctx.ignore,
        ctx.config.concurrency,
    )
    .await;
    spinner.finish_and_clear();
    let check_result = check_result?;

    let dry_merge = if options.dry_merge {
        let only_overlapping = !options.all_pairs && ctx.config.only_overlapping;
        let timeout = options.timeout_secs.or(ctx.config.timeout_secs);
        Some(
            run_batch(
                &ctx,
                only_overlapping.then_some(&check_result),
                timeout,
                options.json,
            )
            .await?,
        )
    } else {
        None
    };

    if options.json {
        let output = CheckOutput {
            base: &ctx.base,
            branches: &ctx.branches,
            check: &check_result,
            dry_merge: dry_merge.as_ref(),
        };
        println!("{}", to_json(&output)?);
    } else {
        print_check_report(&ctx.base, &check_result);
        if let Some(ref report) = dry_merge {
            println!();
            print_dry_merge_report(report);
        }
    }

    dry_merge.as_ref().map_or(Ok(()), ensure_complete)
}

/// Print an overlap report as text
fn print_check_report(base: &str, result: &CheckResult) {
    println!(
        "{} {} {}",
        "Overlap check against".emphasis(),
        base.accent(),
        format!(
            "({} branch(es), {} changed file(s))",
            result.total_branches, result.total_files
        )
        .muted()
    );

    if !result.has_overlaps() {
        println!(
            "{} No overlapping files across {} branch(es)",
            check(),
            result.total_branches
        );
        return;
    }

    let width = result
        .overlaps
        .iter()
        .map(|o| o.file.chars().count())
        .max()
        .unwrap_or(0);

    println!();
    for overlap in &result.overlaps {
        let label = format!("{:<9}", overlap.severity_label());
        let label = match overlap.severity {
            Severity::High => label.danger(),
            Severity::Low => label.warn(),
        };
        println!(
            "  {label} {:<width$}  {}",
            overlap.file,
            overlap.branches.join(", ").accent()
        );
    }

    println!();
    println!(
        "{} overlapping file(s): {} high, {} low",
        result.overlaps.len().emphasis(),
        result.high_count().danger(),
        result.low_count().warn()
    );
}
