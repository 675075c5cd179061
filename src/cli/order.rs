//! Order command - suggest a merge order with the least remaining overlap

use crate::cli::context::{CommandContext, Selection};
use crate::cli::dry_merge::to_json;
use crate::cli::style::{Stylize, check};
use anstream::println;
use merge_radar::error::Result;
use merge_radar::merge::{MergePlan, create_merge_plan};
use merge_radar::overlap::check_overlaps;
use serde::Serialize;
use std::path::Path;

/// Options for the order command
#[derive(Debug, Clone, Default)]
pub struct OrderOptions {
    /// Print JSON instead of text
    pub json: bool,
}

#[derive(Serialize)]
struct OrderOutput<'a> {
    base: &'a str,
    #[serde(flatten)]
    plan: &'a MergePlan,
}

/// Run the order command
pub async fn run_order(path: &Path, selection: Selection, options: OrderOptions) -> Result<()> {
    let ctx = CommandContext::new(path, selection).await?;

    let check_result = check_overlaps(
        &ctx.repo,
        &ctx.base,
        &ctx.branches,
        &ctx.ignore,
        ctx.config.concurrency,
    )
    .await?;
    let plan = create_merge_plan(&check_result.overlaps, &ctx.branches);

    if options.json {
        let output = OrderOutput {
            base: &ctx.base,
            plan: &plan,
        };
        println!("{}", to_json(&output)?);
    } else {
        print_merge_plan(&ctx.base, &plan);
    }

    Ok(())
}

/// Print a merge plan as text
fn print_merge_plan(base: &str, plan: &MergePlan) {
    println!("{} {}:", "Suggested merge order into".emphasis(), base.accent());
    println!();

    for step in &plan.steps {
        let line = step.to_string();
        if step.conflicts == 0 {
            println!("  {}", line.success());
        } else {
            println!("  {}", line.warn());
        }
    }

    println!();
    if plan.is_conflict_free() {
        println!("{} No overlapping files between any branches", check());
    } else {
        println!(
            "{}",
            format!(
                "Remaining overlap along this order: {} file-pair(s)",
                plan.total_conflicts()
            )
            .muted()
        );
    }
}
