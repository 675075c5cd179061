//! Merge analysis for parallel branches
//!
//! Same split as overlap/:
//! 1. Dry run - simulate pairwise merges to confirm real conflicts (effectful, bounded)
//! 2. Plan - order branches to minimize remaining overlap (pure, testable)

mod dry_run;
mod plan;

pub use dry_run::{
    DEFAULT_CONCURRENCY, DryMergeOptions, ParsedMergeOutput, all_pairs, dry_merge_all,
    dry_merge_pair, dry_merge_pairs, parse_merge_output,
};
pub use plan::{MergePlan, MergeStep, create_merge_plan, plan_merge_order};
