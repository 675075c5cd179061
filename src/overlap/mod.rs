//! Overlap detection across branches
//!
//! Two-phase pattern matching merge/:
//! 1. Collect - diff every branch against the base (effectful, fails fast)
//! 2. Detect - build the file index and `CheckResult` (pure, testable)

mod collect;
mod detect;

pub use collect::{IgnoreSet, check_overlaps, collect_branch_files};
pub use detect::detect_overlaps;
