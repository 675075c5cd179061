//! Version-control collaborators
//!
//! The analysis core never talks to git directly. It consumes two
//! capabilities, diff collection and merge simulation, through the traits
//! below so that the same logic runs against a real repository or a mock.

mod git;
mod worktree;

pub use git::GitRepo;
pub use worktree::{WorktreeEntry, parse_worktree_list};

use crate::error::Result;
use crate::types::SimulatedMerge;
use async_trait::async_trait;

/// Source of per-branch changed file lists
#[async_trait]
pub trait DiffCollector: Send + Sync {
    /// Files that differ between `base` and `branch`
    ///
    /// An empty list is valid (branch identical to base). Unknown refs must
    /// return an error, never an empty list.
    async fn changed_files(&self, base: &str, branch: &str) -> Result<Vec<String>>;
}

/// Non-destructive three-way merge capability
#[async_trait]
pub trait MergeSimulator: Send + Sync {
    /// Common ancestor of two branches, used as the merge base
    async fn merge_base(&self, branch_a: &str, branch_b: &str) -> Result<String>;

    /// Simulate merging `branch_a` and `branch_b` from `ancestor`
    ///
    /// Must not touch the working tree, index or refs. Output is a tree id
    /// line optionally followed by lines of the form
    /// `CONFLICT (<kind>): Merge conflict in <path>`. Returning `Err` is
    /// reserved for failures to run the simulation at all; a merge attempt
    /// that ran and reported failure is returned as
    /// [`SimulatedMerge::failed`].
    async fn simulate_merge(
        &self,
        ancestor: &str,
        branch_a: &str,
        branch_b: &str,
    ) -> Result<SimulatedMerge>;
}
