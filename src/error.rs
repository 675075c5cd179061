//! Error types for merge-radar

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while collecting, analyzing or simulating branch merges
#[derive(Debug, Error)]
pub enum Error {
    /// The given path is not inside a git repository
    #[error("not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    /// A git command failed for reasons unrelated to merge conflicts
    #[error("git {command} failed: {message}")]
    Git {
        /// The git subcommand that was run (e.g. `diff`)
        command: String,
        /// Trimmed stderr or a description of the failure
        message: String,
    },

    /// Diff collection failed for a branch; the overlap report is aborted
    #[error("failed to collect changes for '{branch}': {message}")]
    Diff {
        /// Branch whose diff could not be collected
        branch: String,
        /// Underlying failure
        message: String,
    },

    /// A simulated merge could not be run for a branch pair
    #[error("dry merge of '{branch1}' and '{branch2}' failed: {message}")]
    MergeSimulation {
        /// First branch of the pair
        branch1: String,
        /// Second branch of the pair
        branch2: String,
        /// Underlying failure
        message: String,
    },

    /// Some pairs in a dry-merge batch could not be checked
    #[error("{failed} of {total} conflict check(s) could not complete")]
    PartialDryMerge {
        /// Number of pairs that failed
        failed: usize,
        /// Number of pairs attempted
        total: usize,
    },

    /// A named branch does not exist
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// No branches to analyze
    #[error("no branches to analyze (pass branch names or create worktrees)")]
    NoBranches,

    /// Configuration could not be loaded
    #[error("config error: {0}")]
    Config(String),

    /// The batch did not finish within the caller's timeout
    #[error("timed out after {0}s")]
    Timeout(u64),

    /// I/O failure (e.g. spawning git)
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Unexpected internal failure
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result alias using the crate error type
pub type Result<T> = std::result::Result<T, Error>;
