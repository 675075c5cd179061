//! Shared command context for CLI commands
//!
//! Extracts common setup code shared by check, dry-merge and order commands.

use merge_radar::config::Config;
use merge_radar::error::{Error, Result};
use merge_radar::overlap::IgnoreSet;
use merge_radar::vcs::GitRepo;
use std::path::Path;
use tracing::debug;

/// Branch selection and overrides given on the command line
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Explicit branches (highest precedence)
    pub branches: Vec<String>,
    /// Explicit base branch
    pub base: Option<String>,
    /// Override for simultaneous git operations
    pub jobs: Option<usize>,
}

/// Shared context for CLI commands that read the repository
///
/// This struct encapsulates the common setup needed by every command:
/// - Opening the git repository
/// - Loading layered config
/// - Resolving the base branch
/// - Resolving the branches to analyze
pub struct CommandContext {
    /// The git repository
    pub repo: GitRepo,
    /// Effective configuration (CLI overrides applied)
    pub config: Config,
    /// Base branch every branch is diffed against
    pub base: String,
    /// Branches to analyze, base excluded, first-seen order
    pub branches: Vec<String>,
    /// Compiled ignore patterns
    pub ignore: IgnoreSet,
}

impl CommandContext {
    /// Create a new command context
    ///
    /// Branch precedence: explicit CLI branches, then config `branches`,
    /// then branches checked out in worktrees.
    pub async fn new(path: &Path, selection: Selection) -> Result<Self> {
        let repo = GitRepo::open(path).await?;

        let mut config = Config::load(repo.root())?;
        if let Some(jobs) = selection.jobs {
            config.concurrency = jobs.max(1);
        }

        let base = match selection.base.or_else(|| config.base.clone()) {
            Some(base) => base,
            None => repo.default_branch().await?,
        };
        if !repo.branch_exists(&base).await? {
            return Err(Error::BranchNotFound(base));
        }

        let candidates = if !selection.branches.is_empty() {
            selection.branches
        } else if !config.branches.is_empty() {
            config.branches.clone()
        } else {
            repo.worktree_branches().await?
        };

        let branches = normalize_branches(candidates, &base);
        if branches.is_empty() {
            return Err(Error::NoBranches);
        }
        for branch in &branches {
            if !repo.branch_exists(branch).await? {
                return Err(Error::BranchNotFound(branch.clone()));
            }
        }

        let ignore = IgnoreSet::new(&config.ignore)?;
        debug!(base = %base, branches = ?branches, "resolved command context");

        Ok(Self {
            repo,
            config,
            base,
            branches,
            ignore,
        })
    }
}

/// Drop the base and duplicates, keeping first-seen order
fn normalize_branches(candidates: Vec<String>, base: &str) -> Vec<String> {
    let mut branches: Vec<String> = Vec::with_capacity(candidates.len());
    for branch in candidates {
        if branch != base && !branches.contains(&branch) {
            branches.push(branch);
        }
    }
    branches
}
