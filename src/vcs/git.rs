//! Git backend using the `git` binary
//!
//! Every operation here is read-only: diffs, merge bases and
//! `merge-tree --write-tree` only create loose objects, never touching the
//! working tree, index or refs.

use super::worktree::parse_worktree_list;
use super::{DiffCollector, MergeSimulator};
use crate::error::{Error, Result};
use crate::types::SimulatedMerge;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, warn};

/// A git repository accessed through the command line
#[derive(Debug, Clone)]
pub struct GitRepo {
    root: PathBuf,
    // `merge-tree --merge-base` needs git 2.40
    explicit_merge_base: bool,
}

/// Oldest git with `merge-tree --write-tree`
const MIN_WRITE_TREE: (u32, u32) = (2, 38);

/// Oldest git accepting `merge-tree --merge-base=<commit>`
const MIN_EXPLICIT_MERGE_BASE: (u32, u32) = (2, 40);

/// Parse `git version 2.43.0` (or `git version 2.39.3 (Apple Git-146)`) into (major, minor)
fn parse_git_version(output: &str) -> Option<(u32, u32)> {
    let mut parts = output.split_whitespace().nth(2)?.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    Some((major, minor))
}

impl GitRepo {
    /// Open the repository containing `path`
    pub async fn open(path: &Path) -> Result<Self> {
        let output = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(path)
            .output()
            .await
            .map_err(|_| Error::NotARepository(path.to_path_buf()))?;

        if !output.status.success() {
            return Err(Error::NotARepository(path.to_path_buf()));
        }

        let root = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());

        let version = Command::new("git").arg("--version").output().await?;
        let version = parse_git_version(&String::from_utf8_lossy(&version.stdout));
        if version.is_none_or(|v| v < MIN_WRITE_TREE) {
            warn!(?version, "git 2.38 or newer is needed for dry merges");
        }
        let explicit_merge_base = version.is_some_and(|v| v >= MIN_EXPLICIT_MERGE_BASE);

        debug!(root = %root.display(), ?version, "opened git repository");
        Ok(Self {
            root,
            explicit_merge_base,
        })
    }

    /// Repository root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Branches checked out in worktrees, in `git worktree list` order
    pub async fn worktree_branches(&self) -> Result<Vec<String>> {
        let stdout = self.run_checked(&["worktree", "list", "--porcelain"]).await?;
        Ok(parse_worktree_list(&stdout)
            .into_iter()
            .filter(|entry| !entry.is_bare)
            .filter_map(|entry| entry.branch)
            .collect())
    }

    /// Best guess at the integration branch
    ///
    /// Uses the remote's `HEAD` when present (the local branch if there is
    /// one, else the remote-tracking ref such as `origin/main`), otherwise
    /// the first of `main` and `master` that exists locally.
    pub async fn default_branch(&self) -> Result<String> {
        let output = self
            .run(&["symbolic-ref", "--quiet", "--short", "refs/remotes/origin/HEAD"])
            .await?;
        if output.status.success() {
            let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if let Some(short) = name.strip_prefix("origin/") {
                if self.branch_exists(short).await? {
                    return Ok(short.to_string());
                }
                return Ok(name);
            }
        }

        for candidate in ["main", "master"] {
            if self.branch_exists(candidate).await? {
                return Ok(candidate.to_string());
            }
        }

        Err(Error::BranchNotFound(
            "could not detect default branch (tried origin/HEAD, main, master)".to_string(),
        ))
    }

    /// Whether `name` resolves to a commit
    pub async fn branch_exists(&self, name: &str) -> Result<bool> {
        let rev = format!("{name}^{{commit}}");
        let output = self.run(&["rev-parse", "--verify", "--quiet", &rev]).await?;
        Ok(output.status.success())
    }

    async fn run(&self, args: &[&str]) -> Result<Output> {
        debug!(?args, "running git");
        let output = Command::new("git")
            .args(["-c", "core.quotePath=false"])
            .args(args)
            .current_dir(&self.root)
            .output()
            .await?;
        Ok(output)
    }

    /// Run git and return stdout, mapping non-zero exit to [`Error::Git`]
    async fn run_checked(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args).await?;
        if !output.status.success() {
            return Err(Error::Git {
                command: args.first().copied().unwrap_or_default().to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl DiffCollector for GitRepo {
    async fn changed_files(&self, base: &str, branch: &str) -> Result<Vec<String>> {
        let range = format!("{base}...{branch}");
        let stdout = self
            .run_checked(&["diff", "-z", "--name-only", "--no-renames", &range, "--"])
            .await
            .map_err(|e| Error::Diff {
                branch: branch.to_string(),
                message: e.to_string(),
            })?;

        let files: Vec<String> = stdout
            .split('\0')
            .filter(|path| !path.is_empty())
            .map(String::from)
            .collect();
        debug!(branch, count = files.len(), "collected changed files");
        Ok(files)
    }
}

#[async_trait]
impl MergeSimulator for GitRepo {
    async fn merge_base(&self, branch_a: &str, branch_b: &str) -> Result<String> {
        let stdout = self.run_checked(&["merge-base", branch_a, branch_b]).await?;
        Ok(stdout.trim().to_string())
    }

    async fn simulate_merge(
        &self,
        ancestor: &str,
        branch_a: &str,
        branch_b: &str,
    ) -> Result<SimulatedMerge> {
        let merge_base = format!("--merge-base={ancestor}");
        let mut args = vec!["merge-tree", "--write-tree", "--name-only"];
        if self.explicit_merge_base {
            args.push(&merge_base);
        }
        // Older git computes the same single merge base itself.
        args.extend([branch_a, branch_b]);
        let output = self.run(&args).await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if output.status.success() {
            debug!(branch_a, branch_b, "simulated merge is clean");
            return Ok(SimulatedMerge::clean(stdout.trim_end()));
        }

        // Exit status 1 means conflicts; anything else is a real failure.
        // Both are handed back so the caller can tell them apart by content.
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(
            branch_a,
            branch_b,
            code = ?output.status.code(),
            "simulated merge reported failure"
        );
        let mut raw = stdout.into_owned();
        if !stderr.trim().is_empty() {
            if !raw.is_empty() && !raw.ends_with('\n') {
                raw.push('\n');
            }
            raw.push_str(stderr.trim_end());
        }
        Ok(SimulatedMerge::failed(raw))
    }
}
