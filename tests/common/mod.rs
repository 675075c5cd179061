//! Shared test fixtures

#![allow(dead_code)]

mod mock_vcs;

pub use mock_vcs::{MockVcs, SimulateCall};

use merge_radar::types::FileOverlap;
use merge_radar::types::Severity;
use std::collections::HashMap;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Owned branch names
pub fn names(branches: &[&str]) -> Vec<String> {
    branches.iter().map(|b| (*b).to_string()).collect()
}

/// Build a branch -> changed files map
pub fn branch_files(entries: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(branch, files)| ((*branch).to_string(), names(files)))
        .collect()
}

/// Build an overlap record with the severity its branch count implies
pub fn make_overlap(file: &str, branches: &[&str]) -> FileOverlap {
    FileOverlap {
        file: file.to_string(),
        branches: names(branches),
        severity: Severity::from_branch_count(branches.len()),
    }
}

/// `git --version` as (major, minor), if git is installed
pub fn git_version() -> Option<(u32, u32)> {
    let output = Command::new("git").arg("--version").output().ok()?;
    let text = String::from_utf8_lossy(&output.stdout);
    let mut parts = text.split_whitespace().nth(2)?.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    Some((major, minor))
}

/// Whether git is installed at all; prints a skip note for `test` if not
pub fn git_available(test: &str) -> bool {
    let available = git_version().is_some();
    if !available {
        eprintln!("skipping {test}: git not found");
    }
    available
}

/// Whether git supports `merge-tree --write-tree`; prints a skip note for `test` if not
pub fn merge_tree_supported(test: &str) -> bool {
    match git_version() {
        Some(v) if v >= (2, 38) => true,
        Some((major, minor)) => {
            eprintln!("skipping {test}: git {major}.{minor} lacks merge-tree --write-tree (needs 2.38)");
            false
        }
        None => {
            eprintln!("skipping {test}: git not found");
            false
        }
    }
}

/// A throwaway git repository with `main` checked out
pub struct TempGitRepo {
    dir: TempDir,
}

impl TempGitRepo {
    /// Create a repository with one commit on `main`
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let repo = Self { dir };

        repo.git(&["init", "--quiet"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        repo.git(&["config", "user.name", "Radar Test"]);
        repo.git(&["config", "user.email", "radar@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);

        repo.write("README.md", "# fixture\n");
        repo.write("src/lib.rs", "pub fn answer() -> u32 {\n    42\n}\n");
        repo.write("Cargo.toml", "[package]\nname = \"fixture\"\n");
        repo.commit_all("initial");
        repo
    }

    /// Repository root
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run git in the repository, panicking on failure
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.dir.path())
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .output()
            .expect("failed to run git");
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    /// Write a file relative to the repository root
    pub fn write(&self, path: &str, contents: &str) {
        let full = self.dir.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("failed to create dirs");
        }
        std::fs::write(full, contents).expect("failed to write file");
    }

    /// Stage everything and commit
    pub fn commit_all(&self, message: &str) {
        self.git(&["add", "-A"]);
        self.git(&["commit", "--quiet", "-m", message]);
    }

    /// Clone this repository into `dest` and delete the local `main`,
    /// leaving only `origin/main` (as a fresh clone of a fork often does)
    pub fn clone_without_local_main(&self, dest: &Path) {
        let source = self.dir.path().to_str().expect("utf-8 temp path");
        let dest_str = dest.to_str().expect("utf-8 temp path");
        let output = Command::new("git")
            .args(["clone", "--quiet", source, dest_str])
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .output()
            .expect("failed to run git");
        assert!(
            output.status.success(),
            "git clone failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        for args in [
            &["checkout", "--quiet", "--detach"][..],
            &["branch", "--quiet", "-D", "main"][..],
        ] {
            let output = Command::new("git")
                .args(args)
                .current_dir(dest)
                .output()
                .expect("failed to run git");
            assert!(output.status.success(), "git {args:?} failed");
        }
    }

    /// Create `name` from `main` with one commit writing `files`, then return to `main`
    pub fn branch_with_changes(&self, name: &str, files: &[(&str, &str)]) {
        self.git(&["checkout", "--quiet", "-b", name, "main"]);
        for (path, contents) in files {
            self.write(path, contents);
        }
        self.commit_all(&format!("change on {name}"));
        self.git(&["checkout", "--quiet", "main"]);
    }
}
