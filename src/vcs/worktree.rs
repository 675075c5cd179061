//! Parsing of `git worktree list --porcelain`

use std::path::PathBuf;

/// One worktree as reported by git
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeEntry {
    /// Worktree directory
    pub path: PathBuf,
    /// Checked-out branch short name, `None` when detached or bare
    pub branch: Option<String>,
    /// Whether this is the bare repository entry
    pub is_bare: bool,
}

/// Parse porcelain worktree output into entries
///
/// Records are separated by blank lines; each starts with a `worktree`
/// line. Attributes other than `branch` and `bare` are ignored.
pub fn parse_worktree_list(output: &str) -> Vec<WorktreeEntry> {
    let mut entries = Vec::new();
    let mut current: Option<WorktreeEntry> = None;

    for line in output.lines() {
        let line = line.trim_end_matches('\r');
        if let Some(path) = line.strip_prefix("worktree ") {
            if let Some(entry) = current.take() {
                entries.push(entry);
            }
            current = Some(WorktreeEntry {
                path: PathBuf::from(path),
                branch: None,
                is_bare: false,
            });
            continue;
        }

        if line.is_empty() {
            entries.extend(current.take());
            continue;
        }

        let Some(entry) = current.as_mut() else {
            continue;
        };

        if let Some(full_ref) = line.strip_prefix("branch ") {
            let name = full_ref.strip_prefix("refs/heads/").unwrap_or(full_ref);
            entry.branch = Some(name.to_string());
        } else if line == "bare" {
            entry.is_bare = true;
        }
    }

    entries.extend(current);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_main_and_linked_worktrees() {
        let output = "\
worktree /repo
HEAD 1111111111111111111111111111111111111111
branch refs/heads/main

worktree /repo-wt/feat-auth
HEAD 2222222222222222222222222222222222222222
branch refs/heads/feat/auth

";
        let entries = parse_worktree_list(output);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, PathBuf::from("/repo"));
        assert_eq!(entries[0].branch.as_deref(), Some("main"));
        assert_eq!(entries[1].branch.as_deref(), Some("feat/auth"));
    }

    #[test]
    fn test_parse_detached_and_bare() {
        let output = "\
worktree /repo.git
bare

worktree /wt/scratch
HEAD 3333333333333333333333333333333333333333
detached
";
        let entries = parse_worktree_list(output);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_bare);
        assert!(entries[0].branch.is_none());
        assert!(!entries[1].is_bare);
        assert!(entries[1].branch.is_none());
    }

    #[test]
    fn test_parse_without_trailing_blank_line() {
        let entries = parse_worktree_list("worktree /a\nbranch refs/heads/x");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].branch.as_deref(), Some("x"));
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_worktree_list("").is_empty());
    }
}
