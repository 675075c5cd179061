//! Core types for merge-radar

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Coarse risk classification of an overlapping file
///
/// Derived purely from how many branches touch the file: two branches is
/// `Low`, three or more is `High`. Ordering follows risk (`Low < High`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Exactly two branches touch the file
    Low,
    /// Three or more branches touch the file
    High,
}

impl Severity {
    /// Classify an overlap by the number of branches touching the file
    #[must_use]
    pub const fn from_branch_count(count: usize) -> Self {
        if count >= 3 { Self::High } else { Self::Low }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::High => write!(f, "high"),
        }
    }
}

/// A file modified by two or more branches relative to the base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOverlap {
    /// Path relative to the repository root
    pub file: String,
    /// Branches touching the file, ascending, always at least two
    pub branches: Vec<String>,
    /// Severity derived from `branches.len()`
    pub severity: Severity,
}

impl FileOverlap {
    /// Display label such as `low (2)` or `high (3)`
    pub fn severity_label(&self) -> String {
        severity_label(self)
    }
}

impl std::fmt::Display for FileOverlap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}]: {}",
            self.file,
            self.severity_label(),
            self.branches.join(", ")
        )
    }
}

/// Format an overlap's severity as `"<severity> (<branch count>)"`
pub fn severity_label(overlap: &FileOverlap) -> String {
    format!("{} ({})", overlap.severity, overlap.branches.len())
}

/// Outcome of overlap detection across a set of branches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Overlapping files, `High` before `Low`, then by path
    pub overlaps: Vec<FileOverlap>,
    /// Distinct files changed across all branches (overlapping or not)
    pub total_files: usize,
    /// Distinct branches analyzed
    pub total_branches: usize,
}

impl CheckResult {
    /// Whether any file is touched by more than one branch
    #[must_use]
    pub fn has_overlaps(&self) -> bool {
        !self.overlaps.is_empty()
    }

    /// Number of high-severity overlaps
    #[must_use]
    pub fn high_count(&self) -> usize {
        self.count(Severity::High)
    }

    /// Number of low-severity overlaps
    #[must_use]
    pub fn low_count(&self) -> usize {
        self.count(Severity::Low)
    }

    fn count(&self, severity: Severity) -> usize {
        self.overlaps
            .iter()
            .filter(|o| o.severity == severity)
            .count()
    }

    /// Unordered branch pairs sharing at least one overlapping file
    ///
    /// Each pair is stored with the lexically smaller branch first.
    #[must_use]
    pub fn overlapping_pairs(&self) -> BTreeSet<(String, String)> {
        let mut pairs = BTreeSet::new();
        for overlap in &self.overlaps {
            for (i, a) in overlap.branches.iter().enumerate() {
                for b in &overlap.branches[i + 1..] {
                    let pair = if a <= b {
                        (a.clone(), b.clone())
                    } else {
                        (b.clone(), a.clone())
                    };
                    pairs.insert(pair);
                }
            }
        }
        pairs
    }
}

/// Result of a simulated three-way merge between two branches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DryMergeResult {
    /// First branch of the pair
    pub branch1: String,
    /// Second branch of the pair
    pub branch2: String,
    /// Whether the merge would produce conflicts
    pub has_conflicts: bool,
    /// Conflicting paths in the order the simulator reported them
    pub conflict_files: Vec<String>,
}

/// A branch pair whose simulated merge could not be run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairFailure {
    /// First branch of the pair
    pub branch1: String,
    /// Second branch of the pair
    pub branch2: String,
    /// Why the check could not complete
    pub error: String,
}

/// All dry-merge outcomes for a batch, in pair order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DryMergeReport {
    /// Pairs whose simulation ran (clean or conflicting)
    pub results: Vec<DryMergeResult>,
    /// Pairs whose simulation could not run
    pub failures: Vec<PairFailure>,
}

impl DryMergeReport {
    /// True if every requested pair was checked
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of pairs attempted
    #[must_use]
    pub fn checked_pairs(&self) -> usize {
        self.results.len() + self.failures.len()
    }

    /// Results that would conflict
    pub fn conflicting(&self) -> impl Iterator<Item = &DryMergeResult> {
        self.results.iter().filter(|r| r.has_conflicts)
    }
}

/// Raw output of a simulated merge, as returned by a [`MergeSimulator`]
///
/// [`MergeSimulator`]: crate::vcs::MergeSimulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedMerge {
    /// Line-oriented output: a tree id, optionally followed by `CONFLICT` lines
    pub output: String,
    /// Whether the underlying merge attempt reported failure
    pub failed: bool,
}

impl SimulatedMerge {
    /// A clean merge producing `tree`
    pub fn clean(tree: impl Into<String>) -> Self {
        Self {
            output: tree.into(),
            failed: false,
        }
    }

    /// A failed merge attempt with the given output
    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            failed: true,
        }
    }
}
