//! Overlap detection - pure functions over per-branch file sets
//!
//! No I/O happens here. Output ordering never depends on map iteration
//! order: the index is a `BTreeMap` and the overlap list is sorted
//! explicitly before returning.

use crate::types::{CheckResult, FileOverlap, Severity};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::BuildHasher;

/// Find files touched by two or more branches (PURE)
///
/// # Arguments
/// * `branch_files` - Map of branch name to the paths it changed relative
///   to the base. Paths need not be sorted; duplicates are ignored.
///
/// # Returns
/// A `CheckResult` with overlaps ordered `High` before `Low`, then by path.
/// Empty input yields an empty result.
#[must_use]
pub fn detect_overlaps<S: BuildHasher>(branch_files: &HashMap<String, Vec<String>, S>) -> CheckResult {
    let mut index: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

    for (branch, files) in branch_files {
        for file in files {
            index.entry(file.as_str()).or_default().insert(branch.as_str());
        }
    }

    let mut overlaps: Vec<FileOverlap> = index
        .iter()
        .filter(|(_, branches)| branches.len() >= 2)
        .map(|(file, branches)| FileOverlap {
            file: (*file).to_string(),
            branches: branches.iter().map(|b| (*b).to_string()).collect(),
            severity: Severity::from_branch_count(branches.len()),
        })
        .collect();

    overlaps.sort_by(|a, b| {
        (Reverse(a.severity), a.file.as_bytes()).cmp(&(Reverse(b.severity), b.file.as_bytes()))
    });

    CheckResult {
        overlaps,
        total_files: index.len(),
        total_branches: branch_files.len(),
    }
}
