//! Merge planning - pure functions for ordering branch merges
//!
//! This module contains the pure, testable logic for choosing a merge
//! order. No I/O happens here - the overlap report is passed in, making it
//! easy to unit test.

use crate::types::FileOverlap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single step in the merge plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStep {
    /// 1-based position in the plan
    pub order: usize,
    /// Branch to merge at this step
    pub branch: String,
    /// Overlapping files shared with branches not yet merged at this step
    pub conflicts: u32,
}

impl std::fmt::Display for MergeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let noun = if self.conflicts == 1 { "conflict" } else { "conflicts" };
        write!(f, "{}. {} ({} {noun})", self.order, self.branch, self.conflicts)
    }
}

/// Merge plan - the functional core output
///
/// Created by `create_merge_plan()` (pure); the order is a greedy heuristic,
/// not a globally optimal schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePlan {
    /// Steps in merge order
    pub steps: Vec<MergeStep>,
}

impl MergePlan {
    /// Check if the plan has no steps
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Sum of per-step conflict weights
    #[must_use]
    pub fn total_conflicts(&self) -> u32 {
        self.steps.iter().map(|s| s.conflicts).sum()
    }

    /// Whether every step merges without remaining overlap
    #[must_use]
    pub fn is_conflict_free(&self) -> bool {
        self.steps.iter().all(|s| s.conflicts == 0)
    }
}

/// Symmetric count of overlapping files shared by each branch pair
///
/// Indexed by position in the branch list; the diagonal stays zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConflictMatrix {
    cells: Vec<Vec<u32>>,
}

impl ConflictMatrix {
    /// Build the matrix from overlaps, ignoring branches not in `branches`
    ///
    /// An overlap touching k known branches contributes to all C(k, 2)
    /// pairs, not only adjacent ones.
    pub(crate) fn build(overlaps: &[FileOverlap], branches: &[String]) -> Self {
        let n = branches.len();
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(n);
        for (i, branch) in branches.iter().enumerate() {
            index.entry(branch.as_str()).or_insert(i);
        }

        let mut cells = vec![vec![0u32; n]; n];
        for overlap in overlaps {
            let mut members: Vec<usize> = overlap
                .branches
                .iter()
                .filter_map(|b| index.get(b.as_str()).copied())
                .collect();
            members.sort_unstable();
            members.dedup();

            for (k, &i) in members.iter().enumerate() {
                for &j in &members[k + 1..] {
                    cells[i][j] += 1;
                    cells[j][i] += 1;
                }
            }
        }

        Self { cells }
    }

    /// Entry for branch positions `i` and `j`
    pub(crate) fn get(&self, i: usize, j: usize) -> u32 {
        self.cells[i][j]
    }

    /// Row sum of `i` restricted to `remaining`, excluding `i` itself
    fn weight(&self, i: usize, remaining: &[usize]) -> u32 {
        remaining
            .iter()
            .filter(|&&j| j != i)
            .map(|&j| self.cells[i][j])
            .sum()
    }
}

/// Compute a greedy merge order (PURE - no I/O, easily testable)
///
/// At each step the remaining branch with the smallest conflict weight
/// against the other remaining branches is merged next; ties go to the
/// lexically smallest branch name. Weights are recomputed every round, so a
/// branch's reported `conflicts` only counts branches still waiting.
///
/// # Arguments
/// * `overlaps` - Overlapping files from `detect_overlaps()`
/// * `branches` - Branches to order; overlaps naming other branches are ignored
///
/// # Returns
/// One `MergeStep` per input branch, with `order` running `1..=N`
#[must_use]
pub fn plan_merge_order(overlaps: &[FileOverlap], branches: &[String]) -> Vec<MergeStep> {
    let matrix = ConflictMatrix::build(overlaps, branches);
    let mut remaining: Vec<usize> = (0..branches.len()).collect();
    let mut steps = Vec::with_capacity(branches.len());

    while !remaining.is_empty() {
        let Some((slot, weight)) = remaining
            .iter()
            .enumerate()
            .map(|(slot, &i)| (slot, matrix.weight(i, &remaining)))
            .min_by(|(sa, wa), (sb, wb)| {
                wa.cmp(wb)
                    .then_with(|| branches[remaining[*sa]].cmp(&branches[remaining[*sb]]))
            })
        else {
            break;
        };

        let chosen = remaining.remove(slot);
        steps.push(MergeStep {
            order: steps.len() + 1,
            branch: branches[chosen].clone(),
            conflicts: weight,
        });
    }

    steps
}

/// Create a merge plan from an overlap report (PURE)
#[must_use]
pub fn create_merge_plan(overlaps: &[FileOverlap], branches: &[String]) -> MergePlan {
    MergePlan {
        steps: plan_merge_order(overlaps, branches),
    }
}
