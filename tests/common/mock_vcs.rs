//! Mock version-control collaborators for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use merge_radar::error::{Error, Result};
use merge_radar::types::SimulatedMerge;
use merge_radar::vcs::{DiffCollector, MergeSimulator};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Call record for `simulate_merge`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulateCall {
    pub ancestor: String,
    pub branch_a: String,
    pub branch_b: String,
}

/// Simple mock implementing both `DiffCollector` and `MergeSimulator`
///
/// Features:
/// - Configurable changed files per branch
/// - Configurable merge output per branch pair (clean by default)
/// - Per-pair delays to shuffle completion order
/// - Call tracking and in-flight tracking for concurrency checks
/// - Error injection for failure path testing
pub struct MockVcs {
    changed_files: Mutex<HashMap<String, Vec<String>>>,
    merge_responses: Mutex<HashMap<(String, String), SimulatedMerge>>,
    delays: Mutex<HashMap<(String, String), Duration>>,
    // Call tracking
    diff_calls: Mutex<Vec<String>>,
    merge_base_calls: Mutex<Vec<(String, String)>>,
    simulate_calls: Mutex<Vec<SimulateCall>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    // Error injection
    diff_errors: Mutex<HashMap<String, String>>,
    merge_base_errors: Mutex<HashMap<(String, String), String>>,
    simulate_errors: Mutex<HashMap<(String, String), String>>,
}

fn key(a: &str, b: &str) -> (String, String) {
    (a.to_string(), b.to_string())
}

impl Default for MockVcs {
    fn default() -> Self {
        Self::new()
    }
}

impl MockVcs {
    /// Create an empty mock: no branches, every merge clean
    pub fn new() -> Self {
        Self {
            changed_files: Mutex::new(HashMap::new()),
            merge_responses: Mutex::new(HashMap::new()),
            delays: Mutex::new(HashMap::new()),
            diff_calls: Mutex::new(Vec::new()),
            merge_base_calls: Mutex::new(Vec::new()),
            simulate_calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            diff_errors: Mutex::new(HashMap::new()),
            merge_base_errors: Mutex::new(HashMap::new()),
            simulate_errors: Mutex::new(HashMap::new()),
        }
    }

    /// Create a mock whose branches changed the given files
    pub fn with_branches(entries: &[(&str, &[&str])]) -> Self {
        let mock = Self::new();
        for (branch, files) in entries {
            mock.set_changed_files(branch, files);
        }
        mock
    }

    // === Response setup ===

    /// Set the files `branch` changed relative to any base
    pub fn set_changed_files(&self, branch: &str, files: &[&str]) {
        self.changed_files.lock().unwrap().insert(
            branch.to_string(),
            files.iter().map(|f| (*f).to_string()).collect(),
        );
    }

    /// Set the raw simulator result for a pair
    pub fn set_merge_response(&self, a: &str, b: &str, result: SimulatedMerge) {
        self.merge_responses.lock().unwrap().insert(key(a, b), result);
    }

    /// Make a pair report content conflicts in `files`
    pub fn set_conflicts(&self, a: &str, b: &str, files: &[&str]) {
        let mut output = String::from("1f2e3d4c5b6a79881f2e3d4c5b6a79881f2e3d4c\n");
        for file in files {
            output.push_str(&format!("CONFLICT (content): Merge conflict in {file}\n"));
        }
        self.set_merge_response(a, b, SimulatedMerge::failed(output));
    }

    /// Delay the simulation of a pair
    pub fn set_delay(&self, a: &str, b: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(key(a, b), delay);
    }

    // === Error injection methods ===

    /// Make `changed_files` fail for `branch`
    pub fn fail_diff(&self, branch: &str, msg: &str) {
        self.diff_errors
            .lock()
            .unwrap()
            .insert(branch.to_string(), msg.to_string());
    }

    /// Make `merge_base` fail for a pair
    pub fn fail_merge_base(&self, a: &str, b: &str, msg: &str) {
        self.merge_base_errors
            .lock()
            .unwrap()
            .insert(key(a, b), msg.to_string());
    }

    /// Make `simulate_merge` return `Err` for a pair
    pub fn fail_simulate(&self, a: &str, b: &str, msg: &str) {
        self.simulate_errors
            .lock()
            .unwrap()
            .insert(key(a, b), msg.to_string());
    }

    // === Call inspection ===

    /// Branches passed to `changed_files`, in call order
    pub fn diff_calls(&self) -> Vec<String> {
        self.diff_calls.lock().unwrap().clone()
    }

    /// Pairs passed to `simulate_merge`, in call order
    pub fn simulate_calls(&self) -> Vec<SimulateCall> {
        self.simulate_calls.lock().unwrap().clone()
    }

    /// Number of `simulate_merge` calls
    pub fn simulate_call_count(&self) -> usize {
        self.simulate_calls.lock().unwrap().len()
    }

    /// Highest number of simulations observed running at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Assert `simulate_merge` was called for the pair
    pub fn assert_simulated(&self, a: &str, b: &str) {
        let calls = self.simulate_calls();
        assert!(
            calls.iter().any(|c| c.branch_a == a && c.branch_b == b),
            "expected simulate_merge({a}, {b}), got {calls:?}"
        );
    }
}

#[async_trait]
impl DiffCollector for MockVcs {
    async fn changed_files(&self, _base: &str, branch: &str) -> Result<Vec<String>> {
        self.diff_calls.lock().unwrap().push(branch.to_string());

        if let Some(msg) = self.diff_errors.lock().unwrap().get(branch) {
            return Err(Error::Diff {
                branch: branch.to_string(),
                message: msg.clone(),
            });
        }

        self.changed_files
            .lock()
            .unwrap()
            .get(branch)
            .cloned()
            .ok_or_else(|| Error::Diff {
                branch: branch.to_string(),
                message: format!("unknown revision '{branch}'"),
            })
    }
}

#[async_trait]
impl MergeSimulator for MockVcs {
    async fn merge_base(&self, branch_a: &str, branch_b: &str) -> Result<String> {
        self.merge_base_calls
            .lock()
            .unwrap()
            .push(key(branch_a, branch_b));

        if let Some(msg) = self.merge_base_errors.lock().unwrap().get(&key(branch_a, branch_b)) {
            return Err(Error::Git {
                command: "merge-base".to_string(),
                message: msg.clone(),
            });
        }
        Ok("0000base".to_string())
    }

    async fn simulate_merge(
        &self,
        ancestor: &str,
        branch_a: &str,
        branch_b: &str,
    ) -> Result<SimulatedMerge> {
        self.simulate_calls.lock().unwrap().push(SimulateCall {
            ancestor: ancestor.to_string(),
            branch_a: branch_a.to_string(),
            branch_b: branch_b.to_string(),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self
            .delays
            .lock()
            .unwrap()
            .get(&key(branch_a, branch_b))
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(msg) = self.simulate_errors.lock().unwrap().get(&key(branch_a, branch_b)) {
            return Err(Error::Git {
                command: "merge-tree".to_string(),
                message: msg.clone(),
            });
        }

        Ok(self
            .merge_responses
            .lock()
            .unwrap()
            .get(&key(branch_a, branch_b))
            .cloned()
            .unwrap_or_else(|| SimulatedMerge::clean("4b825dc642cb6eb9a060e54bf8d69288fbee4904")))
    }
}
