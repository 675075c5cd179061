//! merge-radar - conflict analysis for parallel git branches
//!
//! Finds files touched by more than one branch, optionally confirms real
//! three-way conflicts with non-destructive simulated merges, and suggests
//! a merge order that keeps remaining overlap low at every step.
//!
//! Nothing in this crate merges, resolves conflicts or moves refs. Git is
//! reached only through the [`vcs::DiffCollector`] and
//! [`vcs::MergeSimulator`] traits.

pub mod config;
pub mod error;
pub mod merge;
pub mod overlap;
pub mod progress;
pub mod types;
pub mod vcs;
