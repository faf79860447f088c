//! Core domain types for the upgrade search
//!
//! - `Version`: loose total version ordering
//! - `VersionConstraint`: conjunction of comparison clauses
//! - `DependencySpec`: one dependency with its resolved upgrade candidates
//! - `AttemptRecord` / `DependencyOutcome`: the trail and result of a search
//! - `RunSummary`: aggregated outcomes and commits for a whole run

mod constraint;
mod dependency;
mod outcome;
mod summary;
mod version;

pub use constraint::{ComparisonOperator, ConstraintClause, VersionConstraint};
pub use dependency::{index_name, DependencySpec};
pub use outcome::{AttemptRecord, DependencyOutcome, SkipReason};
pub use summary::{CommitRecord, DependencyReport, RunSummary};
pub use version::Version;
