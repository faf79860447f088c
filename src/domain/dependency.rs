//! Dependency information structures

use super::{Version, VersionConstraint};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dependency with its resolved upgrade candidates
///
/// Built once per run from the declaration file entry and the fetched
/// version index; immutable afterwards. The currently applied version is
/// tracked by the search, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySpec {
    /// Name as declared (may carry an extras suffix like `name[extra]`)
    pub name: String,
    /// The raw constraint expression as it appears in the declaration file
    pub raw_constraint: String,
    /// The parsed constraint
    pub constraint: VersionConstraint,
    /// Every published version, sorted ascending
    pub all_versions: Vec<Version>,
    /// The highest published version satisfying the constraint
    pub max_satisfying: Version,
    /// Published versions strictly newer than `max_satisfying`, ascending
    pub candidates: Vec<Version>,
}

impl DependencySpec {
    /// The newest upgrade candidate, if any
    pub fn newest_candidate(&self) -> Option<&Version> {
        self.candidates.last()
    }
}

/// Strip an extras suffix from a declared dependency name
pub fn index_name(declared: &str) -> &str {
    declared.split('[').next().unwrap_or(declared)
}

impl fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.raw_constraint)
    }
}
