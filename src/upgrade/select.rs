//! Candidate selection
//!
//! Given every published version of a package and its declared constraint,
//! computes the highest currently-satisfying version and the ordered list of
//! possible upgrades: the published versions strictly greater than that
//! maximum. Strictly greater, not greater-or-equal — the version the project
//! already accepts is never re-tried.

use crate::domain::{Version, VersionConstraint};
use crate::error::SelectError;

/// Result of candidate selection for one dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// The highest published version the constraint accepts
    pub max_satisfying: Version,
    /// Published versions strictly newer than `max_satisfying`, ascending
    pub candidates: Vec<Version>,
}

/// Select the upgrade candidates for one dependency
///
/// Fails with `NoSatisfyingVersion` when the constraint accepts none of the
/// published versions; the declared constraint then points at nothing real
/// and the dependency is skipped rather than upgraded. An empty `candidates`
/// list means the dependency is already up to date.
pub fn select(
    package: &str,
    all_versions: &[Version],
    constraint: &VersionConstraint,
) -> Result<Selection, SelectError> {
    let mut sorted = all_versions.to_vec();
    sorted.sort();

    let max_satisfying = sorted
        .iter()
        .filter(|v| constraint.satisfies(v))
        .max()
        .cloned()
        .ok_or_else(|| {
            SelectError::no_satisfying_version(package, constraint.to_string())
        })?;

    let candidates = sorted
        .into_iter()
        .skip_while(|v| *v <= max_satisfying)
        .collect();

    Ok(Selection {
        max_satisfying,
        candidates,
    })
}
