//! Search attempt and outcome types

use super::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One probed version and what the validator said about it
///
/// Append-only: records are produced during the search and never mutated
/// afterwards, so the summary is a faithful trail of what was tried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Dependency name
    pub package: String,
    /// The version that was applied and validated
    pub version: Version,
    /// Whether the validator passed
    pub passed: bool,
    /// Position of this attempt in the probing sequence, starting at 0
    pub ordinal: usize,
    /// Where the validator output was captured, when a real validator ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,
}

impl AttemptRecord {
    /// Creates a new attempt record
    pub fn new(package: impl Into<String>, version: Version, passed: bool, ordinal: usize) -> Self {
        Self {
            package: package.into(),
            version,
            passed,
            ordinal,
            log_path: None,
        }
    }

    /// Attaches the captured validator log path
    pub fn with_log(mut self, log_path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(log_path.into());
        self
    }
}

impl fmt::Display for AttemptRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.passed { "pass" } else { "fail" };
        write!(f, "{} @ {}: {}", self.package, self.version, verdict)
    }
}

/// Reason why a dependency was never searched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No published version is newer than the current best
    UpToDate,
    /// No constraint declared; without a bound there is nothing to upgrade from
    Unpinned,
    /// The constraint expression did not parse
    MalformedConstraint(String),
    /// The declared constraint matches nothing published
    NoSatisfyingVersion,
    /// The version index has no such package
    PackageNotFound,
    /// The version index could not be queried
    FetchFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UpToDate => write!(f, "up to date"),
            SkipReason::Unpinned => write!(f, "no version constraint declared"),
            SkipReason::MalformedConstraint(msg) => write!(f, "malformed constraint: {}", msg),
            SkipReason::NoSatisfyingVersion => {
                write!(f, "constraint matches no published version")
            }
            SkipReason::PackageNotFound => write!(f, "not found in the version index"),
            SkipReason::FetchFailed(msg) => write!(f, "fetch failed: {}", msg),
        }
    }
}

/// Final classification of one dependency for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DependencyOutcome {
    /// The newest candidate passed
    FullSuccess {
        /// The version now pinned in the declaration file
        final_version: Version,
    },
    /// Some candidate passed, but a newer one failed
    PartialSuccess {
        /// The highest confirmed-passing version, now pinned
        final_version: Version,
        /// Candidates from the first failure onward that were not adopted
        remaining: Vec<Version>,
    },
    /// No candidate passed; the original declaration was restored
    TotalFailure {
        /// Every version tried, in attempt order
        attempted: Vec<Version>,
    },
    /// The search never ran
    Skipped {
        /// Why the dependency was skipped
        reason: SkipReason,
    },
}

impl DependencyOutcome {
    /// Creates a FullSuccess outcome
    pub fn full_success(final_version: Version) -> Self {
        DependencyOutcome::FullSuccess { final_version }
    }

    /// Creates a PartialSuccess outcome
    pub fn partial_success(final_version: Version, remaining: Vec<Version>) -> Self {
        DependencyOutcome::PartialSuccess {
            final_version,
            remaining,
        }
    }

    /// Creates a TotalFailure outcome
    pub fn total_failure(attempted: Vec<Version>) -> Self {
        DependencyOutcome::TotalFailure { attempted }
    }

    /// Creates a Skipped outcome
    pub fn skipped(reason: SkipReason) -> Self {
        DependencyOutcome::Skipped { reason }
    }

    /// True for FullSuccess and PartialSuccess (the outcomes that commit)
    pub fn is_upgrade(&self) -> bool {
        matches!(
            self,
            DependencyOutcome::FullSuccess { .. } | DependencyOutcome::PartialSuccess { .. }
        )
    }

    /// The version left pinned in the declaration file, if any
    pub fn final_version(&self) -> Option<&Version> {
        match self {
            DependencyOutcome::FullSuccess { final_version } => Some(final_version),
            DependencyOutcome::PartialSuccess { final_version, .. } => Some(final_version),
            _ => None,
        }
    }
}

impl fmt::Display for DependencyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyOutcome::FullSuccess { final_version } => {
                write!(f, "upgraded to latest {}", final_version)
            }
            DependencyOutcome::PartialSuccess {
                final_version,
                remaining,
            } => write!(
                f,
                "upgraded to {} ({} newer version(s) failed)",
                final_version,
                remaining.len()
            ),
            DependencyOutcome::TotalFailure { attempted } => {
                write!(f, "not upgradable ({} version(s) tried)", attempted.len())
            }
            DependencyOutcome::Skipped { reason } => write!(f, "skipped ({})", reason),
        }
    }
}
