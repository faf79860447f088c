//! Upgrade search engine
//!
//! Probes a dependency's upgrade candidates against the caller-supplied
//! validator and classifies the result. The newest candidate is tried first
//! so the common case (newest just works) costs a single validator run; only
//! on failure does the engine pay for an ascending scan over the remaining
//! candidates.
//!
//! The fallback scan does not stop at the first pass: validator failures are
//! not monotonic in version order, so the scan keeps probing forward for the
//! highest passing version and only stops once a failure lands after a
//! recorded pass. Whatever the outcome, the version left on disk when the
//! search returns is the one embedded in the outcome, or the pristine
//! original for a total failure.

use crate::domain::{AttemptRecord, DependencyOutcome, DependencySpec, SkipReason, Version};
use crate::error::{DeclarationError, ValidatorError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a `VersionTrial` implementation
///
/// These abort the search for the dependency; a validator that merely exits
/// non-zero is a `Validation` with `passed: false`, not an error.
#[derive(Error, Debug)]
pub enum TrialError {
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    #[error(transparent)]
    Validator(#[from] ValidatorError),
}

impl From<TrialError> for crate::error::AppError {
    fn from(err: TrialError) -> Self {
        match err {
            TrialError::Declaration(e) => e.into(),
            TrialError::Validator(e) => e.into(),
        }
    }
}

/// What one validator run said
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    /// Whether the validator exited 0
    pub passed: bool,
    /// Where its output was captured, when a real validator ran
    pub log_path: Option<PathBuf>,
}

impl Validation {
    /// Creates a validation result without a log (used by test doubles)
    pub fn new(passed: bool) -> Self {
        Self {
            passed,
            log_path: None,
        }
    }

    /// Attaches the captured log path
    pub fn with_log(mut self, log_path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(log_path.into());
        self
    }
}

/// The apply / validate / restore seam the engine drives
///
/// Implementations own the on-disk side effects: rewriting the declaration
/// entry and running the test command. The engine guarantees `apply` is
/// called before every `validate` and that `restore` puts the original
/// declaration back.
pub trait VersionTrial {
    /// Persist `version` into the declaration entry
    fn apply(&mut self, version: &Version) -> Result<(), TrialError>;

    /// Run the validator against the currently applied version
    fn validate(&mut self, version: &Version) -> Result<Validation, TrialError>;

    /// Persist the original, pre-search declaration entry
    fn restore(&mut self) -> Result<(), TrialError>;
}

/// Outcome of a search plus the trail of attempts that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub outcome: DependencyOutcome,
    pub attempts: Vec<AttemptRecord>,
}

/// Search for the newest candidate version that passes the validator
///
/// Deterministic: candidates are probed in a fixed order, each version is
/// validated exactly once, and no attempt is retried.
pub fn search(
    spec: &DependencySpec,
    trial: &mut dyn VersionTrial,
) -> Result<SearchResult, TrialError> {
    let mut attempts = Vec::new();

    let Some(newest) = spec.newest_candidate() else {
        return Ok(SearchResult {
            outcome: DependencyOutcome::skipped(SkipReason::UpToDate),
            attempts,
        });
    };

    // Step 1: the newest candidate first
    let validation = apply_and_validate(trial, newest)?;
    attempts.push(record(spec, newest, &validation, attempts.len()));

    if validation.passed {
        return Ok(SearchResult {
            outcome: DependencyOutcome::full_success(newest.clone()),
            attempts,
        });
    }

    if spec.candidates.len() == 1 {
        trial.restore()?;
        return Ok(SearchResult {
            outcome: DependencyOutcome::total_failure(vec![newest.clone()]),
            attempts,
        });
    }

    // Step 2: ascending fallback scan over everything below the newest
    let mut attempted = vec![newest.clone()];
    let mut last_good: Option<Version> = None;
    let below_newest = &spec.candidates[..spec.candidates.len() - 1];

    for (index, candidate) in below_newest.iter().enumerate() {
        let validation = apply_and_validate(trial, candidate)?;
        attempts.push(record(spec, candidate, &validation, attempts.len()));
        attempted.push(candidate.clone());

        if validation.passed {
            last_good = Some(candidate.clone());
            continue;
        }

        return match last_good {
            Some(good) => {
                // Re-apply the last passing version, not an arbitrary prior
                // state: it is the practical upgrade ceiling
                trial.apply(&good)?;
                Ok(SearchResult {
                    outcome: DependencyOutcome::partial_success(
                        good,
                        spec.candidates[index..].to_vec(),
                    ),
                    attempts,
                })
            }
            None => {
                trial.restore()?;
                Ok(SearchResult {
                    outcome: DependencyOutcome::total_failure(attempted),
                    attempts,
                })
            }
        };
    }

    // Scan exhausted with no failure after a pass: only the newest candidate
    // is broken, and the second-highest (already applied) is the ceiling
    match last_good {
        Some(good) => Ok(SearchResult {
            outcome: DependencyOutcome::partial_success(good, vec![newest.clone()]),
            attempts,
        }),
        // Every loop iteration either records a pass or returns, so this arm
        // is unreachable; restoring is still the safe answer
        None => {
            trial.restore()?;
            Ok(SearchResult {
                outcome: DependencyOutcome::total_failure(attempted),
                attempts,
            })
        }
    }
}

/// Apply a version and run the validator, restoring the original on error
///
/// A half-written, unvalidated version left on disk is worse than the error
/// itself, so the restore attempt happens before propagating and its own
/// failure does not mask the first one.
fn apply_and_validate(
    trial: &mut dyn VersionTrial,
    version: &Version,
) -> Result<Validation, TrialError> {
    if let Err(err) = trial.apply(version) {
        let _ = trial.restore();
        return Err(err);
    }

    match trial.validate(version) {
        Ok(validation) => Ok(validation),
        Err(err) => {
            let _ = trial.restore();
            Err(err)
        }
    }
}

fn record(
    spec: &DependencySpec,
    version: &Version,
    validation: &Validation,
    ordinal: usize,
) -> AttemptRecord {
    let mut attempt = AttemptRecord::new(&spec.name, version.clone(), validation.passed, ordinal);
    if let Some(log_path) = &validation.log_path {
        attempt = attempt.with_log(log_path);
    }
    attempt
}
