//! Run summary types
//!
//! The coordinator accumulates one `DependencyReport` per dependency and one
//! `CommitRecord` per successful upgrade; the summary is read-only once the
//! run ends and is what the output formatters render.

use super::{AttemptRecord, DependencyOutcome};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A commit produced for a successful upgrade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// The commit identifier reported by the vcs
    pub id: String,
    /// The commit message
    pub message: String,
}

impl CommitRecord {
    /// Creates a new commit record
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
        }
    }
}

/// Everything that happened to one dependency during the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyReport {
    /// Dependency name as declared
    pub name: String,
    /// The constraint expression before the run
    pub from: String,
    /// Final classification
    pub outcome: DependencyOutcome,
    /// Every validator attempt, in probing order
    pub attempts: Vec<AttemptRecord>,
}

impl DependencyReport {
    /// Creates a new dependency report
    pub fn new(
        name: impl Into<String>,
        from: impl Into<String>,
        outcome: DependencyOutcome,
        attempts: Vec<AttemptRecord>,
    ) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
            outcome,
            attempts,
        }
    }

    /// The last captured validator log of this dependency, if any
    pub fn last_log(&self) -> Option<&PathBuf> {
        self.attempts.iter().rev().find_map(|a| a.log_path.as_ref())
    }
}

/// Aggregated result of a whole run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// One report per processed dependency, in processing order
    pub reports: Vec<DependencyReport>,
    /// Commits produced, in creation order
    pub commits: Vec<CommitRecord>,
    /// Where validator logs were written, if any validator ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_root: Option<PathBuf>,
    /// Whether commits were suppressed
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates an empty summary
    pub fn new(dry_run: bool) -> Self {
        Self {
            reports: Vec::new(),
            commits: Vec::new(),
            log_root: None,
            dry_run,
        }
    }

    /// Appends a dependency report
    pub fn add_report(&mut self, report: DependencyReport) {
        self.reports.push(report);
    }

    /// Appends a commit record
    pub fn add_commit(&mut self, commit: CommitRecord) {
        self.commits.push(commit);
    }

    /// Records the validator log directory
    pub fn set_log_root(&mut self, log_root: impl Into<PathBuf>) {
        self.log_root = Some(log_root.into());
    }

    /// Dependencies upgraded all the way to their newest candidate
    pub fn full_successes(&self) -> impl Iterator<Item = &DependencyReport> {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, DependencyOutcome::FullSuccess { .. }))
    }

    /// Dependencies upgraded to some intermediate version
    pub fn partial_successes(&self) -> impl Iterator<Item = &DependencyReport> {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, DependencyOutcome::PartialSuccess { .. }))
    }

    /// Dependencies where every candidate failed
    pub fn total_failures(&self) -> impl Iterator<Item = &DependencyReport> {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, DependencyOutcome::TotalFailure { .. }))
    }

    /// Dependencies the search never ran for
    pub fn skipped(&self) -> impl Iterator<Item = &DependencyReport> {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, DependencyOutcome::Skipped { .. }))
    }

    /// Number of dependencies that ended in an upgrade
    pub fn upgraded_count(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_upgrade()).count()
    }

    /// True if any dependency was upgraded
    pub fn has_upgrades(&self) -> bool {
        self.upgraded_count() > 0
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SkipReason, Version};

    fn v(s: &str) -> Version {
        Version::parse(s)
    }

    fn full(name: &str) -> DependencyReport {
        DependencyReport::new(
            name,
            ">=1.0",
            DependencyOutcome::full_success(v("2.0")),
            vec![AttemptRecord::new(name, v("2.0"), true, 0).with_log("/logs/a.log")],
        )
    }

    fn partial(name: &str) -> DependencyReport {
        DependencyReport::new(
            name,
            ">=1.0",
            DependencyOutcome::partial_success(v("1.5"), vec![v("2.0")]),
            vec![
                AttemptRecord::new(name, v("2.0"), false, 0),
                AttemptRecord::new(name, v("1.5"), true, 1),
            ],
        )
    }

    fn failed(name: &str) -> DependencyReport {
        DependencyReport::new(
            name,
            ">=1.0",
            DependencyOutcome::total_failure(vec![v("2.0")]),
            vec![AttemptRecord::new(name, v("2.0"), false, 0)],
        )
    }

    fn skipped(name: &str) -> DependencyReport {
        DependencyReport::new(
            name,
            ">=1.0",
            DependencyOutcome::skipped(SkipReason::UpToDate),
            Vec::new(),
        )
    }

    #[test]
    fn test_summary_categories() {
        let mut summary = RunSummary::new(false);
        summary.add_report(full("a"));
        summary.add_report(partial("b"));
        summary.add_report(failed("c"));
        summary.add_report(skipped("d"));

        assert_eq!(summary.full_successes().count(), 1);
        assert_eq!(summary.partial_successes().count(), 1);
        assert_eq!(summary.total_failures().count(), 1);
        assert_eq!(summary.skipped().count(), 1);
        assert_eq!(summary.upgraded_count(), 2);
        assert!(summary.has_upgrades());
    }

    #[test]
    fn test_summary_commit_count_matches_upgrades() {
        let mut summary = RunSummary::new(false);
        summary.add_report(full("a"));
        summary.add_report(partial("b"));
        summary.add_report(failed("c"));
        summary.add_commit(CommitRecord::new("abc123", "upgrade a"));
        summary.add_commit(CommitRecord::new("def456", "upgrade b"));

        assert_eq!(summary.commits.len(), summary.upgraded_count());
    }

    #[test]
    fn test_summary_empty() {
        let summary = RunSummary::default();
        assert!(!summary.has_upgrades());
        assert!(!summary.dry_run);
        assert_eq!(summary.upgraded_count(), 0);
        assert!(summary.log_root.is_none());
    }

    #[test]
    fn test_report_last_log() {
        let report = partial("b");
        assert_eq!(report.last_log(), None);

        let report = full("a");
        assert_eq!(report.last_log(), Some(&PathBuf::from("/logs/a.log")));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut summary = RunSummary::new(true);
        summary.add_report(full("a"));
        summary.add_commit(CommitRecord::new("abc123", "upgrade a"));
        summary.set_log_root("/logs");

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"dry_run\":true"));
        let parsed: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, summary);
    }
}
