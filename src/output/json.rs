//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of the run summary
//! - Per-dependency outcome and attempt information

use crate::domain::{DependencyReport, RunSummary};
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Whether commits were suppressed
    dry_run: bool,
    /// Summary statistics
    summary: JsonStats,
    /// Per-dependency results
    dependencies: Vec<JsonDependency<'a>>,
    /// Commits produced
    #[serde(skip_serializing_if = "Vec::is_empty")]
    commits: Vec<JsonCommit<'a>>,
    /// Where validator logs were written
    #[serde(skip_serializing_if = "Option::is_none")]
    log_root: Option<String>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonStats {
    /// Dependencies upgraded all the way
    full_successes: usize,
    /// Dependencies upgraded below their newest candidate
    partial_successes: usize,
    /// Dependencies where every candidate failed
    total_failures: usize,
    /// Dependencies never searched
    skipped: usize,
}

/// JSON representation of one dependency result
#[derive(Serialize)]
struct JsonDependency<'a> {
    /// Dependency name as declared
    name: &'a str,
    /// The constraint expression before the run
    from: &'a str,
    /// Final classification
    outcome: &'a crate::domain::DependencyOutcome,
    /// Validator attempts, in probing order (verbose only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attempts: Vec<JsonAttempt<'a>>,
}

/// JSON representation of one validator attempt
#[derive(Serialize)]
struct JsonAttempt<'a> {
    /// The probed version
    version: &'a str,
    /// Whether the validator passed
    passed: bool,
    /// Captured log path
    #[serde(skip_serializing_if = "Option::is_none")]
    log: Option<String>,
}

/// JSON representation of a commit
#[derive(Serialize)]
struct JsonCommit<'a> {
    /// Commit identifier
    id: &'a str,
    /// Commit message
    message: &'a str,
}

impl JsonFormatter {
    fn dependency_to_json<'a>(&self, report: &'a DependencyReport) -> JsonDependency<'a> {
        let attempts = if self.verbosity == Verbosity::Verbose {
            report
                .attempts
                .iter()
                .map(|a| JsonAttempt {
                    version: a.version.as_str(),
                    passed: a.passed,
                    log: a.log_path.as_ref().map(|p| p.display().to_string()),
                })
                .collect()
        } else {
            Vec::new()
        };

        JsonDependency {
            name: &report.name,
            from: &report.from,
            outcome: &report.outcome,
            attempts,
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, summary: &RunSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            dry_run: summary.dry_run,
            summary: JsonStats {
                full_successes: summary.full_successes().count(),
                partial_successes: summary.partial_successes().count(),
                total_failures: summary.total_failures().count(),
                skipped: summary.skipped().count(),
            },
            dependencies: summary
                .reports
                .iter()
                .map(|r| self.dependency_to_json(r))
                .collect(),
            commits: summary
                .commits
                .iter()
                .map(|c| JsonCommit {
                    id: &c.id,
                    message: &c.message,
                })
                .collect(),
            log_root: summary.log_root.as_ref().map(|p| p.display().to_string()),
        };

        serde_json::to_writer_pretty(&mut *writer, &output)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AttemptRecord, CommitRecord, DependencyOutcome, DependencyReport, SkipReason, Version,
    };

    fn v(s: &str) -> Version {
        Version::parse(s)
    }

    fn sample_summary() -> RunSummary {
        let mut summary = RunSummary::new(false);
        summary.add_report(DependencyReport::new(
            "requests",
            ">=2.0,<3.0",
            DependencyOutcome::full_success(v("3.1")),
            vec![AttemptRecord::new("requests", v("3.1"), true, 0).with_log("/logs/r.log")],
        ));
        summary.add_report(DependencyReport::new(
            "six",
            ">=1.0",
            DependencyOutcome::skipped(SkipReason::UpToDate),
            Vec::new(),
        ));
        summary.add_commit(CommitRecord::new(
            "abc123",
            "[enh] upgrade requests from '>=2.0,<3.0' to '== 3.1'",
        ));
        summary
    }

    fn render(formatter: JsonFormatter, summary: &RunSummary) -> serde_json::Value {
        let mut buffer = Vec::new();
        formatter.format(summary, &mut buffer).unwrap();
        serde_json::from_slice(&buffer).unwrap()
    }

    #[test]
    fn test_json_structure() {
        let value = render(JsonFormatter::new(Verbosity::Normal), &sample_summary());

        assert_eq!(value["dry_run"], false);
        assert_eq!(value["summary"]["full_successes"], 1);
        assert_eq!(value["summary"]["skipped"], 1);
        assert_eq!(value["dependencies"][0]["name"], "requests");
        assert_eq!(value["dependencies"][0]["outcome"]["type"], "full_success");
        assert_eq!(value["dependencies"][0]["outcome"]["final_version"], "3.1");
        assert_eq!(value["commits"][0]["id"], "abc123");
    }

    #[test]
    fn test_attempts_only_in_verbose() {
        let normal = render(JsonFormatter::new(Verbosity::Normal), &sample_summary());
        assert!(normal["dependencies"][0].get("attempts").is_none());

        let verbose = render(JsonFormatter::new(Verbosity::Verbose), &sample_summary());
        assert_eq!(verbose["dependencies"][0]["attempts"][0]["version"], "3.1");
        assert_eq!(verbose["dependencies"][0]["attempts"][0]["passed"], true);
        assert_eq!(verbose["dependencies"][0]["attempts"][0]["log"], "/logs/r.log");
    }

    #[test]
    fn test_log_root_omitted_when_absent() {
        let value = render(JsonFormatter::new(Verbosity::Normal), &sample_summary());
        assert!(value.get("log_root").is_none());
    }
}
