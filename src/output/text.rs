//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Grouped sections for full upgrades, capped upgrades, failures and skips
//! - Per-dependency attempt trail in verbose mode
//! - Commit listing and the validator log location

use crate::domain::{DependencyOutcome, DependencyReport, RunSummary};
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dimmed(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    /// Calculate the maximum dependency name length for alignment
    fn max_name_length(reports: &[&DependencyReport]) -> usize {
        reports.iter().map(|r| r.name.len()).max().unwrap_or(0)
    }

    fn write_upgrade_line(
        &self,
        report: &DependencyReport,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let Some(to) = report.outcome.final_version() else {
            return Ok(());
        };

        if self.color {
            writeln!(
                writer,
                "  {:width$} {} {} {}",
                report.name,
                report.from.dimmed(),
                "->".dimmed(),
                to.as_str().bright_white().bold(),
                width = width
            )?;
        } else {
            writeln!(
                writer,
                "  {:width$} {} -> {}",
                report.name,
                report.from,
                to,
                width = width
            )?;
        }

        if let DependencyOutcome::PartialSuccess { remaining, .. } = &report.outcome {
            let versions: Vec<&str> = remaining.iter().map(|v| v.as_str()).collect();
            writeln!(
                writer,
                "  {:width$} {}",
                "",
                self.dimmed(&format!("newer versions failed: {}", versions.join(", "))),
                width = width
            )?;
        }

        self.write_attempt_trail(report, width, writer)
    }

    fn write_failure_line(
        &self,
        report: &DependencyReport,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let DependencyOutcome::TotalFailure { attempted } = &report.outcome else {
            return Ok(());
        };
        let versions: Vec<&str> = attempted.iter().map(|v| v.as_str()).collect();

        let name = if self.color {
            report.name.red().to_string()
        } else {
            report.name.clone()
        };
        writeln!(
            writer,
            "  {:width$} {}",
            name,
            self.dimmed(&format!("tried {}", versions.join(", "))),
            width = width
        )?;

        if let Some(log) = report.last_log() {
            writeln!(
                writer,
                "  {:width$} {}",
                "",
                self.dimmed(&format!("last log: {}", log.display())),
                width = width
            )?;
        }

        self.write_attempt_trail(report, width, writer)
    }

    fn write_skip_line(
        &self,
        report: &DependencyReport,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let DependencyOutcome::Skipped { reason } = &report.outcome else {
            return Ok(());
        };
        writeln!(
            writer,
            "  {} {}",
            self.dimmed(&format!("{:width$}", report.name, width = width)),
            self.dimmed(&format!("({})", reason))
        )
    }

    fn write_attempt_trail(
        &self,
        report: &DependencyReport,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.verbosity != Verbosity::Verbose {
            return Ok(());
        }
        for attempt in &report.attempts {
            let verdict = if attempt.passed { "pass" } else { "fail" };
            writeln!(
                writer,
                "  {:width$} {}",
                "",
                self.dimmed(&format!("probe {}: {}", attempt.version, verdict)),
                width = width
            )?;
        }
        Ok(())
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, summary: &RunSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        let full: Vec<_> = summary.full_successes().collect();
        let partial: Vec<_> = summary.partial_successes().collect();
        let failed: Vec<_> = summary.total_failures().collect();
        let skipped: Vec<_> = summary.skipped().collect();

        let all: Vec<&DependencyReport> = summary.reports.iter().collect();
        let width = Self::max_name_length(&all).max(20);

        if summary.dry_run {
            writeln!(writer, "{}", self.dimmed("(dry-run) no commits were made"))?;
        }

        if !full.is_empty() {
            writeln!(writer, "{}", self.heading("Upgraded to the latest version:"))?;
            for report in &full {
                self.write_upgrade_line(report, width, writer)?;
            }
        }

        if !partial.is_empty() {
            writeln!(writer, "{}", self.heading("Upgraded, but newer versions exist:"))?;
            for report in &partial {
                self.write_upgrade_line(report, width, writer)?;
            }
        }

        if !failed.is_empty() {
            writeln!(writer, "{}", self.heading("Not upgradable:"))?;
            for report in &failed {
                self.write_failure_line(report, width, writer)?;
            }
        }

        if !skipped.is_empty() && self.verbosity != Verbosity::Quiet {
            writeln!(writer, "{}", self.heading("Skipped:"))?;
            for report in &skipped {
                self.write_skip_line(report, width, writer)?;
            }
        }

        if !summary.commits.is_empty() {
            writeln!(writer, "{}", self.heading("Commits:"))?;
            for commit in &summary.commits {
                let id = commit.id.get(..12).unwrap_or(&commit.id);
                writeln!(writer, "  {} {}", self.dimmed(id), commit.message)?;
            }
        }

        writeln!(
            writer,
            "{} upgraded, {} failed, {} skipped",
            summary.upgraded_count(),
            failed.len(),
            skipped.len()
        )?;

        if let Some(log_root) = &summary.log_root {
            writeln!(
                writer,
                "{}",
                self.dimmed(&format!("validator logs: {}", log_root.display()))
            )?;
        }

        Ok(())
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
            vec![AttemptRecord::new("requests", v("3.1"), true, 0)],
        ));
        summary.add_report(DependencyReport::new(
            "flask",
            "<1.2",
            DependencyOutcome::partial_success(v("1.5"), vec![v("2.0")]),
            vec![
                AttemptRecord::new("flask", v("2.0"), false, 0),
                AttemptRecord::new("flask", v("1.5"), true, 1),
            ],
        ));
        summary.add_report(DependencyReport::new(
            "lxml",
            "<4.0",
            DependencyOutcome::total_failure(vec![v("5.0"), v("4.1")]),
            vec![
                AttemptRecord::new("lxml", v("5.0"), false, 0).with_log("/logs/lxml.log"),
                AttemptRecord::new("lxml", v("4.1"), false, 1),
            ],
        ));
        summary.add_report(DependencyReport::new(
            "six",
            ">=1.0",
            DependencyOutcome::skipped(SkipReason::UpToDate),
            Vec::new(),
        ));
        summary.add_commit(CommitRecord::new(
            "0123456789abcdef0123",
            "[enh] upgrade requests from '>=2.0,<3.0' to '== 3.1'",
        ));
        summary.set_log_root("/logs/2024-01-01");
        summary
    }

    fn render(formatter: TextFormatter, summary: &RunSummary) -> String {
        let mut buffer = Vec::new();
        formatter.format(summary, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_all_sections_present() {
        let output = render(
            TextFormatter::with_color(Verbosity::Normal, false),
            &sample_summary(),
        );

        assert!(output.contains("Upgraded to the latest version:"));
        assert!(output.contains("requests"));
        assert!(output.contains(">=2.0,<3.0 -> 3.1"));
        assert!(output.contains("Upgraded, but newer versions exist:"));
        assert!(output.contains("newer versions failed: 2.0"));
        assert!(output.contains("Not upgradable:"));
        assert!(output.contains("tried 5.0, 4.1"));
        assert!(output.contains("last log: /logs/lxml.log"));
        assert!(output.contains("Skipped:"));
        assert!(output.contains("(up to date)"));
        assert!(output.contains("Commits:"));
        assert!(output.contains("0123456789ab"));
        assert!(output.contains("2 upgraded, 1 failed, 1 skipped"));
        assert!(output.contains("validator logs: /logs/2024-01-01"));
    }

    #[test]
    fn test_quiet_hides_skips() {
        let output = render(
            TextFormatter::with_color(Verbosity::Quiet, false),
            &sample_summary(),
        );

        assert!(!output.contains("Skipped:"));
        assert!(output.contains("2 upgraded, 1 failed, 1 skipped"));
    }

    #[test]
    fn test_verbose_shows_attempt_trail() {
        let output = render(
            TextFormatter::with_color(Verbosity::Verbose, false),
            &sample_summary(),
        );

        assert!(output.contains("probe 2.0: fail"));
        assert!(output.contains("probe 1.5: pass"));
    }

    #[test]
    fn test_dry_run_banner() {
        let mut summary = sample_summary();
        summary.dry_run = true;
        let output = render(TextFormatter::with_color(Verbosity::Normal, false), &summary);

        assert!(output.contains("(dry-run) no commits were made"));
    }

    #[test]
    fn test_empty_summary_renders_counts_only() {
        let summary = RunSummary::new(false);
        let output = render(TextFormatter::with_color(Verbosity::Normal, false), &summary);

        assert!(!output.contains("Upgraded"));
        assert!(!output.contains("Commits:"));
        assert!(output.contains("0 upgraded, 0 failed, 0 skipped"));
    }
}
