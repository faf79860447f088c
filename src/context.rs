//! Run-wide context
//!
//! A run shares a project directory, a log root and a single session
//! timestamp. Passing these around explicitly (instead of reading the
//! working directory or the clock ad hoc) keeps every validator log of one
//! run under the same session directory.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Shared state of one run
#[derive(Debug, Clone)]
pub struct RunContext {
    /// The directory holding the declaration file and the code under test
    pub project_dir: PathBuf,
    /// Root directory for validator logs
    pub log_root: PathBuf,
    /// When the run started; names the per-session log directory
    pub started_at: DateTime<Local>,
}

impl RunContext {
    /// Creates a context starting now
    pub fn new(project_dir: impl Into<PathBuf>, log_root: impl Into<PathBuf>) -> Self {
        Self::with_time(project_dir, log_root, Local::now())
    }

    /// Creates a context with a fixed start time (for testing)
    pub fn with_time(
        project_dir: impl Into<PathBuf>,
        log_root: impl Into<PathBuf>,
        started_at: DateTime<Local>,
    ) -> Self {
        Self {
            project_dir: project_dir.into(),
            log_root: log_root.into(),
            started_at,
        }
    }

    /// The log directory of this session
    pub fn session_dir(&self) -> PathBuf {
        self.log_root
            .join(self.started_at.format("%Y-%m-%d-%H:%M:%S").to_string())
    }

    /// The log file for one upgrade attempt
    ///
    /// Unique per (dependency, fromConstraint, toVersion) so every validator
    /// run of the session stays auditable. Spaces are stripped because the
    /// original constraint expression may contain them.
    pub fn attempt_log_path(&self, name: &str, from: &str, to: &str) -> PathBuf {
        let file_name = format!("upgrade_{}_from_{}_to_{}.log", name, from, to).replace(' ', "");
        self.session_dir().join(file_name)
    }

    /// The project directory as a path
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }
}
