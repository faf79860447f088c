//! Version control collaborator
//!
//! The coordinator needs two operations: a cleanliness check before the run
//! mutates anything, and a commit per successful upgrade. Both go through
//! the `Vcs` trait so tests can substitute a fake; the real implementation
//! drives git.

use crate::error::VcsError;
use std::path::PathBuf;
use std::process::Command;

/// The commit collaborator
pub trait Vcs {
    /// Fail with `DirtyRepository` if tracked files have uncommitted changes
    ///
    /// Checked once, at run start; not per attempt. Untracked files do not
    /// count: validator logs are written into the working tree during the
    /// run, and `commit` only picks up tracked changes anyway.
    fn ensure_clean(&self) -> Result<(), VcsError>;

    /// Commit all tracked changes and return the new commit identifier
    fn commit(&self, message: &str) -> Result<String, VcsError>;
}

/// Git implementation of the commit collaborator
pub struct GitVcs {
    workdir: PathBuf,
}

impl GitVcs {
    /// Creates a git collaborator for the given repository directory
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    fn run_git(&self, args: &[&str]) -> Result<String, VcsError> {
        let rendered = format!("git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| VcsError::command_failed(&rendered, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VcsError::command_failed(rendered, stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Vcs for GitVcs {
    fn ensure_clean(&self) -> Result<(), VcsError> {
        let status = self.run_git(&["status", "--porcelain", "--untracked-files=no"])?;
        if status.trim().is_empty() {
            Ok(())
        } else {
            Err(VcsError::DirtyRepository)
        }
    }

    fn commit(&self, message: &str) -> Result<String, VcsError> {
        self.run_git(&["commit", "-am", message])?;
        let head = self.run_git(&["rev-parse", "HEAD"])?;
        Ok(head.trim().to_string())
    }
}
