//! Validator process runner
//!
//! Runs the externally supplied test command once per attempt, blocking
//! until it finishes. Exit status 0 is a pass, anything else is a fail; the
//! command's stdout and stderr are captured into a per-attempt log file so
//! every attempt of a run can be audited afterwards. No timeout is imposed.

use crate::error::ValidatorError;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Runs the test command under `sh -c` in the project directory
#[derive(Debug, Clone)]
pub struct Validator {
    command: String,
    workdir: PathBuf,
}

impl Validator {
    /// Creates a validator for the given shell command
    pub fn new(command: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            workdir: workdir.into(),
        }
    }

    /// The shell command this validator runs
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Run the command once, capturing output into `log_path`
    ///
    /// Returns whether the command exited 0. Failing to create the log file
    /// or to spawn the command is an error; a non-zero exit status is not.
    pub fn run(&self, log_path: &Path) -> Result<bool, ValidatorError> {
        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent).map_err(|source| ValidatorError::LogFile {
                path: log_path.to_path_buf(),
                source,
            })?;
        }

        let log = File::create(log_path).map_err(|source| ValidatorError::LogFile {
            path: log_path.to_path_buf(),
            source,
        })?;
        let log_for_stderr = log.try_clone().map_err(|source| ValidatorError::LogFile {
            path: log_path.to_path_buf(),
            source,
        })?;

        let status = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(log))
            .stderr(Stdio::from(log_for_stderr))
            .status()
            .map_err(|source| ValidatorError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        Ok(status.success())
    }
}
