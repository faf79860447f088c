//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ConstraintError: unparseable version expressions (recovered, dependency skipped)
//! - SelectError: constraint matches nothing published (recovered, dependency skipped)
//! - IndexError: version index communication failures
//! - DeclarationError: declaration file location, parsing and rewriting
//! - VcsError: repository precondition and commit failures
//! - ValidatorError: failures launching the test command itself
//!
//! A validator run that exits non-zero is not an error anywhere in this
//! hierarchy; it is the signal the upgrade search consumes.

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    #[error(transparent)]
    Select(#[from] SelectError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    #[error(transparent)]
    Vcs(#[from] VcsError),

    #[error(transparent)]
    Validator(#[from] ValidatorError),
}

/// Errors from parsing a version constraint expression
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    /// A clause of the expression does not match `OP VERSION`
    #[error("malformed constraint '{expression}': clause '{clause}' does not match 'OP VERSION'")]
    Malformed { expression: String, clause: String },
}

impl ConstraintError {
    /// Creates a new Malformed error
    pub fn malformed(expression: impl Into<String>, clause: impl Into<String>) -> Self {
        ConstraintError::Malformed {
            expression: expression.into(),
            clause: clause.into(),
        }
    }
}

/// Errors from candidate selection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// The declared constraint matches no published version at all
    #[error("constraint '{constraint}' of '{package}' matches no published version")]
    NoSatisfyingVersion { package: String, constraint: String },
}

impl SelectError {
    /// Creates a new NoSatisfyingVersion error
    pub fn no_satisfying_version(
        package: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        SelectError::NoSatisfyingVersion {
            package: package.into(),
            constraint: constraint.into(),
        }
    }
}

/// Errors from the version index provider
#[derive(Error, Debug)]
pub enum IndexError {
    /// The package does not exist in the index (distinct from a package
    /// with zero releases)
    #[error("package '{package}' not found in {index}")]
    PackageNotFound { package: String, index: String },

    /// Network request failed
    #[error("failed to fetch '{package}' from {index}: {message}")]
    Network {
        package: String,
        index: String,
        message: String,
    },

    /// The index answered with something unparseable
    #[error("invalid response from {index} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        index: String,
        message: String,
    },
}

impl IndexError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, index: impl Into<String>) -> Self {
        IndexError::PackageNotFound {
            package: package.into(),
            index: index.into(),
        }
    }

    /// Creates a new Network error
    pub fn network(
        package: impl Into<String>,
        index: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        IndexError::Network {
            package: package.into(),
            index: index.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        index: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        IndexError::InvalidResponse {
            package: package.into(),
            index: index.into(),
            message: message.into(),
        }
    }
}

/// Errors from the declaration store
#[derive(Error, Debug)]
pub enum DeclarationError {
    /// No declaration file in the project directory or its subdirectories
    #[error("declaration file not found under {path}")]
    NotFound { path: PathBuf },

    /// Failed to read the declaration file
    #[error("failed to read declaration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to persist a version change; the caller must attempt to
    /// restore the original value before propagating this
    #[error("failed to write declaration file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line that looks like an entry but does not parse
    #[error("malformed entry at line {line} of {path}: {content}")]
    MalformedEntry {
        path: PathBuf,
        line: usize,
        content: String,
    },

    /// A rewrite named a dependency the file does not declare
    #[error("no entry named '{name}' in {path}")]
    UnknownEntry { path: PathBuf, name: String },
}

impl DeclarationError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        DeclarationError::NotFound { path: path.into() }
    }

    /// Creates a new Read error
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DeclarationError::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new Write error
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DeclarationError::Write {
            path: path.into(),
            source,
        }
    }

    /// Creates a new UnknownEntry error
    pub fn unknown_entry(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        DeclarationError::UnknownEntry {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// Errors from the version control collaborator
#[derive(Error, Debug)]
pub enum VcsError {
    /// Uncommitted changes present before the run started
    #[error("repository is not clean, commit or revert your changes first")]
    DirtyRepository,

    /// A vcs command could not be run or exited non-zero
    #[error("vcs command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },
}

impl VcsError {
    /// Creates a new CommandFailed error
    pub fn command_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        VcsError::CommandFailed {
            command: command.into(),
            message: message.into(),
        }
    }
}

/// Errors launching the validator process (not validator failures)
#[derive(Error, Debug)]
pub enum ValidatorError {
    /// Could not create the log file for the attempt
    #[error("failed to create log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not spawn or wait on the test command
    #[error("failed to run test command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}
