//! depclimb - Test-driven dependency upgrader library
//!
//! This library provides the core functionality for upgrading declared
//! dependencies as far as an external test command allows:
//! - Parse the declaration file and the version constraints it pins
//! - Fetch published versions and select upgrade candidates
//! - Probe candidates newest-first against the test command
//! - Commit what passed, restore what did not

pub mod cli;
pub mod context;
pub mod coordinator;
pub mod declaration;
pub mod domain;
pub mod error;
pub mod output;
pub mod progress;
pub mod registry;
pub mod upgrade;
pub mod validator;
pub mod vcs;
