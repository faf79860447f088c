//! The on-disk `VersionTrial` implementation
//!
//! Ties the declaration store and the validator together for one dependency:
//! `apply` pins the entry to `== VERSION`, `validate` runs the test command
//! with its output captured under the session log directory, and `restore`
//! writes the original constraint expression back. All search state lives
//! here explicitly rather than in captured closures.

use crate::context::RunContext;
use crate::declaration::DeclarationFile;
use crate::domain::Version;
use crate::upgrade::{TrialError, Validation, VersionTrial};
use crate::validator::Validator;

/// Probes candidate versions by rewriting the declaration file and running
/// the validator
pub struct DeclarationProbe<'a> {
    store: &'a mut DeclarationFile,
    validator: &'a Validator,
    context: &'a RunContext,
    name: String,
    original: String,
}

impl<'a> DeclarationProbe<'a> {
    /// Creates a probe for one dependency
    ///
    /// `original` is the pre-search constraint expression; `restore` writes
    /// exactly this back.
    pub fn new(
        store: &'a mut DeclarationFile,
        validator: &'a Validator,
        context: &'a RunContext,
        name: impl Into<String>,
        original: impl Into<String>,
    ) -> Self {
        Self {
            store,
            validator,
            context,
            name: name.into(),
            original: original.into(),
        }
    }
}

impl VersionTrial for DeclarationProbe<'_> {
    fn apply(&mut self, version: &Version) -> Result<(), TrialError> {
        self.store
            .write_entry(&self.name, &format!("== {}", version))?;
        Ok(())
    }

    fn validate(&mut self, version: &Version) -> Result<Validation, TrialError> {
        let log_path = self
            .context
            .attempt_log_path(&self.name, &self.original, version.as_str());
        let passed = self.validator.run(&log_path)?;
        Ok(Validation::new(passed).with_log(log_path))
    }

    fn restore(&mut self) -> Result<(), TrialError> {
        self.store.write_entry(&self.name, &self.original)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::DECLARATION_FILE_NAME;
    use std::fs;
    use tempfile::TempDir;

    fn setup(dir: &TempDir) -> (DeclarationFile, Validator, RunContext) {
        let path = dir.path().join(DECLARATION_FILE_NAME);
        fs::write(&path, "requests = \">=2.0,<3.0\"\nflask = \">=1.0\"\n").unwrap();
        let store = DeclarationFile::load(&path).unwrap();
        let validator = Validator::new("true", dir.path());
        let context = RunContext::new(dir.path(), dir.path().join("logs"));
        (store, validator, context)
    }

    #[test]
    fn test_apply_pins_the_entry() {
        let dir = TempDir::new().unwrap();
        let (mut store, validator, context) = setup(&dir);
        let mut probe =
            DeclarationProbe::new(&mut store, &validator, &context, "requests", ">=2.0,<3.0");

        probe.apply(&Version::parse("3.1")).unwrap();

        let content = fs::read_to_string(dir.path().join(DECLARATION_FILE_NAME)).unwrap();
        assert!(content.contains("requests = \"== 3.1\""));
        assert!(content.contains("flask = \">=1.0\""));
    }

    #[test]
    fn test_restore_writes_original_back() {
        let dir = TempDir::new().unwrap();
        let (mut store, validator, context) = setup(&dir);
        let mut probe =
            DeclarationProbe::new(&mut store, &validator, &context, "requests", ">=2.0,<3.0");

        probe.apply(&Version::parse("3.1")).unwrap();
        probe.restore().unwrap();

        let content = fs::read_to_string(dir.path().join(DECLARATION_FILE_NAME)).unwrap();
        assert!(content.contains("requests = \">=2.0,<3.0\""));
    }

    #[test]
    fn test_validate_captures_a_log() {
        let dir = TempDir::new().unwrap();
        let (mut store, _, context) = setup(&dir);
        let validator = Validator::new("echo probing", dir.path());
        let mut probe =
            DeclarationProbe::new(&mut store, &validator, &context, "requests", ">=2.0,<3.0");

        let validation = probe.validate(&Version::parse("3.1")).unwrap();

        assert!(validation.passed);
        let log_path = validation.log_path.unwrap();
        assert!(log_path.exists());
        assert!(fs::read_to_string(&log_path).unwrap().contains("probing"));
    }

    #[test]
    fn test_validate_sees_the_applied_version() {
        let dir = TempDir::new().unwrap();
        let (mut store, _, context) = setup(&dir);
        // The validator inspects the declaration file the probe rewrote
        let validator = Validator::new("grep -q '== 3.1' depends.cfg", dir.path());
        let mut probe =
            DeclarationProbe::new(&mut store, &validator, &context, "requests", ">=2.0,<3.0");

        probe.apply(&Version::parse("3.1")).unwrap();
        let validation = probe.validate(&Version::parse("3.1")).unwrap();
        assert!(validation.passed);

        probe.restore().unwrap();
        let validation = probe.validate(&Version::parse("3.1")).unwrap();
        assert!(!validation.passed);
    }
}
