//! Batch coordinator for a whole upgrade run
//!
//! Drives the workflow: check the repository is clean, read the declaration
//! file, fetch every dependency's published versions, select upgrade
//! candidates, then search each upgradeable dependency in priority order and
//! commit what passed. One dependency failing never aborts the batch; only
//! infrastructure failures (declaration writes, vcs, spawning the validator)
//! do.
//!
//! Dependencies are processed strictly one at a time: every validator run
//! mutates the shared declaration file and working tree, so there is no
//! concurrency to be had past the fetch phase.

use crate::context::RunContext;
use crate::declaration::DeclarationFile;
use crate::domain::{
    index_name, CommitRecord, DependencyOutcome, DependencyReport, DependencySpec, RunSummary,
    SkipReason, Version, VersionConstraint,
};
use crate::error::{AppError, IndexError};
use crate::progress::Progress;
use crate::registry::VersionIndex;
use crate::upgrade::{search, select, DeclarationProbe};
use crate::validator::Validator;
use crate::vcs::Vcs;

/// Coordinates one run over all declared dependencies
pub struct Coordinator {
    context: RunContext,
    validator: Validator,
    index: Box<dyn VersionIndex>,
    vcs: Box<dyn Vcs>,
    /// Names with this prefix are processed first (inter-component
    /// dependencies are the higher-value upgrades)
    priority_prefix: Option<String>,
    /// Probe and report, but never commit
    dry_run: bool,
    quiet: bool,
}

impl Coordinator {
    /// Creates a coordinator with the given collaborators
    pub fn new(
        context: RunContext,
        validator: Validator,
        index: Box<dyn VersionIndex>,
        vcs: Box<dyn Vcs>,
    ) -> Self {
        Self {
            context,
            validator,
            index,
            vcs,
            priority_prefix: None,
            dry_run: false,
            quiet: false,
        }
    }

    /// Process names with this prefix before everything else
    pub fn with_priority_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.priority_prefix = Some(prefix.into());
        self
    }

    /// Suppress committing
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Suppress advisory output
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Run the whole batch
    ///
    /// The dirty-tree check happens once, up front, before anything is
    /// mutated. The returned summary always covers every declared
    /// dependency, however many of them failed.
    pub async fn run(&self, store: &mut DeclarationFile) -> Result<RunSummary, AppError> {
        self.vcs.ensure_clean()?;

        let mut summary = RunSummary::new(self.dry_run);
        let specs = self.resolve_dependencies(store, &mut summary).await;

        if specs.is_empty() {
            self.note("Nothing to do, everything is up to date");
            return Ok(summary);
        }

        self.announce_candidates(&specs);
        summary.set_log_root(self.context.session_dir());

        for spec in self.in_priority_order(specs) {
            self.upgrade_one(store, &spec, &mut summary)?;
        }

        Ok(summary)
    }

    /// Fetch, parse and select for every declared entry
    ///
    /// Entries that cannot be searched are recorded as skipped right away;
    /// the rest come back as fully resolved specs in declaration order.
    async fn resolve_dependencies(
        &self,
        store: &DeclarationFile,
        summary: &mut RunSummary,
    ) -> Vec<DependencySpec> {
        let entries = store.entries();
        let mut progress = Progress::new(!self.quiet);
        progress.start(entries.len() as u64, "Fetching published versions");

        let mut specs = Vec::new();

        for (name, raw_constraint) in entries {
            progress.set_message(&name);

            let skip = match self.resolve_one(&name, &raw_constraint).await {
                Ok(Some(spec)) => {
                    specs.push(spec);
                    None
                }
                Ok(None) => Some(SkipReason::UpToDate),
                Err(skip) => Some(skip),
            };

            if let Some(reason) = skip {
                if matches!(reason, SkipReason::PackageNotFound) {
                    self.note(&format!(
                        "Warning: {} doesn't exist in the version index, skip it",
                        name
                    ));
                }
                summary.add_report(DependencyReport::new(
                    &name,
                    &raw_constraint,
                    DependencyOutcome::skipped(reason),
                    Vec::new(),
                ));
            }

            progress.inc();
        }

        progress.finish_and_clear();
        specs
    }

    /// Resolve a single declaration entry into a searchable spec
    ///
    /// `Ok(None)` means up to date; `Err` carries the skip reason. All of
    /// these are local recoveries, never run failures.
    async fn resolve_one(
        &self,
        name: &str,
        raw_constraint: &str,
    ) -> Result<Option<DependencySpec>, SkipReason> {
        let constraint = match VersionConstraint::parse(raw_constraint) {
            Ok(Some(constraint)) => constraint,
            Ok(None) => return Err(SkipReason::Unpinned),
            Err(err) => return Err(SkipReason::MalformedConstraint(err.to_string())),
        };

        let raw_versions = self
            .index
            .list_versions(index_name(name))
            .await
            .map_err(|err| match err {
                IndexError::PackageNotFound { .. } => SkipReason::PackageNotFound,
                other => SkipReason::FetchFailed(other.to_string()),
            })?;

        let all_versions: Vec<Version> = raw_versions.into_iter().map(Version::parse).collect();

        let selection = select(name, &all_versions, &constraint)
            .map_err(|_| SkipReason::NoSatisfyingVersion)?;

        if selection.candidates.is_empty() {
            return Ok(None);
        }

        let mut sorted = all_versions;
        sorted.sort();

        Ok(Some(DependencySpec {
            name: name.to_string(),
            raw_constraint: raw_constraint.to_string(),
            constraint,
            all_versions: sorted,
            max_satisfying: selection.max_satisfying,
            candidates: selection.candidates,
        }))
    }

    /// Search one dependency and commit the result if it upgraded
    fn upgrade_one(
        &self,
        store: &mut DeclarationFile,
        spec: &DependencySpec,
        summary: &mut RunSummary,
    ) -> Result<(), AppError> {
        if let Some(newest) = spec.newest_candidate() {
            self.note(&format!("Upgrading {} to {}", spec.name, newest));
        }

        let mut probe = DeclarationProbe::new(
            store,
            &self.validator,
            &self.context,
            &spec.name,
            &spec.raw_constraint,
        );
        let result = search(spec, &mut probe)?;

        match &result.outcome {
            DependencyOutcome::FullSuccess { final_version } => {
                self.note(&format!(
                    "Success for upgrading {} to {}!",
                    spec.name, final_version
                ));
            }
            DependencyOutcome::PartialSuccess { final_version, .. } => {
                self.note(&format!(
                    "{} is the maximum upgradable version of {}",
                    final_version, spec.name
                ));
            }
            DependencyOutcome::TotalFailure { .. } => {
                self.note(&format!(
                    "Failure when upgrading {} to any version, it's not upgradable",
                    spec.name
                ));
            }
            DependencyOutcome::Skipped { .. } => {}
        }

        if let Some(final_version) = result.outcome.final_version() {
            if self.dry_run {
                self.note("(dry-run) commit suppressed");
            } else {
                let message = commit_message(&spec.name, &spec.raw_constraint, final_version);
                let id = self.vcs.commit(&message)?;
                summary.add_commit(CommitRecord::new(id, message));
            }
        }

        summary.add_report(DependencyReport::new(
            &spec.name,
            &spec.raw_constraint,
            result.outcome,
            result.attempts,
        ));

        Ok(())
    }

    /// Priority-prefixed names first, then the rest, each group keeping its
    /// declaration order
    fn in_priority_order(&self, specs: Vec<DependencySpec>) -> Vec<DependencySpec> {
        let Some(prefix) = &self.priority_prefix else {
            return specs;
        };

        let (priority, rest): (Vec<_>, Vec<_>) = specs
            .into_iter()
            .partition(|spec| spec.name.starts_with(prefix.as_str()));

        if !priority.is_empty() {
            let names: Vec<&str> = priority.iter().map(|s| s.name.as_str()).collect();
            self.note(&format!("Found priority dependencies: {}", names.join(", ")));
        }

        priority.into_iter().chain(rest).collect()
    }

    fn announce_candidates(&self, specs: &[DependencySpec]) {
        self.note("Packages that can be upgraded, with the versions to try:");
        for spec in specs {
            let versions: Vec<&str> = spec.candidates.iter().map(|v| v.as_str()).collect();
            self.note(&format!(
                "* {} ({}) to {}",
                spec.name,
                spec.raw_constraint,
                versions.join(", ")
            ));
        }
    }

    fn note(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }
}

/// Commit message encoding (name, fromConstraint, toVersion)
fn commit_message(name: &str, from: &str, to: &Version) -> String {
    format!("[enh] upgrade {} from '{}' to '== {}'", name, from, to)
}
