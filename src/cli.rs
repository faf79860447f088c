//! CLI argument parsing module for depclimb

use clap::Parser;
use std::path::PathBuf;

/// Default directory (under the project) where validator logs are collected
pub const DEFAULT_LOG_DIR: &str = "autoupgradedependencies";

/// Automated dependency upgrader driven by your test suite
#[derive(Parser, Debug, Clone)]
#[command(
    name = "depclimb",
    version,
    about = "Upgrade declared dependencies as far as the test command allows"
)]
pub struct CliArgs {
    /// Test command run against every candidate version (passed to `sh -c`)
    pub test_command: String,

    /// Project directory holding the repository and declaration file
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Directory for validator logs, relative to the project directory
    #[arg(long, default_value = DEFAULT_LOG_DIR)]
    pub log_dir: PathBuf,

    /// Process dependencies whose name starts with this prefix first
    #[arg(long)]
    pub priority_prefix: Option<String>,

    /// Dry run mode - probe versions but never commit
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}

impl CliArgs {
    /// Where validator logs for this invocation go
    pub fn log_root(&self) -> PathBuf {
        self.path.join(&self.log_dir)
    }

    /// True when the test command runs tox without recreating environments
    ///
    /// Without `--recreate`, tox reuses virtualenvs that still hold the old
    /// dependency versions, so every probe would validate stale installs.
    pub fn tox_without_recreate(&self) -> bool {
        self.test_command.contains("tox") && !self.test_command.contains("--recreate")
    }
}
