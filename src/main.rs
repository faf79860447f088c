//! depclimb - Test-driven dependency upgrader CLI tool
//!
//! For every dependency pinned in the declaration file, tries the versions
//! published above the current constraint against the given test command,
//! commits the upgrades that pass and restores the ones that do not.

use clap::Parser;
use depclimb::cli::CliArgs;
use depclimb::context::RunContext;
use depclimb::coordinator::Coordinator;
use depclimb::declaration::DeclarationFile;
use depclimb::output::{create_formatter, OutputConfig};
use depclimb::registry::PyPiIndex;
use depclimb::validator::Validator;
use depclimb::vcs::GitVcs;
use std::io::{self, Write};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if args.verbose {
        eprintln!("depclimb v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Target: {}", args.path.display());
        eprintln!("Test command: {}", args.test_command);
        if args.dry_run {
            eprintln!("Mode: dry-run");
        }
    }

    if args.tox_without_recreate() && !args.quiet {
        eprintln!(
            "Warning: tox without --recreate may reuse environments that \
             still hold the old dependency versions"
        );
    }

    let declaration_path = DeclarationFile::discover(&args.path)?;
    let mut store = DeclarationFile::load(&declaration_path)?;
    if args.verbose {
        eprintln!("Declaration file: {}", declaration_path.display());
    }

    let context = RunContext::new(&args.path, args.log_root());
    let validator = Validator::new(&args.test_command, &args.path);

    let mut coordinator = Coordinator::new(
        context,
        validator,
        Box::new(PyPiIndex::new()),
        Box::new(GitVcs::new(&args.path)),
    )
    .with_dry_run(args.dry_run)
    .with_quiet(args.quiet || args.json);
    if let Some(prefix) = &args.priority_prefix {
        coordinator = coordinator.with_priority_prefix(prefix);
    }

    let summary = coordinator.run(&mut store).await?;

    let formatter = create_formatter(OutputConfig::from_cli(args.json, args.verbose, args.quiet));
    let mut stdout = io::stdout().lock();
    formatter.format(&summary, &mut stdout)?;
    stdout.flush()?;

    // An up-to-date project is a success, not an error
    Ok(ExitCode::SUCCESS)
}
