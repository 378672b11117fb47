//! dbt-yaml-sync CLI entrypoint.
//!
//! This is the main entrypoint for the dbt-yaml-sync command-line tool.

use std::io::Write;
use std::process::ExitCode;

use dbt_yaml_sync::cli::{Cli, OutputFormatter};
use dbt_yaml_sync::error::Result;
use dbt_yaml_sync::loader::{ResourceLoader, SnapshotLoader};
use dbt_yaml_sync::plan::ExecutionMode;
use dbt_yaml_sync::reconciler::Reconciler;
use dbt_yaml_sync::storage::DiskStorage;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.debug, cli.log_json);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
///
/// Logs go to stderr so that stdout carries only command output.
fn init_logging(debug: bool, json: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Runs the selected command.
fn run(cli: &Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);
    let common = cli.command.common();
    let mode = common.mode();

    let loader = SnapshotLoader::open(
        &common.project_params(),
        &common.resource_params(),
        common.snapshot.as_deref(),
    )?;

    let project_dir = loader.locate_project_dir()?;
    let storage = DiskStorage::new(&project_dir, loader.detect_yaml_format()?)
        .read_only(mode == ExecutionMode::DryRun);
    debug!("Descriptors are read from {}", storage.root().display());

    let reconciler = Reconciler::new(&loader, &storage).with_canon(cli.command.canon());
    let result = reconciler.run(cli.command.command(), mode)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(formatter.format_result(&result).as_bytes())?;
    stdout.flush()?;

    Ok(())
}
