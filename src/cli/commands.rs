//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::canon::CanonKind;
use crate::config::{ProjectParams, ResourceParams};
use crate::plan::ExecutionMode;
use crate::reconciler::Command;

/// dbt-yaml-sync - Keep dbt YAML descriptors in line with the project.
#[derive(Parser, Debug)]
#[command(name = "dbt-yaml-sync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create descriptor entries for resources that have none.
    Bootstrap {
        /// Project and selection options.
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Move descriptor entries to the files their path template names.
    Relocate {
        /// Project and selection options.
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Align descriptor columns with the observed tables.
    Synchronize {
        /// Project and selection options.
        #[command(flatten)]
        common: CommonArgs,

        /// Identifier case of the warehouse, overrides the project setting.
        #[arg(long)]
        canon: Option<CanonKind>,
    },
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// dbt project directory (defaults to the current directory).
    #[arg(long, env = "DBT_PROJECT_DIR")]
    pub project_dir: Option<PathBuf>,

    /// Profile the snapshot must have been captured with.
    #[arg(long)]
    pub profile: Option<String>,

    /// Target the snapshot must have been captured with.
    #[arg(short, long)]
    pub target: Option<String>,

    /// Resources to include.
    #[arg(short, long, num_args = 1..)]
    pub select: Vec<String>,

    /// Resources to leave out.
    #[arg(long, num_args = 1..)]
    pub exclude: Vec<String>,

    /// Project snapshot file (defaults to `target/dbt_yaml_sync.json` in the project).
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Compute and show the changes without writing any file.
    #[arg(long)]
    pub dry_run: bool,
}

impl CommonArgs {
    /// Project location parameters.
    #[must_use]
    pub fn project_params(&self) -> ProjectParams {
        ProjectParams {
            project_dir: self.project_dir.clone(),
            profile: self.profile.clone(),
            target: self.target.clone(),
        }
    }

    /// Selection parameters.
    #[must_use]
    pub fn resource_params(&self) -> ResourceParams {
        ResourceParams {
            select: self.select.clone(),
            exclude: self.exclude.clone(),
        }
    }

    /// Execution mode implied by `--dry-run`.
    #[must_use]
    pub const fn mode(&self) -> ExecutionMode {
        if self.dry_run { ExecutionMode::DryRun } else { ExecutionMode::Run }
    }
}

impl Commands {
    /// Shared options of the command.
    #[must_use]
    pub const fn common(&self) -> &CommonArgs {
        match self {
            Self::Bootstrap { common } | Self::Relocate { common } | Self::Synchronize { common, .. } => common,
        }
    }

    /// The reconciliation command to run.
    #[must_use]
    pub const fn command(&self) -> Command {
        match self {
            Self::Bootstrap { .. } => Command::Bootstrap,
            Self::Relocate { .. } => Command::Relocate,
            Self::Synchronize { .. } => Command::Synchronize,
        }
    }

    /// Naming canon requested on the command line.
    #[must_use]
    pub const fn canon(&self) -> Option<CanonKind> {
        match self {
            Self::Synchronize { canon, .. } => *canon,
            Self::Bootstrap { .. } | Self::Relocate { .. } => None,
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_synchronize() {
        let cli = Cli::try_parse_from([
            "dbt-yaml-sync",
            "synchronize",
            "--project-dir",
            "project",
            "-s",
            "stg_*",
            "type:source",
            "--exclude",
            "stg_orders",
            "--canon",
            "lower",
            "--dry-run",
            "--output",
            "json",
        ])
        .expect("valid arguments");

        assert!(matches!(cli.output, OutputFormat::Json));
        assert_eq!(cli.command.command(), Command::Synchronize);
        assert_eq!(cli.command.canon(), Some(CanonKind::Lower));

        let common = cli.command.common();
        assert_eq!(common.mode(), ExecutionMode::DryRun);
        assert_eq!(common.project_params().project_dir, Some(PathBuf::from("project")));
        assert_eq!(common.resource_params().select, ["stg_*", "type:source"]);
        assert_eq!(common.resource_params().exclude, ["stg_orders"]);
    }

    #[test]
    fn test_parse_bootstrap_defaults() {
        let cli = Cli::try_parse_from(["dbt-yaml-sync", "bootstrap", "--debug"]).expect("valid arguments");

        assert!(cli.debug);
        assert!(!cli.log_json);
        assert_eq!(cli.command.command(), Command::Bootstrap);
        assert_eq!(cli.command.canon(), None);
        assert_eq!(cli.command.common().mode(), ExecutionMode::Run);
    }

    #[test]
    fn test_canon_only_on_synchronize() {
        assert!(Cli::try_parse_from(["dbt-yaml-sync", "relocate", "--canon", "upper"]).is_err());
    }
}
