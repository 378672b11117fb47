//! CLI module for the dbt-yaml-sync tool.
//!
//! This module provides the command-line interface for reconciling dbt
//! YAML descriptors.

mod commands;
mod output;

pub use commands::{Cli, Commands, CommonArgs, OutputFormat};
pub use output::OutputFormatter;
