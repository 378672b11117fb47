//! Configuration module for the descriptor reconciliation tool.
//!
//! This module handles all configuration-related functionality:
//! - Locating the dbt project and loading its `.env`
//! - Reading tool settings from `dbt_project.yml`
//! - Validating descriptor formatting preferences

mod parser;
mod spec;

pub use parser::{PROJECT_DIR_ENV, PROJECT_FILE, ProjectParser, SETTINGS_VAR};
pub use spec::{ProjectParams, ProjectSettings, ResourceParams, YamlFormat, YamlFormatSpec};
