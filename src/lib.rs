// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![warn(missing_docs)]                // All public items must be documented
#![warn(dead_code)]                   // Unused code is flagged
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![warn(unused_imports)]              // Unused imports are flagged
#![warn(unused_variables)]            // Unused variables are flagged
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # dbt-yaml-sync
//!
//! Declarative, idempotent reconciliation of dbt YAML descriptors.
//!
//! ## Overview
//!
//! Large dbt projects keep column names, types and file placement in dozens
//! of hand-edited YAML files. dbt-yaml-sync keeps them in line:
//!
//! - **bootstrap** creates descriptor entries for resources that have none
//! - **relocate** moves entries to the file their path template names
//! - **synchronize** aligns declared columns with the observed tables
//!
//! ## Architecture
//!
//! Every command follows the same flow:
//!
//! 1. **Load**: a [`loader::ResourceLoader`] supplies resources and tables
//! 2. **Plan**: a [`planner::ActionPlanner`] diffs them into a [`plan::Plan`]
//! 3. **Execute**: the plan edits one in-memory working set and flushes the
//!    files that actually changed through a [`storage::Storage`]
//!
//! ## Modules
//!
//! - [`model`]: Resources, columns and observed tables
//! - [`canon`]: Identifier case folding
//! - [`resolver`]: Descriptor path templates
//! - [`plan`]: Descriptor edits and their execution
//! - [`planner`]: Bootstrap, relocation and synchronization planners
//! - [`storage`]: Descriptor files on disk or in memory
//! - [`config`]: Project discovery and settings
//! - [`loader`]: Resource selection and snapshot loading
//! - [`reconciler`]: Command orchestration
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! # dbt_project.yml
//! models:
//!   my_project:
//!     +dbt-yaml-sync-path: "_{name}.yml"
//!
//! vars:
//!   dbt-yaml-sync:
//!     naming_canon: upper
//!     yaml_format:
//!       indent: 2
//!       offset: 2
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod canon;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod plan;
pub mod planner;
pub mod reconciler;
pub mod resolver;
pub mod storage;

// ============================================================================
// Re-exports
// ============================================================================

pub use canon::{CanonKind, LowercaseCanon, NamingCanon, UppercaseCanon};
pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ProjectParser, ProjectSettings, YamlFormat};
pub use error::{Result, SyncError};
pub use loader::{ResourceLoader, ResourceSelector, SnapshotLoader};
pub use model::{Resource, ResourceColumn, ResourceConfig, ResourceId, ResourceType, Table, TableColumn};
pub use plan::{Action, ExecutionMode, ExecutionReport, Plan};
pub use planner::{ActionPlanner, BootstrapPlanner, RelocationPlanner, SynchronizationPlanner};
pub use reconciler::{Command, ReconciliationResult, Reconciler};
pub use resolver::PathResolver;
pub use storage::{DiskStorage, MemoryStorage, Storage};
