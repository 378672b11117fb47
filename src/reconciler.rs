//! Reconciler driving the three commands.
//!
//! This module wires a [`ResourceLoader`] to the planners and executes the
//! resulting plan against a [`Storage`].

use serde::Serialize;
use std::fmt;
use tracing::info;

use crate::canon::CanonKind;
use crate::error::Result;
use crate::loader::ResourceLoader;
use crate::plan::{ExecutionMode, ExecutionReport, Plan};
use crate::planner::{ActionPlanner, BootstrapPlanner, RelocationPlanner, SynchronizationPlanner};
use crate::storage::Storage;

/// Reconciliation command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    /// Create missing descriptors.
    Bootstrap,
    /// Move descriptors to their configured files.
    Relocate,
    /// Align descriptor columns with observed tables.
    Synchronize,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bootstrap => f.write_str("bootstrap"),
            Self::Relocate => f.write_str("relocate"),
            Self::Synchronize => f.write_str("synchronize"),
        }
    }
}

/// Reconciler for descriptor files.
pub struct Reconciler<'a, L: ResourceLoader> {
    /// Resource source.
    loader: &'a L,
    /// Descriptor storage.
    storage: &'a dyn Storage,
    /// Naming canon overriding the project setting.
    canon: Option<CanonKind>,
}

/// Result of a reconciliation run.
#[derive(Debug, Serialize)]
pub struct ReconciliationResult {
    /// Command that ran.
    pub command: Command,
    /// One line per planned action.
    pub actions: Vec<String>,
    /// Execution outcome.
    pub report: ExecutionReport,
    /// The executed plan.
    #[serde(skip)]
    pub plan: Plan,
}

impl<'a, L: ResourceLoader> Reconciler<'a, L> {
    /// Creates a new reconciler.
    #[must_use]
    pub const fn new(loader: &'a L, storage: &'a dyn Storage) -> Self {
        Self {
            loader,
            storage,
            canon: None,
        }
    }

    /// Overrides the naming canon from the project settings.
    #[must_use]
    pub const fn with_canon(mut self, canon: Option<CanonKind>) -> Self {
        self.canon = canon;
        self
    }

    /// Computes the plan for `command` without executing it.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or planning fails.
    pub fn plan(&self, command: Command) -> Result<Plan> {
        let resources = self.loader.select_resources()?;

        match command {
            Command::Bootstrap => BootstrapPlanner::new(&resources).plan(),
            Command::Relocate => RelocationPlanner::new(&resources).plan(),
            Command::Synchronize => {
                let tables = self.loader.lookup_tables(&resources)?;
                let canon = match self.canon {
                    Some(canon) => canon,
                    None => self.loader.project_settings()?.naming_canon,
                };
                info!("Matching column names with the {canon} canon");

                SynchronizationPlanner::new(&resources, &tables)
                    .with_canon(canon.build())
                    .plan()
            }
        }
    }

    /// Plans and executes `command`.
    ///
    /// # Errors
    ///
    /// Returns an error if loading, planning or execution fails.
    pub fn run(&self, command: Command, mode: ExecutionMode) -> Result<ReconciliationResult> {
        info!("Running {command} ({mode})");

        let plan = self.plan(command)?;
        let report = plan.execute(self.storage, mode)?;

        info!("{report}");

        Ok(ReconciliationResult {
            command,
            actions: plan.describe(),
            report,
            plan,
        })
    }
}

impl fmt::Display for ReconciliationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} finished:", self.command)?;
        for action in &self.actions {
            writeln!(f, "  - {action}")?;
        }
        write!(f, "{}", self.report)
    }
}
