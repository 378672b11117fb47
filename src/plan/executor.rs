//! Plans and their execution.
//!
//! A plan loads the union of the files its actions touch, applies every
//! action in order to one working set, and flushes only the documents that
//! actually changed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::Result;
use crate::storage::Storage;

use super::action::Action;
use super::document::DocumentMap;
use super::hash::DocumentHasher;

/// Whether a plan persists its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Apply and persist.
    Run,
    /// Apply in memory and discard.
    DryRun,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Run => f.write_str("run"),
            Self::DryRun => f.write_str("dry run"),
        }
    }
}

/// An ordered list of actions.
#[derive(Debug, Clone)]
pub struct Plan {
    /// When the plan was created.
    pub created_at: DateTime<Utc>,
    actions: Vec<Action>,
}

/// Outcome of executing a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    /// Mode the plan ran in.
    pub mode: ExecutionMode,
    /// Number of actions applied.
    pub actions_applied: usize,
    /// Number of files the plan touched.
    pub affected_files: usize,
    /// Files written (or that would be written).
    pub changed_files: Vec<PathBuf>,
    /// Files deleted (or that would be deleted).
    pub deleted_files: Vec<PathBuf>,
    /// Whether changes reached storage.
    pub persisted: bool,
}

impl Plan {
    /// Creates a plan from actions in execution order.
    #[must_use]
    pub fn new(actions: Vec<Action>) -> Self {
        Self {
            created_at: Utc::now(),
            actions,
        }
    }

    /// Creates an empty plan (no changes needed).
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Returns true if the plan is empty (no changes).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the number of actions.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.actions.len()
    }

    /// Actions in execution order.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Union of the files every action touches.
    #[must_use]
    pub fn affected_files(&self) -> BTreeSet<PathBuf> {
        self.actions.iter().flat_map(Action::affected_files).collect()
    }

    /// One audit line per action, in order.
    #[must_use]
    pub fn describe(&self) -> Vec<String> {
        self.actions.iter().map(Action::describe).collect()
    }

    /// Executes the plan against `storage`.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails, an action cannot be applied, or
    /// saving fails. Nothing is saved if any action fails.
    pub fn execute(&self, storage: &dyn Storage, mode: ExecutionMode) -> Result<ExecutionReport> {
        if self.actions.is_empty() {
            info!("Nothing to do");
            return Ok(ExecutionReport::empty(mode));
        }

        let affected = self.affected_files();
        info!("Files affected by plan: {}", affected.len());

        let loaded = storage.load_yaml(&affected)?;
        let hasher = DocumentHasher::new();
        let mut fingerprints = BTreeMap::new();
        for (path, document) in &loaded {
            fingerprints.insert(path.clone(), hasher.fingerprint(path, document)?);
        }

        let mut files: DocumentMap = loaded.into_iter().map(|(p, d)| (p, Some(d))).collect();

        for (i, action) in self.actions.iter().enumerate() {
            info!("Action {}: {}", i + 1, action.describe());
            action.execute(&mut files)?;
        }

        let mut changes = DocumentMap::new();
        let mut changed_files = Vec::new();
        let mut deleted_files = Vec::new();

        for (path, document) in files {
            let before = fingerprints.get(&path);
            match document {
                Some(document) => {
                    let after = hasher.fingerprint(&path, &document)?;
                    if before == Some(&after) {
                        debug!("Unchanged: {}", path.display());
                        continue;
                    }
                    debug!(
                        "Changed: {} ({} -> {})",
                        path.display(),
                        before.map_or_else(|| String::from("new"), |b| hasher.short_hash(b)),
                        hasher.short_hash(&after)
                    );
                    changed_files.push(path.clone());
                    changes.insert(path, Some(document));
                }
                None if before.is_some() => {
                    deleted_files.push(path.clone());
                    changes.insert(path, None);
                }
                None => {}
            }
        }

        let persisted = match mode {
            ExecutionMode::Run if !changes.is_empty() => {
                storage.save_yaml(&changes)?;
                let persisted = !storage.is_read_only();
                info!("Saved {} file(s), deleted {}", changed_files.len(), deleted_files.len());
                persisted
            }
            ExecutionMode::Run => {
                info!("No file content changed");
                false
            }
            ExecutionMode::DryRun => {
                info!("Dry run, discarding changes to {} file(s)", changes.len());
                false
            }
        };

        Ok(ExecutionReport {
            mode,
            actions_applied: self.actions.len(),
            affected_files: affected.len(),
            changed_files,
            deleted_files,
            persisted,
        })
    }
}

impl Default for Plan {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<Action> for Plan {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.actions.is_empty() {
            return write!(f, "No changes required");
        }

        writeln!(f, "Plan ({} actions):", self.actions.len())?;
        for (i, action) in self.actions.iter().enumerate() {
            writeln!(f, "  {}. {action}", i + 1)?;
        }
        Ok(())
    }
}

impl ExecutionReport {
    /// Report for a plan without actions.
    #[must_use]
    pub const fn empty(mode: ExecutionMode) -> Self {
        Self {
            mode,
            actions_applied: 0,
            affected_files: 0,
            changed_files: Vec::new(),
            deleted_files: Vec::new(),
            persisted: false,
        }
    }
}

impl fmt::Display for ExecutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Applied {} actions to {} files: {} changed, {} deleted",
            self.actions_applied,
            self.affected_files,
            self.changed_files.len(),
            self.deleted_files.len()
        )?;
        match (self.mode, self.persisted) {
            (ExecutionMode::DryRun, _) => write!(f, " (dry run, nothing saved)"),
            (ExecutionMode::Run, false) if !self.changed_files.is_empty() || !self.deleted_files.is_empty() => {
                write!(f, " (read-only storage, nothing saved)")
            }
            _ => Ok(()),
        }
    }
}
