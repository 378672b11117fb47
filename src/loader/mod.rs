//! Resource loading.
//!
//! Loaders supply the declared resources in scope for a command and the
//! observed shape of their tables. [`SnapshotLoader`] reads both from a JSON
//! export of the project.

mod selector;
mod snapshot;

pub use selector::ResourceSelector;
pub use snapshot::{
    DEFAULT_SNAPSHOT_PATH, Snapshot, SnapshotConfig, SnapshotLoader, SnapshotResource, SnapshotTypes,
};

use std::path::PathBuf;

use crate::config::{ProjectSettings, YamlFormat};
use crate::error::Result;
use crate::model::{Resource, Table};

/// Source of resources and observed tables.
pub trait ResourceLoader {
    /// Project root all descriptor paths are relative to.
    ///
    /// # Errors
    ///
    /// Returns an error if the project cannot be located.
    fn locate_project_dir(&self) -> Result<PathBuf>;

    /// Tool settings of the project.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be read.
    fn project_settings(&self) -> Result<ProjectSettings>;

    /// Descriptor formatting preferences, if configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be read.
    fn detect_yaml_format(&self) -> Result<Option<YamlFormat>> {
        Ok(self.project_settings()?.yaml_format)
    }

    /// Resources of the current project matching the selection.
    ///
    /// # Errors
    ///
    /// Returns an error if a resource violates its invariants.
    fn select_resources(&self) -> Result<Vec<Resource>>;

    /// Observed tables backing `resources`.
    ///
    /// Resources without a table are absent from the result.
    ///
    /// # Errors
    ///
    /// Returns an error if a table violates its invariants.
    fn lookup_tables(&self, resources: &[Resource]) -> Result<Vec<Table>>;
}
