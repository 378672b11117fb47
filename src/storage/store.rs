//! Storage trait definition.
//!
//! This module defines the interface plans use to load and persist
//! descriptors.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::error::StorageError;
use crate::plan::{Document, DocumentMap};

/// Trait for descriptor storage backends.
///
/// Paths are relative to the project root.
#[cfg_attr(test, mockall::automock)]
pub trait Storage {
    /// Loads the given descriptors.
    ///
    /// Paths that do not exist are absent from the result.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing descriptor cannot be read or parsed.
    fn load_yaml(&self, paths: &BTreeSet<PathBuf>) -> Result<BTreeMap<PathBuf, Document>, StorageError>;

    /// Persists descriptors. `None` deletes the file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if a descriptor cannot be written or deleted.
    fn save_yaml(&self, files: &DocumentMap) -> Result<(), StorageError>;

    /// Returns true if `save_yaml` is a no-op.
    fn is_read_only(&self) -> bool;
}
