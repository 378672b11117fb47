//! In-memory descriptor storage.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::StorageError;
use crate::plan::{Document, DocumentMap};

use super::store::Storage;

/// Descriptor storage backed by a map, for previews and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<BTreeMap<PathBuf, Document>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a descriptor.
    #[must_use]
    pub fn with_document(self, path: impl Into<PathBuf>, document: Document) -> Self {
        self.lock().insert(path.into(), document);
        self
    }

    /// Returns a copy of the stored descriptor.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<Document> {
        self.lock().get(path).cloned()
    }

    /// Returns the stored paths.
    #[must_use]
    pub fn paths(&self) -> BTreeSet<PathBuf> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<PathBuf, Document>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn load_yaml(&self, paths: &BTreeSet<PathBuf>) -> Result<BTreeMap<PathBuf, Document>, StorageError> {
        let files = self.lock();
        Ok(paths
            .iter()
            .filter_map(|p| files.get(p).map(|d| (p.clone(), d.clone())))
            .collect())
    }

    fn save_yaml(&self, files: &DocumentMap) -> Result<(), StorageError> {
        let mut stored = self.lock();
        for (path, document) in files {
            match document {
                Some(document) => {
                    stored.insert(path.clone(), document.clone());
                }
                None => {
                    stored.remove(path);
                }
            }
        }
        Ok(())
    }

    fn is_read_only(&self) -> bool {
        false
    }
}
