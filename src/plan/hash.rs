//! Descriptor fingerprinting for change detection.
//!
//! A plan only flushes documents whose serialized form changed while the
//! actions were applied.

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::error::StorageError;

use super::document::Document;

/// Hasher for computing descriptor fingerprints.
#[derive(Debug, Default)]
pub struct DocumentHasher;

impl DocumentHasher {
    /// Creates a new document hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes the SHA-256 of the document's YAML serialization.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized.
    pub fn fingerprint(&self, path: &Path, document: &Document) -> Result<String, StorageError> {
        let rendered = serde_yaml::to_string(document).map_err(|e| StorageError::Serialize {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut hasher = Sha256::new();
        hasher.update(rendered.as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }

    /// Computes a short hash (first 8 characters) for display purposes.
    #[must_use]
    pub fn short_hash(&self, hash: &str) -> String {
        hash.chars().take(8).collect()
    }
}
