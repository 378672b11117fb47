//! Disk-backed descriptor storage.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::YamlFormat;
use crate::error::StorageError;
use crate::plan::{Document, DocumentMap};

use super::format::reindent;
use super::store::Storage;

/// Descriptor storage rooted at a project directory.
#[derive(Debug)]
pub struct DiskStorage {
    /// Project root all paths are relative to.
    root: PathBuf,
    /// Formatting preferences for written files.
    yaml_format: Option<YamlFormat>,
    /// Whether saves are suppressed.
    read_only: bool,
}

impl DiskStorage {
    /// Creates a storage rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, yaml_format: Option<YamlFormat>) -> Self {
        if let Some(format) = &yaml_format {
            if let Some(max_width) = format.max_width() {
                debug!("max_width={max_width} is accepted but not applied by the emitter");
            }
            if format.preserve_quotes() == Some(true) {
                debug!("preserve_quotes is accepted but not applied by the emitter");
            }
        }

        Self {
            root: root.into(),
            yaml_format,
            read_only: false,
        }
    }

    /// Sets whether saves are suppressed.
    #[must_use]
    pub const fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Renders a document according to the configured format.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized.
    pub fn render(&self, path: &Path, document: &Document) -> Result<String, StorageError> {
        let text = serde_yaml::to_string(document).map_err(|e| StorageError::Serialize {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(match self.yaml_format.as_ref().and_then(YamlFormat::indentation) {
            Some((indent, offset)) => reindent(&text, indent, offset),
            None => text,
        })
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<(), StorageError> {
        let resolved = self.root.join(path);
        let write_error = |e: std::io::Error| StorageError::Write {
            path: resolved.clone(),
            message: e.to_string(),
        };

        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        if fs::read_to_string(&resolved).is_ok_and(|previous| has_comments(&previous)) {
            info!("Rewriting {}: its YAML comments are not preserved", resolved.display());
        }

        // Write to a temporary file first, then rename for atomicity
        let temp_path = resolved.with_extension("yml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(write_error)?;
        file.write_all(content.as_bytes()).map_err(write_error)?;
        file.sync_all().map_err(write_error)?;
        fs::rename(&temp_path, &resolved).map_err(write_error)?;

        debug!("Saved file: {}", resolved.display());
        Ok(())
    }

    fn delete_file(&self, path: &Path) -> Result<(), StorageError> {
        let resolved = self.root.join(path);
        if !resolved.exists() {
            debug!("File already absent: {}", resolved.display());
            return Ok(());
        }

        fs::remove_file(&resolved).map_err(|e| StorageError::Delete {
            path: resolved.clone(),
            message: e.to_string(),
        })?;

        info!("Deleted file: {}", resolved.display());
        Ok(())
    }
}

/// Returns true if `text` holds a full-line or trailing YAML comment.
fn has_comments(text: &str) -> bool {
    text.lines()
        .any(|line| line.trim_start().starts_with('#') || line.contains(" #"))
}

impl Storage for DiskStorage {
    fn load_yaml(&self, paths: &BTreeSet<PathBuf>) -> Result<BTreeMap<PathBuf, Document>, StorageError> {
        let mut result = BTreeMap::new();

        for path in paths {
            let resolved = self.root.join(path);
            if !resolved.exists() {
                debug!("File doesn't exist, skipping: {}", resolved.display());
                continue;
            }

            debug!("Loading file: {}", resolved.display());
            let content = fs::read_to_string(&resolved).map_err(|e| StorageError::Read {
                path: resolved.clone(),
                message: e.to_string(),
            })?;

            let document: Document = serde_yaml::from_str(&content).map_err(|e| StorageError::Parse {
                path: resolved.clone(),
                message: e.to_string(),
            })?;

            result.insert(path.clone(), document);
        }

        Ok(result)
    }

    fn save_yaml(&self, files: &DocumentMap) -> Result<(), StorageError> {
        if self.read_only {
            debug!("Read-only storage, skipping save of {} file(s)", files.len());
            return Ok(());
        }

        for (path, document) in files {
            match document {
                Some(document) => {
                    let content = self.render(path, document)?;
                    self.write_file(path, &content)?;
                }
                None => self.delete_file(path)?,
            }
        }

        Ok(())
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }
}
