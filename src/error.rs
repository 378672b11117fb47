//! Error types for the descriptor reconciliation system.
//!
//! Each subsystem owns a dedicated error enum; all of them fold into
//! [`SyncError`] so callers can propagate with `?` up to the CLI boundary.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the reconciliation system.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Data-construction invariant violations.
    #[error("Invalid data: {0}")]
    Invariant(#[from] InvariantError),

    /// Identifier canonicalization errors.
    #[error("Naming error: {0}")]
    Naming(#[from] NamingError),

    /// Path template resolution errors.
    #[error("Path error: {0}")]
    Path(#[from] PathError),

    /// Action construction and execution errors.
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// Planning errors.
    #[error("Planning error: {0}")]
    Planner(#[from] PlannerError),

    /// Descriptor storage errors.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Project configuration and loader errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invariant violations detected while constructing data records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantError {
    /// A property required in this context is missing.
    #[error("Property '{property}' is required for {subject}")]
    PropertyRequired {
        /// Name of the missing property.
        property: &'static str,
        /// The record the property belongs to.
        subject: String,
    },

    /// A property forbidden in this context is present.
    #[error("Property '{property}' is not allowed for {subject}")]
    PropertyNotAllowed {
        /// Name of the forbidden property.
        property: &'static str,
        /// The record the property belongs to.
        subject: String,
    },

    /// An observed table record carries no columns.
    #[error("Table {resource_id} has no columns")]
    EmptyTable {
        /// Resource the table belongs to.
        resource_id: String,
    },

    /// YAML formatting preferences are incomplete.
    #[error("Invalid YAML format: {message}")]
    InvalidYamlFormat {
        /// Description of the problem.
        message: String,
    },
}

/// Identifier canonicalization errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NamingError {
    /// The identifier needs quoting and cannot be case-folded.
    #[error("Name '{name}' cannot be canonized, it is not a bare identifier")]
    NotCanonizable {
        /// The offending identifier.
        name: String,
    },
}

/// Path template resolution errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// A resource-relative template was used where no resource file exists.
    #[error(
        "Project root-relative path required for {resource_name}, got '{template}'. \
         Resources without an originating file (sources) need templates starting with '/'"
    )]
    NotRootRelative {
        /// Resource being resolved.
        resource_name: String,
        /// The offending template.
        template: String,
    },

    /// The template uses `{parent}` but the resource has no originating file.
    #[error("Template '{template}' for {resource_name} uses {{parent}}, but the resource has no path")]
    ParentUnavailable {
        /// Resource being resolved.
        resource_name: String,
        /// The offending template.
        template: String,
    },
}

/// Errors raised while constructing or applying actions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// The descriptor file is not part of the working set.
    #[error("Descriptor {path} for {resource_name} is not loaded")]
    DescriptorNotFound {
        /// Resource the action targets.
        resource_name: String,
        /// Missing descriptor path.
        path: PathBuf,
    },

    /// The resource entry is missing from a loaded descriptor.
    #[error("{resource_type} '{resource_name}' not found in {path}")]
    ResourceNotFound {
        /// Kind of entry that was looked up (model, source, ...).
        resource_type: String,
        /// Name of the missing entry.
        resource_name: String,
        /// Descriptor that was searched.
        path: PathBuf,
    },

    /// The column entry is missing from a resource.
    #[error("Column '{column_name}' not found in {resource_name} at {path}")]
    ColumnNotFound {
        /// Missing column name.
        column_name: String,
        /// Resource that was searched.
        resource_name: String,
        /// Descriptor that was searched.
        path: PathBuf,
    },

    /// Requested column order is not a permutation of the current columns.
    #[error("Column names in YAML and provided don't match for {resource_name}: {current:?} vs {requested:?}")]
    ColumnOrderMismatch {
        /// Resource being reordered.
        resource_name: String,
        /// Column names currently declared.
        current: Vec<String>,
        /// Column names requested.
        requested: Vec<String>,
    },

    /// Requested column order contains duplicates.
    #[error("Column names must be unique: {columns:?}")]
    DuplicateColumnOrder {
        /// The rejected order.
        columns: Vec<String>,
    },

    /// Sources cannot be bootstrapped automatically.
    #[error("Sources must be bootstrapped manually: {resource_name}")]
    SourceBootstrapForbidden {
        /// The source that was requested.
        resource_name: String,
    },

    /// The descriptor does not have the expected shape.
    #[error("Malformed descriptor {path}: {message}")]
    MalformedDescriptor {
        /// Descriptor path.
        path: PathBuf,
        /// Description of the problem.
        message: String,
    },
}

/// Errors raised by planners.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlannerError {
    /// Tables of one source disagree on their configuration.
    #[error("Sources in {source_name} have different configurations")]
    SourceConfigConflict {
        /// The conflicting source.
        source_name: String,
    },
}

/// Descriptor storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A descriptor could not be read.
    #[error("Failed to read {path}: {message}")]
    Read {
        /// Descriptor path.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// A descriptor could not be parsed.
    #[error("Failed to parse {path}: {message}")]
    Parse {
        /// Descriptor path.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// A descriptor could not be serialized.
    #[error("Failed to serialize {path}: {message}")]
    Serialize {
        /// Descriptor path.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// A descriptor could not be written.
    #[error("Failed to write {path}: {message}")]
    Write {
        /// Descriptor path.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// A descriptor could not be deleted.
    #[error("Failed to delete {path}: {message}")]
    Delete {
        /// Descriptor path.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },
}

/// Project configuration and loader errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required file was not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// A file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// The snapshot was captured for a different profile or target.
    #[error("Snapshot was captured for {field} '{found}', requested '{requested}'")]
    SnapshotMismatch {
        /// Which selector differs (profile, target).
        field: &'static str,
        /// Value recorded in the snapshot.
        found: String,
        /// Value requested on the command line.
        requested: String,
    },
}

/// Result type alias for reconciliation operations.
pub type Result<T> = std::result::Result<T, SyncError>;

impl InvariantError {
    /// Creates a missing-property error.
    #[must_use]
    pub fn required(property: &'static str, subject: impl Into<String>) -> Self {
        Self::PropertyRequired {
            property,
            subject: subject.into(),
        }
    }

    /// Creates a forbidden-property error.
    #[must_use]
    pub fn not_allowed(property: &'static str, subject: impl Into<String>) -> Self {
        Self::PropertyNotAllowed {
            property,
            subject: subject.into(),
        }
    }
}

impl PlanError {
    /// Creates a malformed-descriptor error.
    #[must_use]
    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MalformedDescriptor {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl ConfigError {
    /// Creates a parse error for a specific file.
    #[must_use]
    pub fn parse(message: impl Into<String>, location: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location: Some(location.into()),
        }
    }
}

impl SyncError {
    /// Returns true if the error signals a missing descriptor, resource or column.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Plan(
                PlanError::DescriptorNotFound { .. }
                    | PlanError::ResourceNotFound { .. }
                    | PlanError::ColumnNotFound { .. }
            )
        )
    }
}
