//! Declared resources and their descriptor columns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::InvariantError;

/// Kind of declared resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// A CSV seed.
    Seed,
    /// An external input declared in a sources block.
    Source,
    /// A transformation model.
    Model,
    /// A snapshot.
    Snapshot,
}

impl ResourceType {
    /// All resource types, in descriptor key order.
    pub const ALL: [Self; 4] = [Self::Seed, Self::Source, Self::Model, Self::Snapshot];

    /// Singular name as used in unique ids.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Seed => "seed",
            Self::Source => "source",
            Self::Model => "model",
            Self::Snapshot => "snapshot",
        }
    }

    /// Plural name, used as the descriptor document key.
    #[must_use]
    pub const fn plural_name(self) -> &'static str {
        match self {
            Self::Seed => "seeds",
            Self::Source => "sources",
            Self::Model => "models",
            Self::Snapshot => "snapshots",
        }
    }

    /// Parses a singular resource type name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compound resource identifier such as `model.package.name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Wraps a unique id string.
    pub fn new(unique_id: impl Into<String>) -> Self {
        Self(unique_id.into())
    }

    /// Last dot-separated segment of the id.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// The full id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A column as declared in a YAML descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceColumn {
    /// Declared name.
    pub name: String,
    /// Whether the name must be matched verbatim.
    #[serde(default)]
    pub quote: bool,
    /// Declared data type.
    #[serde(default)]
    pub data_type: Option<String>,
    /// Column description.
    #[serde(default)]
    pub description: Option<String>,
}

impl ResourceColumn {
    /// Creates an unquoted column without description.
    pub fn new(name: impl Into<String>, data_type: Option<&str>) -> Self {
        Self {
            name: name.into(),
            quote: false,
            data_type: data_type.map(String::from),
            description: None,
        }
    }

    /// Marks the column as quoted.
    #[must_use]
    pub const fn quoted(mut self) -> Self {
        self.quote = true;
        self
    }
}

/// Per-resource tool configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Where the descriptor should live, see [`crate::resolver::PathResolver`].
    #[serde(default)]
    pub yaml_path_template: Option<String>,
    /// Record precise numeric types (with precision and scale).
    #[serde(default)]
    pub numeric_precision_and_scale: bool,
    /// Record precise string types (with length).
    #[serde(default)]
    pub string_length: bool,
}

impl ResourceConfig {
    /// Configuration with only a path template.
    pub fn with_template(template: impl Into<String>) -> Self {
        Self {
            yaml_path_template: Some(template.into()),
            ..Self::default()
        }
    }
}

/// Unvalidated resource fields, as produced by a loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSpec {
    /// Unique id.
    pub unique_id: ResourceId,
    /// Resource name.
    pub name: String,
    /// Source block name, sources only.
    #[serde(default)]
    pub source_name: Option<String>,
    /// Warehouse database.
    #[serde(default)]
    pub database: String,
    /// Warehouse schema.
    #[serde(default)]
    pub schema: String,
    /// Warehouse relation name.
    #[serde(default)]
    pub identifier: String,
    /// Resource kind.
    pub resource_type: ResourceType,
    /// Originating code file, everything but sources.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Current descriptor file, if any.
    #[serde(default)]
    pub yaml_path: Option<PathBuf>,
    /// Declared columns.
    #[serde(default)]
    pub columns: Vec<ResourceColumn>,
    /// Tool configuration.
    #[serde(default)]
    pub config: ResourceConfig,
}

/// A declared resource whose invariants have been checked.
///
/// Sources carry a `source_name` and a `yaml_path` but no `path`; every other
/// type carries a `path` and no `source_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ResourceSpec", into = "ResourceSpec")]
pub struct Resource {
    unique_id: ResourceId,
    name: String,
    source_name: Option<String>,
    database: String,
    schema: String,
    identifier: String,
    resource_type: ResourceType,
    path: Option<PathBuf>,
    yaml_path: Option<PathBuf>,
    columns: Vec<ResourceColumn>,
    config: ResourceConfig,
}

impl Resource {
    /// Validates raw fields and builds a resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the source name, path or descriptor path rules
    /// for the resource type are violated.
    pub fn try_new(spec: ResourceSpec) -> Result<Self, InvariantError> {
        let subject = spec.unique_id.to_string();

        if spec.resource_type == ResourceType::Source {
            if spec.source_name.as_deref().is_none_or(str::is_empty) {
                return Err(InvariantError::required("source_name", subject));
            }
            if spec.path.is_some() {
                return Err(InvariantError::not_allowed("path", subject));
            }
            if spec.yaml_path.is_none() {
                return Err(InvariantError::required("yaml_path", subject));
            }
        } else {
            if spec.source_name.is_some() {
                return Err(InvariantError::not_allowed("source_name", subject));
            }
            if spec.path.is_none() {
                return Err(InvariantError::required("path", subject));
            }
        }

        Ok(Self {
            unique_id: spec.unique_id,
            name: spec.name,
            source_name: spec.source_name,
            database: spec.database,
            schema: spec.schema,
            identifier: spec.identifier,
            resource_type: spec.resource_type,
            path: spec.path,
            yaml_path: spec.yaml_path,
            columns: spec.columns,
            config: spec.config,
        })
    }

    /// Unique id.
    #[must_use]
    pub const fn unique_id(&self) -> &ResourceId {
        &self.unique_id
    }

    /// Resource name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source block name (sources only).
    #[must_use]
    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// Warehouse database.
    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Warehouse schema.
    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Warehouse relation name.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Resource kind.
    #[must_use]
    pub const fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// Originating code file.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Current descriptor file.
    #[must_use]
    pub fn yaml_path(&self) -> Option<&Path> {
        self.yaml_path.as_deref()
    }

    /// Declared columns, in descriptor order.
    #[must_use]
    pub fn columns(&self) -> &[ResourceColumn] {
        &self.columns
    }

    /// Tool configuration.
    #[must_use]
    pub const fn config(&self) -> &ResourceConfig {
        &self.config
    }

    /// Configured descriptor path template, if any.
    #[must_use]
    pub fn yaml_path_template(&self) -> Option<&str> {
        self.config
            .yaml_path_template
            .as_deref()
            .filter(|t| !t.is_empty())
    }
}

impl TryFrom<ResourceSpec> for Resource {
    type Error = InvariantError;

    fn try_from(spec: ResourceSpec) -> Result<Self, Self::Error> {
        Self::try_new(spec)
    }
}

impl From<Resource> for ResourceSpec {
    fn from(resource: Resource) -> Self {
        Self {
            unique_id: resource.unique_id,
            name: resource.name,
            source_name: resource.source_name,
            database: resource.database,
            schema: resource.schema,
            identifier: resource.identifier,
            resource_type: resource.resource_type,
            path: resource.path,
            yaml_path: resource.yaml_path,
            columns: resource.columns,
            config: resource.config,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source_name {
            Some(source_name) => write!(f, "{}:{source_name}.{}", self.resource_type, self.name),
            None => write!(f, "{}:{}", self.resource_type, self.name),
        }
    }
}
