//! Loader backed by a JSON project snapshot.
//!
//! The snapshot is exported from the dbt project (manifest resources plus the
//! column types observed in the warehouse) into
//! `<project>/target/dbt_yaml_sync.json`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::{ProjectParams, ProjectParser, ProjectSettings, ResourceParams};
use crate::error::{ConfigError, Result, SyncError};
use crate::model::{Resource, ResourceColumn, ResourceConfig, ResourceId, ResourceSpec, ResourceType, Table, TableSpec};

use super::ResourceLoader;
use super::selector::ResourceSelector;

/// Snapshot location, relative to the project directory.
pub const DEFAULT_SNAPSHOT_PATH: &str = "target/dbt_yaml_sync.json";

/// Tool keys in a resource's `config` map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Descriptor path template.
    #[serde(rename = "dbt-yaml-sync-path", default)]
    pub path: Option<String>,
    /// Type precision switches.
    #[serde(rename = "dbt-yaml-sync-types", default)]
    pub types: SnapshotTypes,
}

/// `dbt-yaml-sync-types` block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SnapshotTypes {
    /// Record numeric precision and scale.
    #[serde(default)]
    pub numeric_precision_and_scale: bool,
    /// Record string length.
    #[serde(default)]
    pub string_length: bool,
}

/// A resource as exported into the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotResource {
    /// Unique id.
    pub unique_id: ResourceId,
    /// Resource name.
    pub name: String,
    /// Package the resource belongs to.
    pub package_name: String,
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
    /// Originating code file.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Current descriptor file.
    #[serde(default)]
    pub yaml_path: Option<PathBuf>,
    /// Declared columns.
    #[serde(default)]
    pub columns: Vec<ResourceColumn>,
    /// Resource configuration; only the tool keys are read.
    #[serde(default)]
    pub config: SnapshotConfig,
}

impl From<SnapshotResource> for ResourceSpec {
    fn from(resource: SnapshotResource) -> Self {
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
            config: ResourceConfig {
                yaml_path_template: resource.config.path,
                numeric_precision_and_scale: resource.config.types.numeric_precision_and_scale,
                string_length: resource.config.types.string_length,
            },
        }
    }
}

/// Exported project state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Root project name; resources of other packages are ignored.
    pub project_name: String,
    /// Profile the snapshot was captured with.
    #[serde(default)]
    pub profile: Option<String>,
    /// Target the snapshot was captured with.
    #[serde(default)]
    pub target: Option<String>,
    /// Declared resources.
    #[serde(default)]
    pub resources: Vec<SnapshotResource>,
    /// Observed tables.
    #[serde(default)]
    pub tables: Vec<TableSpec>,
}

impl Snapshot {
    /// Parses a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid.
    pub fn parse(content: &str, source: Option<&Path>) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            SyncError::Config(ConfigError::ParseError {
                message: format!("JSON parse error: {e}"),
                location: source.map(|p| p.display().to_string()),
            })
        })
    }

    /// Loads a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or invalid.
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading snapshot from: {}", path.display());

        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            SyncError::Config(ConfigError::parse(
                format!("Failed to read file: {e}"),
                path.display().to_string(),
            ))
        })?;

        Self::parse(&content, Some(path))
    }

    /// Checks the snapshot was captured for the requested profile and target.
    ///
    /// # Errors
    ///
    /// Returns an error on the first mismatching field.
    pub fn check_params(&self, params: &ProjectParams) -> Result<()> {
        let fields = [
            ("profile", &self.profile, &params.profile),
            ("target", &self.target, &params.target),
        ];

        for (field, found, requested) in fields {
            if let Some(requested) = requested
                && found.as_ref() != Some(requested)
            {
                return Err(ConfigError::SnapshotMismatch {
                    field,
                    found: found.clone().unwrap_or_default(),
                    requested: requested.clone(),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// [`ResourceLoader`] over a [`Snapshot`].
#[derive(Debug)]
pub struct SnapshotLoader {
    project_dir: PathBuf,
    settings: ProjectSettings,
    snapshot: Snapshot,
    selector: ResourceSelector,
}

impl SnapshotLoader {
    /// Locates the project, reads its settings and loads the snapshot.
    ///
    /// `snapshot_path` overrides [`DEFAULT_SNAPSHOT_PATH`].
    ///
    /// # Errors
    ///
    /// Returns an error if the project, its settings or the snapshot cannot
    /// be loaded, if the snapshot does not match the requested profile or
    /// target, or if a selector is invalid.
    pub fn open(
        project_params: &ProjectParams,
        resource_params: &ResourceParams,
        snapshot_path: Option<&Path>,
    ) -> Result<Self> {
        let parser = ProjectParser::new();
        parser.load_dotenv(project_params.project_dir.as_deref())?;

        let project_dir = parser.locate_project_dir(project_params)?;
        let settings = parser.load_settings(&project_dir)?;

        let snapshot_path = snapshot_path.map_or_else(|| project_dir.join(DEFAULT_SNAPSHOT_PATH), Path::to_path_buf);
        let snapshot = Snapshot::load(&snapshot_path)?;

        Self::from_parts(project_dir, settings, snapshot, project_params, resource_params)
    }

    /// Builds a loader from already loaded parts.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot does not match the requested profile
    /// or target, or if a selector is invalid.
    pub fn from_parts(
        project_dir: PathBuf,
        settings: ProjectSettings,
        snapshot: Snapshot,
        project_params: &ProjectParams,
        resource_params: &ResourceParams,
    ) -> Result<Self> {
        snapshot.check_params(project_params)?;
        let selector = ResourceSelector::parse(resource_params)?;

        Ok(Self {
            project_dir,
            settings,
            snapshot,
            selector,
        })
    }
}

impl ResourceLoader for SnapshotLoader {
    fn locate_project_dir(&self) -> Result<PathBuf> {
        Ok(self.project_dir.clone())
    }

    fn project_settings(&self) -> Result<ProjectSettings> {
        Ok(self.settings.clone())
    }

    fn select_resources(&self) -> Result<Vec<Resource>> {
        let mut resources = Vec::new();

        for raw in &self.snapshot.resources {
            if raw.package_name != self.snapshot.project_name {
                debug!("Ignoring {} from package {}", raw.unique_id, raw.package_name);
                continue;
            }

            let resource = Resource::try_new(ResourceSpec::from(raw.clone()))?;
            if self.selector.matches(&resource) {
                debug!("Found {resource}");
                resources.push(resource);
            }
        }

        info!("Selected {} resource(s)", resources.len());
        Ok(resources)
    }

    fn lookup_tables(&self, resources: &[Resource]) -> Result<Vec<Table>> {
        let wanted: HashSet<&ResourceId> = resources.iter().map(Resource::unique_id).collect();
        let mut tables = Vec::new();

        for spec in &self.snapshot.tables {
            if !wanted.contains(&spec.resource_id) {
                continue;
            }
            if spec.columns.is_empty() {
                debug!("No columns observed for {}, treating table as missing", spec.resource_id);
                continue;
            }
            tables.push(Table::try_from(spec.clone())?);
        }

        info!("Found {} table(s)", tables.len());
        Ok(tables)
    }
}
