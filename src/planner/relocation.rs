//! Relocation planning: move descriptor blocks to their configured files.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::{PlannerError, Result};
use crate::model::{Resource, ResourceType};
use crate::plan::{Action, DeleteEmptyDescriptor, Plan, RelocateResource};
use crate::resolver::PathResolver;

use super::ActionPlanner;

/// Plans [`RelocateResource`] actions for descriptors that sit in the wrong
/// file, then removes descriptors left empty.
///
/// Sources move as a whole block under their `source_name`, so every table of
/// one source must share the same configuration.
#[derive(Debug)]
pub struct RelocationPlanner<'a> {
    resources: &'a [Resource],
    resolver: PathResolver,
}

impl<'a> RelocationPlanner<'a> {
    /// Creates a planner over `resources`.
    #[must_use]
    pub const fn new(resources: &'a [Resource]) -> Self {
        Self {
            resources,
            resolver: PathResolver::new(),
        }
    }

    fn plan_resource(&self, resource: &Resource) -> Result<Option<RelocateResource>> {
        let Some(from_path) = resource.yaml_path() else {
            debug!("Skipping {resource}: no descriptor to relocate");
            return Ok(None);
        };

        let Some(template) = resource.yaml_path_template() else {
            warn!("Skipping {resource}: no yaml path template configured");
            return Ok(None);
        };

        let to_path = self.resolver.resolve(template, resource.name(), resource.path())?;
        if to_path == from_path {
            return Ok(None);
        }

        Ok(Some(RelocateResource::new(
            resource.resource_type(),
            resource.name(),
            from_path,
            to_path,
        )))
    }

    fn plan_source(&self, source_name: &str, tables: &[&Resource]) -> Result<Option<RelocateResource>> {
        let Some((first, rest)) = tables.split_first() else {
            return Ok(None);
        };

        if rest.iter().any(|r| r.config() != first.config()) {
            return Err(PlannerError::SourceConfigConflict {
                source_name: source_name.to_string(),
            }
            .into());
        }

        let Some(template) = first.yaml_path_template() else {
            warn!("Skipping source {source_name}: no yaml path template configured");
            return Ok(None);
        };

        let Some(from_path) = first.yaml_path() else {
            return Ok(None);
        };
        if rest.iter().any(|r| r.yaml_path() != Some(from_path)) {
            warn!(
                "Tables of source {source_name} are declared in several files, relocating from {}",
                from_path.display()
            );
        }

        let to_path = self.resolver.resolve(template, source_name, None)?;
        if to_path == from_path {
            return Ok(None);
        }

        Ok(Some(RelocateResource::new(
            ResourceType::Source,
            source_name,
            from_path,
            to_path,
        )))
    }
}

impl ActionPlanner for RelocationPlanner<'_> {
    fn plan(&self) -> Result<Plan> {
        let mut relocations: Vec<RelocateResource> = Vec::new();
        let mut sources: BTreeMap<&str, Vec<&Resource>> = BTreeMap::new();

        for resource in self.resources {
            match resource.source_name() {
                Some(source_name) if resource.resource_type() == ResourceType::Source => {
                    sources.entry(source_name).or_default().push(resource);
                }
                _ => relocations.extend(self.plan_resource(resource)?),
            }
        }

        for (source_name, tables) in &sources {
            relocations.extend(self.plan_source(source_name, tables)?);
        }

        let emptied: BTreeSet<PathBuf> = relocations.iter().map(|r| r.from_path().to_path_buf()).collect();

        let actions: Vec<Action> = relocations
            .into_iter()
            .map(Action::from)
            .chain(emptied.into_iter().map(|path| DeleteEmptyDescriptor::new(path).into()))
            .collect();

        Ok(Plan::new(actions))
    }
}
