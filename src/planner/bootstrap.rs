//! Bootstrap planning: create descriptors for resources that have none.

use tracing::{debug, warn};

use crate::error::Result;
use crate::model::{Resource, ResourceType};
use crate::plan::{Action, BootstrapResource, Plan};
use crate::resolver::PathResolver;

use super::ActionPlanner;

/// Plans a [`BootstrapResource`] for every resource without a descriptor.
#[derive(Debug)]
pub struct BootstrapPlanner<'a> {
    resources: &'a [Resource],
    resolver: PathResolver,
}

impl<'a> BootstrapPlanner<'a> {
    /// Creates a planner over `resources`.
    #[must_use]
    pub const fn new(resources: &'a [Resource]) -> Self {
        Self {
            resources,
            resolver: PathResolver::new(),
        }
    }
}

impl ActionPlanner for BootstrapPlanner<'_> {
    fn plan(&self) -> Result<Plan> {
        let mut actions: Vec<Action> = Vec::new();

        for resource in self.resources {
            if resource.resource_type() == ResourceType::Source {
                debug!("Skipping {resource}: sources are bootstrapped manually");
                continue;
            }

            if resource.yaml_path().is_some() {
                debug!("Skipping {resource}: descriptor already exists");
                continue;
            }

            let Some(template) = resource.yaml_path_template() else {
                warn!("Skipping {resource}: no yaml path template configured");
                continue;
            };

            let yaml_path = self.resolver.resolve(template, resource.name(), resource.path())?;
            actions.push(BootstrapResource::new(resource.resource_type(), resource.name(), yaml_path)?.into());
        }

        Ok(Plan::new(actions))
    }
}
