//! Column synchronization: align descriptor columns with observed tables.
//!
//! For every resource with both a descriptor and an observed table, the
//! planner emits column updates, then additions, then deletions, and at most
//! one reorder. Later actions depend on the effects of earlier ones, so this
//! order is part of the contract.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, warn};

use crate::canon::{NamingCanon, UppercaseCanon, is_bare_identifier};
use crate::error::Result;
use crate::model::{Resource, ResourceColumn, ResourceId, Table, TableColumn};
use crate::plan::{
    Action, AddResourceColumn, ColumnTarget, DeleteResourceColumn, Plan, ReorderResourceColumns,
    UpdateResourceColumn,
};

use super::ActionPlanner;
use super::index::ColumnIndex;

/// Plans column changes from observed table shapes.
#[derive(Debug)]
pub struct SynchronizationPlanner<'a> {
    resources: &'a [Resource],
    tables: &'a [Table],
    canon: Box<dyn NamingCanon>,
}

impl<'a> SynchronizationPlanner<'a> {
    /// Creates a planner folding names with [`UppercaseCanon`].
    #[must_use]
    pub fn new(resources: &'a [Resource], tables: &'a [Table]) -> Self {
        Self {
            resources,
            tables,
            canon: Box::new(UppercaseCanon),
        }
    }

    /// Replaces the naming canon used to match columns.
    #[must_use]
    pub fn with_canon(mut self, canon: Box<dyn NamingCanon>) -> Self {
        self.canon = canon;
        self
    }

    /// Folded key of a declared column.
    ///
    /// Quoted names are matched verbatim. Returns `None` if an unquoted
    /// name cannot be folded.
    fn resource_key(&self, column: &ResourceColumn) -> Option<String> {
        if column.quote {
            return Some(column.name.clone());
        }
        self.canon.canonize(&column.name).ok()
    }

    /// Key of an observed column.
    ///
    /// Names declared with `quote: true` are kept verbatim so they meet their
    /// quoted declaration. Every other bare name is folded.
    fn table_key(&self, column: &TableColumn, quoted: &HashSet<&str>) -> String {
        if !quoted.contains(column.name.as_str()) && self.canon.can_canonize(&column.name) {
            self.canon.fold(&column.name)
        } else {
            column.name.clone()
        }
    }

    fn plan_resource(&self, resource: &Resource, table: &Table, yaml_path: &Path) -> Result<Vec<Action>> {
        let Some(resource_keys) = resource
            .columns()
            .iter()
            .map(|c| self.resource_key(c))
            .collect::<Option<Vec<_>>>()
        else {
            warn!("Skipping {resource}: a column name cannot be canonized, set quote: true on it");
            return Ok(Vec::new());
        };

        let Some(declared) = ColumnIndex::new(resource.columns(), resource_keys) else {
            warn!("Skipping {resource}: declared column names are ambiguous once case-folded");
            return Ok(Vec::new());
        };

        let quoted: HashSet<&str> = resource
            .columns()
            .iter()
            .filter(|c| c.quote)
            .map(|c| c.name.as_str())
            .collect();
        let table_keys = table.columns().iter().map(|c| self.table_key(c, &quoted)).collect();
        let Some(observed) = ColumnIndex::new(table.columns(), table_keys) else {
            warn!("Skipping {resource}: observed column names are ambiguous once case-folded");
            return Ok(Vec::new());
        };

        let target = ColumnTarget::of(resource, yaml_path);
        let mut updates: Vec<Action> = Vec::new();
        let mut additions: Vec<Action> = Vec::new();
        let mut deletions: Vec<Action> = Vec::new();
        let mut tracked: Vec<String> = declared.keys().to_vec();

        for (key, table_column) in observed.iter() {
            let column_type = table_column.recorded_type(resource.config());

            match declared.get(key) {
                Some(column) => {
                    let unchanged = column
                        .data_type
                        .as_deref()
                        .is_some_and(|current| current.eq_ignore_ascii_case(column_type));
                    if !unchanged {
                        updates.push(UpdateResourceColumn::new(target.clone(), &column.name, column_type).into());
                    }
                }
                None => {
                    additions.push(
                        AddResourceColumn::new(
                            target.clone(),
                            &table_column.name,
                            !is_bare_identifier(&table_column.name),
                            column_type,
                        )
                        .into(),
                    );
                    tracked.push(key.to_string());
                }
            }
        }

        for (key, column) in declared.iter() {
            if !observed.contains(key) {
                deletions.push(DeleteResourceColumn::new(target.clone(), &column.name).into());
                tracked.retain(|k| k != key);
            }
        }

        let mut actions = updates;
        actions.append(&mut additions);
        actions.append(&mut deletions);

        if tracked != observed.keys() {
            let order = observed
                .iter()
                .map(|(key, table_column)| {
                    declared
                        .get(key)
                        .map_or_else(|| table_column.name.clone(), |column| column.name.clone())
                })
                .collect();
            actions.push(ReorderResourceColumns::new(target, order)?.into());
        }

        Ok(actions)
    }
}

impl ActionPlanner for SynchronizationPlanner<'_> {
    fn plan(&self) -> Result<Plan> {
        let tables: HashMap<&ResourceId, &Table> = self.tables.iter().map(|t| (t.resource_id(), t)).collect();
        let mut actions: Vec<Action> = Vec::new();

        for resource in self.resources {
            let Some(table) = tables.get(resource.unique_id()) else {
                warn!("Skipping {resource}: no observed table");
                continue;
            };

            let Some(yaml_path) = resource.yaml_path() else {
                warn!("Skipping {resource}: no descriptor, run bootstrap first");
                continue;
            };

            let planned = self.plan_resource(resource, table, yaml_path)?;
            debug!("Planned {} column action(s) for {resource}", planned.len());
            actions.extend(planned);
        }

        Ok(Plan::new(actions))
    }
}
