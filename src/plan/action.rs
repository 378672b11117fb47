//! Descriptor mutation actions.
//!
//! Every action is a pure description of one file-level edit. Actions are
//! applied in order to a shared [`DocumentMap`] by [`super::Plan`].

use serde_yaml::Value;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{InvariantError, PlanError};
use crate::model::{Resource, ResourceType};

use super::document::{
    self, DocumentMap, EntryLocator, columns_mut, entry_name, is_empty_descriptor, list_or_new,
    new_column_entry, new_resource_entry, position_of,
};

/// One descriptor edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Move a resource block between descriptors.
    RelocateResource(RelocateResource),
    /// Create an empty resource block.
    BootstrapResource(BootstrapResource),
    /// Delete a descriptor left without resources.
    DeleteEmptyDescriptor(DeleteEmptyDescriptor),
    /// Append a column to a resource.
    AddResourceColumn(AddResourceColumn),
    /// Change the recorded type of a column.
    UpdateResourceColumn(UpdateResourceColumn),
    /// Remove a column from a resource.
    DeleteResourceColumn(DeleteResourceColumn),
    /// Reorder the columns of a resource.
    ReorderResourceColumns(ReorderResourceColumns),
}

/// Moves a resource block from one descriptor to another.
///
/// Sources move as whole blocks: `resource_name` is the source name and the
/// nested `tables` travel with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocateResource {
    resource_type: ResourceType,
    resource_name: String,
    from_path: PathBuf,
    to_path: PathBuf,
}

/// Appends `{name, columns: []}` to a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapResource {
    resource_type: ResourceType,
    resource_name: String,
    path: PathBuf,
}

/// Marks a descriptor for deletion once no resource keys hold entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteEmptyDescriptor {
    path: PathBuf,
}

/// The resource entry a column action edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnTarget {
    resource_type: ResourceType,
    resource_name: String,
    source_name: Option<String>,
    path: PathBuf,
}

/// Appends a column entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddResourceColumn {
    target: ColumnTarget,
    column_name: String,
    column_quote: bool,
    column_type: String,
}

/// Sets `data_type` on an existing column entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateResourceColumn {
    target: ColumnTarget,
    column_name: String,
    column_type: String,
}

/// Removes a column entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResourceColumn {
    target: ColumnTarget,
    column_name: String,
}

/// Rebuilds the column list in a given order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderResourceColumns {
    target: ColumnTarget,
    columns_order: Vec<String>,
}

impl RelocateResource {
    /// Creates a relocation.
    pub fn new(
        resource_type: ResourceType,
        resource_name: impl Into<String>,
        from_path: impl Into<PathBuf>,
        to_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            resource_type,
            resource_name: resource_name.into(),
            from_path: from_path.into(),
            to_path: to_path.into(),
        }
    }

    /// Descriptor the block currently lives in.
    #[must_use]
    pub fn from_path(&self) -> &Path {
        &self.from_path
    }

    /// Descriptor the block moves to.
    #[must_use]
    pub fn to_path(&self) -> &Path {
        &self.to_path
    }

    fn execute(&self, files: &mut DocumentMap) -> Result<(), PlanError> {
        let plural = self.resource_type.plural_name();

        let source = document::document_mut(files, &self.from_path, &self.resource_name)?;
        let entries = document::existing_list_mut(source, plural, &self.from_path)?;
        let (entries, index) = entries
            .and_then(|entries| position_of(entries, &self.resource_name).map(|i| (entries, i)))
            .ok_or_else(|| PlanError::ResourceNotFound {
                resource_type: self.resource_type.to_string(),
                resource_name: self.resource_name.clone(),
                path: self.from_path.clone(),
            })?;
        let entry = entries.remove(index);

        let destination = document::document_or_new(files, &self.to_path, self.resource_type);
        list_or_new(destination, plural, &self.to_path)?.push(entry);
        Ok(())
    }
}

impl BootstrapResource {
    /// Creates a bootstrap action.
    ///
    /// # Errors
    ///
    /// Returns an error for sources, which carry warehouse metadata that
    /// cannot be inferred.
    pub fn new(
        resource_type: ResourceType,
        resource_name: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Result<Self, PlanError> {
        let resource_name = resource_name.into();
        if resource_type == ResourceType::Source {
            return Err(PlanError::SourceBootstrapForbidden { resource_name });
        }

        Ok(Self {
            resource_type,
            resource_name,
            path: path.into(),
        })
    }

    fn execute(&self, files: &mut DocumentMap) -> Result<(), PlanError> {
        let document = document::document_or_new(files, &self.path, self.resource_type);
        list_or_new(document, self.resource_type.plural_name(), &self.path)?
            .push(new_resource_entry(&self.resource_name));
        Ok(())
    }
}

impl DeleteEmptyDescriptor {
    /// Creates a delete-if-empty action.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn execute(&self, files: &mut DocumentMap) {
        if let Some(slot) = files.get_mut(&self.path)
            && slot.as_ref().is_some_and(is_empty_descriptor)
        {
            *slot = None;
        }
    }
}

impl ColumnTarget {
    /// Creates a target.
    ///
    /// # Errors
    ///
    /// Returns an error if `source_name` is missing for a source or present
    /// for any other type.
    pub fn new(
        resource_type: ResourceType,
        resource_name: impl Into<String>,
        source_name: Option<String>,
        path: impl Into<PathBuf>,
    ) -> Result<Self, InvariantError> {
        let resource_name = resource_name.into();
        let subject = format!("column action on {resource_type} '{resource_name}'");

        match (resource_type, &source_name) {
            (ResourceType::Source, None) => return Err(InvariantError::required("source_name", subject)),
            (ResourceType::Source, Some(name)) if name.is_empty() => {
                return Err(InvariantError::required("source_name", subject));
            }
            (ResourceType::Seed | ResourceType::Model | ResourceType::Snapshot, Some(_)) => {
                return Err(InvariantError::not_allowed("source_name", subject));
            }
            _ => {}
        }

        Ok(Self {
            resource_type,
            resource_name,
            source_name,
            path: path.into(),
        })
    }

    /// Targets `resource` inside the descriptor at `path`.
    #[must_use]
    pub fn of(resource: &Resource, path: &Path) -> Self {
        Self {
            resource_type: resource.resource_type(),
            resource_name: resource.name().to_string(),
            source_name: resource.source_name().map(String::from),
            path: path.to_path_buf(),
        }
    }

    /// Descriptor holding the resource.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn qualified_name(&self) -> String {
        match &self.source_name {
            Some(source_name) => format!("{source_name}.{}", self.resource_name),
            None => self.resource_name.clone(),
        }
    }

    fn columns_mut<'a>(&self, files: &'a mut DocumentMap) -> Result<&'a mut Vec<Value>, PlanError> {
        let document = document::document_mut(files, &self.path, &self.resource_name)?;
        let locator = EntryLocator {
            resource_type: self.resource_type,
            resource_name: &self.resource_name,
            source_name: self.source_name.as_deref(),
            path: &self.path,
        };
        let entry = locator.find_mut(document)?;
        columns_mut(entry, &self.path)
    }

    fn column_not_found(&self, column_name: &str) -> PlanError {
        PlanError::ColumnNotFound {
            column_name: column_name.to_string(),
            resource_name: self.qualified_name(),
            path: self.path.clone(),
        }
    }
}

impl fmt::Display for ColumnTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.resource_type, self.qualified_name())
    }
}

impl AddResourceColumn {
    /// Creates an add-column action.
    pub fn new(
        target: ColumnTarget,
        column_name: impl Into<String>,
        column_quote: bool,
        column_type: impl Into<String>,
    ) -> Self {
        Self {
            target,
            column_name: column_name.into(),
            column_quote,
            column_type: column_type.into(),
        }
    }

    fn execute(&self, files: &mut DocumentMap) -> Result<(), PlanError> {
        let columns = self.target.columns_mut(files)?;
        columns.push(new_column_entry(&self.column_name, self.column_quote, &self.column_type));
        Ok(())
    }
}

impl UpdateResourceColumn {
    /// Creates an update-column action.
    pub fn new(target: ColumnTarget, column_name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            target,
            column_name: column_name.into(),
            column_type: column_type.into(),
        }
    }

    fn execute(&self, files: &mut DocumentMap) -> Result<(), PlanError> {
        let columns = self.target.columns_mut(files)?;
        let column = columns
            .iter_mut()
            .find(|c| entry_name(c) == Some(self.column_name.as_str()))
            .and_then(Value::as_mapping_mut)
            .ok_or_else(|| self.target.column_not_found(&self.column_name))?;

        column.insert(Value::from("data_type"), Value::from(self.column_type.as_str()));
        Ok(())
    }
}

impl DeleteResourceColumn {
    /// Creates a delete-column action.
    pub fn new(target: ColumnTarget, column_name: impl Into<String>) -> Self {
        Self {
            target,
            column_name: column_name.into(),
        }
    }

    fn execute(&self, files: &mut DocumentMap) -> Result<(), PlanError> {
        let columns = self.target.columns_mut(files)?;
        let index =
            position_of(columns, &self.column_name).ok_or_else(|| self.target.column_not_found(&self.column_name))?;
        columns.remove(index);
        Ok(())
    }
}

impl ReorderResourceColumns {
    /// Creates a reorder action.
    ///
    /// # Errors
    ///
    /// Returns an error if `columns_order` names a column twice.
    pub fn new(target: ColumnTarget, columns_order: Vec<String>) -> Result<Self, PlanError> {
        let unique: BTreeSet<&str> = columns_order.iter().map(String::as_str).collect();
        if unique.len() != columns_order.len() {
            return Err(PlanError::DuplicateColumnOrder { columns: columns_order });
        }

        Ok(Self { target, columns_order })
    }

    /// Requested column order.
    #[must_use]
    pub fn columns_order(&self) -> &[String] {
        &self.columns_order
    }

    fn execute(&self, files: &mut DocumentMap) -> Result<(), PlanError> {
        let path = self.target.path.clone();
        let columns = self.target.columns_mut(files)?;

        let current = columns
            .iter()
            .map(|c| {
                entry_name(c)
                    .map(String::from)
                    .ok_or_else(|| PlanError::malformed(&path, "column entry without a name"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let current_set: BTreeSet<&str> = current.iter().map(String::as_str).collect();
        let requested_set: BTreeSet<&str> = self.columns_order.iter().map(String::as_str).collect();
        if current.len() != current_set.len() || current_set != requested_set {
            return Err(PlanError::ColumnOrderMismatch {
                resource_name: self.target.qualified_name(),
                current,
                requested: self.columns_order.clone(),
            });
        }

        let mut by_name: HashMap<String, Value> = current.into_iter().zip(columns.drain(..)).collect();
        columns.extend(self.columns_order.iter().filter_map(|name| by_name.remove(name)));
        Ok(())
    }
}

impl Action {
    /// Files the action reads or writes.
    #[must_use]
    pub fn affected_files(&self) -> BTreeSet<PathBuf> {
        match self {
            Self::RelocateResource(a) => BTreeSet::from([a.from_path.clone(), a.to_path.clone()]),
            Self::BootstrapResource(a) => BTreeSet::from([a.path.clone()]),
            Self::DeleteEmptyDescriptor(a) => BTreeSet::from([a.path.clone()]),
            Self::AddResourceColumn(a) => BTreeSet::from([a.target.path.clone()]),
            Self::UpdateResourceColumn(a) => BTreeSet::from([a.target.path.clone()]),
            Self::DeleteResourceColumn(a) => BTreeSet::from([a.target.path.clone()]),
            Self::ReorderResourceColumns(a) => BTreeSet::from([a.target.path.clone()]),
        }
    }

    /// Human-readable audit line.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::RelocateResource(a) => format!(
                "Move {} '{}' from {} to {}",
                a.resource_type,
                a.resource_name,
                a.from_path.display(),
                a.to_path.display()
            ),
            Self::BootstrapResource(a) => format!(
                "Bootstrap {} '{}' in {}",
                a.resource_type,
                a.resource_name,
                a.path.display()
            ),
            Self::DeleteEmptyDescriptor(a) => format!("Delete {} if empty", a.path.display()),
            Self::AddResourceColumn(a) => format!(
                "Add column '{}' ({}{}) to {} in {}",
                a.column_name,
                a.column_type,
                if a.column_quote { ", quoted" } else { "" },
                a.target,
                a.target.path.display()
            ),
            Self::UpdateResourceColumn(a) => format!(
                "Set type of column '{}' to {} in {} at {}",
                a.column_name,
                a.column_type,
                a.target,
                a.target.path.display()
            ),
            Self::DeleteResourceColumn(a) => format!(
                "Delete column '{}' from {} in {}",
                a.column_name,
                a.target,
                a.target.path.display()
            ),
            Self::ReorderResourceColumns(a) => format!(
                "Reorder columns of {} in {}: {}",
                a.target,
                a.target.path.display(),
                a.columns_order.join(", ")
            ),
        }
    }

    /// Applies the action to the working set.
    ///
    /// # Errors
    ///
    /// Returns an error if a descriptor, resource entry or column the action
    /// depends on is missing, or a descriptor has an unexpected shape.
    pub fn execute(&self, files: &mut DocumentMap) -> Result<(), PlanError> {
        match self {
            Self::RelocateResource(a) => a.execute(files),
            Self::BootstrapResource(a) => a.execute(files),
            Self::DeleteEmptyDescriptor(a) => {
                a.execute(files);
                Ok(())
            }
            Self::AddResourceColumn(a) => a.execute(files),
            Self::UpdateResourceColumn(a) => a.execute(files),
            Self::DeleteResourceColumn(a) => a.execute(files),
            Self::ReorderResourceColumns(a) => a.execute(files),
        }
    }

    /// Short label of the action kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RelocateResource(_) => "relocate",
            Self::BootstrapResource(_) => "bootstrap",
            Self::DeleteEmptyDescriptor(_) => "delete-descriptor",
            Self::AddResourceColumn(_) => "add-column",
            Self::UpdateResourceColumn(_) => "update-column",
            Self::DeleteResourceColumn(_) => "delete-column",
            Self::ReorderResourceColumns(_) => "reorder-columns",
        }
    }

    /// Resource the action edits, if any.
    #[must_use]
    pub fn resource_name(&self) -> Option<String> {
        match self {
            Self::RelocateResource(a) => Some(a.resource_name.clone()),
            Self::BootstrapResource(a) => Some(a.resource_name.clone()),
            Self::DeleteEmptyDescriptor(_) => None,
            Self::AddResourceColumn(a) => Some(a.target.qualified_name()),
            Self::UpdateResourceColumn(a) => Some(a.target.qualified_name()),
            Self::DeleteResourceColumn(a) => Some(a.target.qualified_name()),
            Self::ReorderResourceColumns(a) => Some(a.target.qualified_name()),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Action {
                fn from(action: $variant) -> Self {
                    Self::$variant(action)
                }
            }
        )*
    };
}

impl_from_variant!(
    RelocateResource,
    BootstrapResource,
    DeleteEmptyDescriptor,
    AddResourceColumn,
    UpdateResourceColumn,
    DeleteResourceColumn,
    ReorderResourceColumns,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Document;

    fn parse(yaml: &str) -> Document {
        serde_yaml::from_str(yaml).expect("valid yaml")
    }

    fn files(entries: &[(&str, &str)]) -> DocumentMap {
        entries
            .iter()
            .map(|(path, yaml)| (PathBuf::from(path), Some(parse(yaml))))
            .collect()
    }

    fn model_target(path: &str) -> ColumnTarget {
        ColumnTarget::new(ResourceType::Model, "customers", None, path).expect("valid target")
    }

    fn column_names(files: &DocumentMap, path: &str) -> Vec<String> {
        let doc = files[Path::new(path)].as_ref().expect("document present");
        doc["models"][0]["columns"]
            .as_sequence()
            .expect("columns list")
            .iter()
            .filter_map(|c| entry_name(c).map(String::from))
            .collect()
    }

    const CUSTOMERS: &str = "\
version: 2
models:
  - name: customers
    columns:
      - name: id
        data_type: SHORT
      - name: name
        data_type: VARCHAR
";

    #[test]
    fn test_relocate_moves_entry() {
        let mut files = files(&[("models/a.yml", CUSTOMERS)]);
        let action = Action::from(RelocateResource::new(
            ResourceType::Model,
            "customers",
            "models/a.yml",
            "models/b.yml",
        ));

        action.execute(&mut files).expect("relocated");

        assert_eq!(files[Path::new("models/a.yml")], Some(parse("version: 2\nmodels: []\n")));
        let moved = files[Path::new("models/b.yml")].as_ref().expect("created");
        assert_eq!(moved["version"], Value::from(2));
        assert_eq!(entry_name(&moved["models"][0]), Some("customers"));
    }

    #[test]
    fn test_relocate_round_trip() {
        let original = files(&[("models/a.yml", CUSTOMERS)]);
        let mut working = original.clone();

        RelocateResource::new(ResourceType::Model, "customers", "models/a.yml", "models/b.yml")
            .execute(&mut working)
            .expect("forward");
        RelocateResource::new(ResourceType::Model, "customers", "models/b.yml", "models/a.yml")
            .execute(&mut working)
            .expect("back");

        assert_eq!(working[Path::new("models/a.yml")], original[Path::new("models/a.yml")]);
    }

    #[test]
    fn test_relocate_source_block() {
        let mut files = files(&[(
            "models/_sources.yml",
            "version: 2\nsources:\n  - name: ingested\n    tables:\n      - name: customers\n      - name: orders\n",
        )]);

        RelocateResource::new(ResourceType::Source, "ingested", "models/_sources.yml", "sources/ingested.yml")
            .execute(&mut files)
            .expect("relocated");

        let moved = files[Path::new("sources/ingested.yml")].as_ref().expect("created");
        assert_eq!(moved["sources"][0]["tables"].as_sequence().map(Vec::len), Some(2));
    }

    #[test]
    fn test_relocate_not_found() {
        let mut files = files(&[("models/a.yml", CUSTOMERS)]);

        let missing_file = RelocateResource::new(ResourceType::Model, "customers", "models/x.yml", "models/b.yml");
        assert!(matches!(
            missing_file.execute(&mut files),
            Err(PlanError::DescriptorNotFound { .. })
        ));

        let missing_entry = RelocateResource::new(ResourceType::Model, "orders", "models/a.yml", "models/b.yml");
        assert!(matches!(
            missing_entry.execute(&mut files),
            Err(PlanError::ResourceNotFound { .. })
        ));
    }

    #[test]
    fn test_bootstrap_creates_document() {
        let mut files = DocumentMap::new();
        let action = BootstrapResource::new(ResourceType::Model, "customers", "models/customers.yml")
            .expect("models can be bootstrapped");

        action.execute(&mut files).expect("bootstrapped");

        assert_eq!(
            files[Path::new("models/customers.yml")],
            Some(parse("version: 2\nmodels:\n  - name: customers\n    columns: []\n"))
        );
    }

    #[test]
    fn test_bootstrap_appends_to_existing() {
        let mut files = files(&[("models/a.yml", CUSTOMERS)]);
        BootstrapResource::new(ResourceType::Model, "orders", "models/a.yml")
            .expect("valid")
            .execute(&mut files)
            .expect("bootstrapped");

        let doc = files[Path::new("models/a.yml")].as_ref().expect("present");
        assert_eq!(entry_name(&doc["models"][1]), Some("orders"));
    }

    #[test]
    fn test_bootstrap_source_forbidden() {
        assert_eq!(
            BootstrapResource::new(ResourceType::Source, "customers", "models/_sources.yml"),
            Err(PlanError::SourceBootstrapForbidden {
                resource_name: String::from("customers")
            })
        );
    }

    #[test]
    fn test_delete_empty_descriptor() {
        let mut files = files(&[("empty.yml", "version: 2\nmodels: []\n"), ("full.yml", CUSTOMERS)]);
        let before = files[Path::new("full.yml")].clone();

        Action::from(DeleteEmptyDescriptor::new("empty.yml"))
            .execute(&mut files)
            .expect("applied");
        Action::from(DeleteEmptyDescriptor::new("full.yml"))
            .execute(&mut files)
            .expect("applied");
        Action::from(DeleteEmptyDescriptor::new("absent.yml"))
            .execute(&mut files)
            .expect("applied");

        assert_eq!(files[Path::new("empty.yml")], None);
        assert_eq!(files[Path::new("full.yml")], before);
        assert!(!files.contains_key(Path::new("absent.yml")));
    }

    #[test]
    fn test_column_target_invariants() {
        assert!(ColumnTarget::new(ResourceType::Source, "customers", None, "s.yml").is_err());
        assert!(ColumnTarget::new(ResourceType::Source, "customers", Some(String::new()), "s.yml").is_err());
        assert!(ColumnTarget::new(ResourceType::Model, "customers", Some(String::from("x")), "m.yml").is_err());
        assert!(ColumnTarget::new(ResourceType::Source, "customers", Some(String::from("x")), "s.yml").is_ok());
    }

    #[test]
    fn test_add_column() {
        let mut files = files(&[("m.yml", CUSTOMERS)]);

        AddResourceColumn::new(model_target("m.yml"), "LAST NAME", true, "VARCHAR")
            .execute(&mut files)
            .expect("added");

        let doc = files[Path::new("m.yml")].as_ref().expect("present");
        let added = &doc["models"][0]["columns"][2];
        let keys: Vec<&str> = added
            .as_mapping()
            .expect("mapping")
            .keys()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(keys, ["name", "quote", "data_type"]);
    }

    #[test]
    fn test_add_column_creates_columns_list() {
        let mut files = files(&[("m.yml", "version: 2\nmodels:\n  - name: customers\n")]);

        AddResourceColumn::new(model_target("m.yml"), "ID", false, "INTEGER")
            .execute(&mut files)
            .expect("added");

        assert_eq!(column_names(&files, "m.yml"), ["ID"]);
    }

    #[test]
    fn test_add_column_to_source_table() {
        let mut files = files(&[(
            "s.yml",
            "version: 2\nsources:\n  - name: ingested\n    tables:\n      - name: customers\n        columns: []\n",
        )]);
        let target = ColumnTarget::new(ResourceType::Source, "customers", Some(String::from("ingested")), "s.yml")
            .expect("valid");

        AddResourceColumn::new(target, "ID", false, "INTEGER")
            .execute(&mut files)
            .expect("added");

        let doc = files[Path::new("s.yml")].as_ref().expect("present");
        assert_eq!(entry_name(&doc["sources"][0]["tables"][0]["columns"][0]), Some("ID"));
    }

    #[test]
    fn test_column_action_missing_descriptor() {
        let mut files = DocumentMap::new();
        assert!(matches!(
            AddResourceColumn::new(model_target("m.yml"), "ID", false, "INTEGER").execute(&mut files),
            Err(PlanError::DescriptorNotFound { .. })
        ));
    }

    #[test]
    fn test_column_action_missing_resource() {
        let mut files = files(&[("m.yml", "version: 2\nmodels:\n  - name: orders\n")]);
        assert!(matches!(
            AddResourceColumn::new(model_target("m.yml"), "ID", false, "INTEGER").execute(&mut files),
            Err(PlanError::ResourceNotFound { .. })
        ));
    }

    #[test]
    fn test_update_column() {
        let mut files = files(&[("m.yml", CUSTOMERS)]);

        UpdateResourceColumn::new(model_target("m.yml"), "id", "INTEGER")
            .execute(&mut files)
            .expect("updated");

        let doc = files[Path::new("m.yml")].as_ref().expect("present");
        assert_eq!(doc["models"][0]["columns"][0]["data_type"], Value::from("INTEGER"));
    }

    #[test]
    fn test_update_column_exact_match_only() {
        let mut files = files(&[("m.yml", CUSTOMERS)]);
        assert!(matches!(
            UpdateResourceColumn::new(model_target("m.yml"), "ID", "INTEGER").execute(&mut files),
            Err(PlanError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_delete_column() {
        let mut files = files(&[("m.yml", CUSTOMERS)]);

        DeleteResourceColumn::new(model_target("m.yml"), "id")
            .execute(&mut files)
            .expect("deleted");
        assert_eq!(column_names(&files, "m.yml"), ["name"]);

        assert!(matches!(
            DeleteResourceColumn::new(model_target("m.yml"), "id").execute(&mut files),
            Err(PlanError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_reorder_columns() {
        let mut files = files(&[("m.yml", CUSTOMERS)]);
        let order = vec![String::from("name"), String::from("id")];

        ReorderResourceColumns::new(model_target("m.yml"), order)
            .expect("unique")
            .execute(&mut files)
            .expect("reordered");

        assert_eq!(column_names(&files, "m.yml"), ["name", "id"]);
        let doc = files[Path::new("m.yml")].as_ref().expect("present");
        assert_eq!(doc["models"][0]["columns"][1]["data_type"], Value::from("SHORT"));
    }

    #[test]
    fn test_reorder_rejects_duplicates() {
        let order = vec![String::from("id"), String::from("id")];
        assert!(matches!(
            ReorderResourceColumns::new(model_target("m.yml"), order),
            Err(PlanError::DuplicateColumnOrder { .. })
        ));
    }

    #[test]
    fn test_reorder_requires_same_set() {
        let mut files = files(&[("m.yml", CUSTOMERS)]);

        for order in [vec!["id"], vec!["id", "name", "extra"], vec!["id", "other"]] {
            let order = order.into_iter().map(String::from).collect();
            let action = ReorderResourceColumns::new(model_target("m.yml"), order).expect("unique");
            assert!(matches!(
                action.execute(&mut files),
                Err(PlanError::ColumnOrderMismatch { .. })
            ));
        }
        assert_eq!(column_names(&files, "m.yml"), ["id", "name"]);
    }

    #[test]
    fn test_affected_files() {
        let relocate = Action::from(RelocateResource::new(ResourceType::Model, "m", "a.yml", "b.yml"));
        assert_eq!(
            relocate.affected_files(),
            BTreeSet::from([PathBuf::from("a.yml"), PathBuf::from("b.yml")])
        );

        let delete = Action::from(DeleteResourceColumn::new(model_target("m.yml"), "id"));
        assert_eq!(delete.affected_files(), BTreeSet::from([PathBuf::from("m.yml")]));
    }
}
