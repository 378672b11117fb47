//! Descriptor document helpers.
//!
//! Descriptors are dbt-style schema files:
//!
//! ```yaml
//! version: 2
//! models:
//!   - name: customers
//!     columns:
//!       - name: id
//!         data_type: INTEGER
//! sources:
//!   - name: ingested
//!     tables:
//!       - name: customers
//!         columns: []
//! ```

use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::PlanError;
use crate::model::ResourceType;

/// A parsed YAML descriptor.
pub type Document = Value;

/// Working set of descriptors. `None` marks a file for deletion.
pub type DocumentMap = BTreeMap<PathBuf, Option<Document>>;

const VERSION_KEY: &str = "version";
const NAME_KEY: &str = "name";
const COLUMNS_KEY: &str = "columns";
const TABLES_KEY: &str = "tables";

/// Creates `{version: 2, <plural>: []}`.
#[must_use]
pub fn new_descriptor(resource_type: ResourceType) -> Document {
    let mut mapping = Mapping::new();
    mapping.insert(Value::from(VERSION_KEY), Value::from(2));
    mapping.insert(
        Value::from(resource_type.plural_name()),
        Value::Sequence(Vec::new()),
    );
    Value::Mapping(mapping)
}

/// Creates `{name: <name>, columns: []}`.
#[must_use]
pub fn new_resource_entry(name: &str) -> Value {
    let mut mapping = Mapping::new();
    mapping.insert(Value::from(NAME_KEY), Value::from(name));
    mapping.insert(Value::from(COLUMNS_KEY), Value::Sequence(Vec::new()));
    Value::Mapping(mapping)
}

/// Creates a column entry with keys in `name`, `quote`, `data_type` order.
///
/// `quote` is only written when true.
#[must_use]
pub fn new_column_entry(name: &str, quote: bool, data_type: &str) -> Value {
    let mut mapping = Mapping::new();
    mapping.insert(Value::from(NAME_KEY), Value::from(name));
    if quote {
        mapping.insert(Value::from("quote"), Value::Bool(true));
    }
    mapping.insert(Value::from("data_type"), Value::from(data_type));
    Value::Mapping(mapping)
}

/// The `name` of an entry, if it has a string one.
#[must_use]
pub fn entry_name(entry: &Value) -> Option<&str> {
    entry.get(NAME_KEY).and_then(Value::as_str)
}

/// Position of the entry called `name` in `entries`.
#[must_use]
pub fn position_of(entries: &[Value], name: &str) -> Option<usize> {
    entries.iter().position(|e| entry_name(e) == Some(name))
}

/// Returns the document for `path`, synthesizing an empty descriptor when
/// the path is absent or marked for deletion.
pub fn document_or_new<'a>(
    files: &'a mut DocumentMap,
    path: &Path,
    resource_type: ResourceType,
) -> &'a mut Document {
    files
        .entry(path.to_path_buf())
        .or_insert(None)
        .get_or_insert_with(|| new_descriptor(resource_type))
}

/// Returns the loaded document for `path`.
///
/// # Errors
///
/// Returns `DescriptorNotFound` if the path is absent or marked for deletion.
pub fn document_mut<'a>(
    files: &'a mut DocumentMap,
    path: &Path,
    resource_name: &str,
) -> Result<&'a mut Document, PlanError> {
    files
        .get_mut(path)
        .and_then(Option::as_mut)
        .ok_or_else(|| PlanError::DescriptorNotFound {
            resource_name: resource_name.to_string(),
            path: path.to_path_buf(),
        })
}

/// Returns the list under `key`, creating it if absent or null.
///
/// # Errors
///
/// Returns `MalformedDescriptor` if `parent` is not a mapping or the key
/// holds something other than a list.
pub fn list_or_new<'a>(parent: &'a mut Value, key: &str, path: &Path) -> Result<&'a mut Vec<Value>, PlanError> {
    let mapping = parent
        .as_mapping_mut()
        .ok_or_else(|| PlanError::malformed(path, format!("expected a mapping holding '{key}'")))?;

    let value = mapping
        .entry(Value::from(key))
        .or_insert(Value::Sequence(Vec::new()));
    if value.is_null() {
        *value = Value::Sequence(Vec::new());
    }

    value
        .as_sequence_mut()
        .ok_or_else(|| PlanError::malformed(path, format!("'{key}' is not a list")))
}

/// Returns the list under `key` if one exists.
///
/// # Errors
///
/// Returns `MalformedDescriptor` if the key holds something other than a
/// list or null.
pub fn existing_list_mut<'a>(
    parent: &'a mut Value,
    key: &str,
    path: &Path,
) -> Result<Option<&'a mut Vec<Value>>, PlanError> {
    match parent.get_mut(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Sequence(entries)) => Ok(Some(entries)),
        Some(_) => Err(PlanError::malformed(path, format!("'{key}' is not a list"))),
    }
}

/// Returns true if no resource-type key of `document` holds any entries.
#[must_use]
pub fn is_empty_descriptor(document: &Document) -> bool {
    ResourceType::ALL.iter().all(|t| match document.get(t.plural_name()) {
        None | Some(Value::Null) => true,
        Some(Value::Sequence(entries)) => entries.is_empty(),
        Some(_) => false,
    })
}

/// Addresses one resource entry inside a descriptor.
pub struct EntryLocator<'a> {
    /// Kind of resource.
    pub resource_type: ResourceType,
    /// Name of the resource (table name for sources).
    pub resource_name: &'a str,
    /// Source block holding the table, sources only.
    pub source_name: Option<&'a str>,
    /// Descriptor path, used in errors.
    pub path: &'a Path,
}

impl EntryLocator<'_> {
    /// Finds the resource entry in `document`, descending into the source's
    /// `tables` list for sources.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the source or resource entry is missing.
    pub fn find_mut<'d>(&self, document: &'d mut Document) -> Result<&'d mut Value, PlanError> {
        let plural = self.resource_type.plural_name();

        let entries = match self.source_name {
            Some(source_name) => {
                let sources = self.entries_in(document, plural, source_name)?;
                let index = position_of(sources, source_name)
                    .ok_or_else(|| self.not_found(self.resource_type.as_str(), source_name))?;
                let source = &mut sources[index];
                self.entries_in(source, TABLES_KEY, self.resource_name)?
            }
            None => self.entries_in(document, plural, self.resource_name)?,
        };

        let index = position_of(entries, self.resource_name)
            .ok_or_else(|| self.not_found(self.resource_type.as_str(), self.resource_name))?;
        Ok(&mut entries[index])
    }

    fn entries_in<'d>(&self, parent: &'d mut Value, key: &str, wanted: &str) -> Result<&'d mut Vec<Value>, PlanError> {
        existing_list_mut(parent, key, self.path)?
            .ok_or_else(|| self.not_found(self.resource_type.as_str(), wanted))
    }

    fn not_found(&self, kind: &str, name: &str) -> PlanError {
        PlanError::ResourceNotFound {
            resource_type: kind.to_string(),
            resource_name: name.to_string(),
            path: self.path.to_path_buf(),
        }
    }
}

/// Returns the `columns` list of a resource entry, creating it if needed.
///
/// # Errors
///
/// Returns `MalformedDescriptor` if the entry or its columns have the
/// wrong shape.
pub fn columns_mut<'a>(entry: &'a mut Value, path: &Path) -> Result<&'a mut Vec<Value>, PlanError> {
    list_or_new(entry, COLUMNS_KEY, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Document {
        serde_yaml::from_str(yaml).expect("valid yaml")
    }

    #[test]
    fn test_new_descriptor_shape() {
        let doc = new_descriptor(ResourceType::Model);
        assert_eq!(doc, parse("version: 2\nmodels: []\n"));
    }

    #[test]
    fn test_new_column_entry_key_order() {
        let rendered = serde_yaml::to_string(&new_column_entry("last_name", true, "VARCHAR")).expect("serializable");
        assert_eq!(rendered, "name: last_name\nquote: true\ndata_type: VARCHAR\n");

        let rendered = serde_yaml::to_string(&new_column_entry("ID", false, "INTEGER")).expect("serializable");
        assert_eq!(rendered, "name: ID\ndata_type: INTEGER\n");
    }

    #[test]
    fn test_document_or_new_replaces_deleted() {
        let mut files = DocumentMap::from([(PathBuf::from("m.yml"), None)]);

        document_or_new(&mut files, Path::new("m.yml"), ResourceType::Seed);
        document_or_new(&mut files, Path::new("n.yml"), ResourceType::Model);

        assert_eq!(files[Path::new("m.yml")], Some(parse("version: 2\nseeds: []\n")));
        assert_eq!(files[Path::new("n.yml")], Some(parse("version: 2\nmodels: []\n")));
    }

    #[test]
    fn test_is_empty_descriptor() {
        assert!(is_empty_descriptor(&parse("version: 2\nmodels: []\n")));
        assert!(is_empty_descriptor(&parse("version: 2\n")));
        assert!(is_empty_descriptor(&parse("version: 2\nseeds: []\nsources:\n")));
        assert!(!is_empty_descriptor(&parse("version: 2\nmodels:\n  - name: m\n")));
    }

    #[test]
    fn test_locate_model_entry() {
        let mut doc = parse("version: 2\nmodels:\n  - name: a\n  - name: b\n");
        let locator = EntryLocator {
            resource_type: ResourceType::Model,
            resource_name: "b",
            source_name: None,
            path: Path::new("m.yml"),
        };
        let entry = locator.find_mut(&mut doc).expect("entry exists");
        assert_eq!(entry_name(entry), Some("b"));
    }

    #[test]
    fn test_locate_source_table() {
        let mut doc = parse(
            "version: 2\nsources:\n  - name: ingested\n    tables:\n      - name: customers\n",
        );
        let locator = EntryLocator {
            resource_type: ResourceType::Source,
            resource_name: "customers",
            source_name: Some("ingested"),
            path: Path::new("s.yml"),
        };
        assert!(locator.find_mut(&mut doc).is_ok());

        let missing_source = EntryLocator {
            source_name: Some("other"),
            ..locator
        };
        assert!(matches!(
            missing_source.find_mut(&mut doc),
            Err(PlanError::ResourceNotFound { ref resource_name, .. }) if resource_name == "other"
        ));
    }

    #[test]
    fn test_columns_created_when_null() {
        let mut entry = parse("name: m\ncolumns:\n");
        let columns = columns_mut(&mut entry, Path::new("m.yml")).expect("columns");
        assert!(columns.is_empty());
    }

    #[test]
    fn test_malformed_columns() {
        let mut entry = parse("name: m\ncolumns: 3\n");
        assert!(matches!(
            columns_mut(&mut entry, Path::new("m.yml")),
            Err(PlanError::MalformedDescriptor { .. })
        ));
    }
}
