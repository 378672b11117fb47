//! Observed runtime table shapes.

use serde::{Deserialize, Serialize};

use crate::error::InvariantError;

use super::resource::{ResourceConfig, ResourceId};

/// A column as reported by the warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableColumn {
    /// Column name, as cased by the warehouse.
    pub name: String,
    /// Generic type name (e.g. `DECIMAL`).
    pub dtype: String,
    /// Precise type name (e.g. `DECIMAL(18,3)`).
    pub data_type: String,
    /// Whether the column holds numbers.
    #[serde(default)]
    pub is_numeric: bool,
    /// Whether the column holds strings.
    #[serde(default)]
    pub is_string: bool,
}

impl TableColumn {
    /// Creates a column whose generic and precise types are identical.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        let data_type = data_type.into();
        Self {
            name: name.into(),
            dtype: data_type.clone(),
            data_type,
            is_numeric: false,
            is_string: false,
        }
    }

    /// The type string to record in a descriptor under `config`.
    ///
    /// Precise types are used only when the resource opts in for the
    /// column's category.
    #[must_use]
    pub fn recorded_type(&self, config: &ResourceConfig) -> &str {
        let precise = (self.is_numeric && config.numeric_precision_and_scale)
            || (self.is_string && config.string_length);

        if precise { &self.data_type } else { &self.dtype }
    }
}

/// Unvalidated table fields, as produced by a loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Resource the table backs.
    pub resource_id: ResourceId,
    /// Observed columns, in table order.
    pub columns: Vec<TableColumn>,
}

/// The observed shape of a resource's backing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TableSpec", into = "TableSpec")]
pub struct Table {
    resource_id: ResourceId,
    columns: Vec<TableColumn>,
}

impl Table {
    /// Builds a table record.
    ///
    /// # Errors
    ///
    /// Returns an error if `columns` is empty.
    pub fn try_new(resource_id: ResourceId, columns: Vec<TableColumn>) -> Result<Self, InvariantError> {
        if columns.is_empty() {
            return Err(InvariantError::EmptyTable {
                resource_id: resource_id.to_string(),
            });
        }

        Ok(Self {
            resource_id,
            columns,
        })
    }

    /// Resource the table backs.
    #[must_use]
    pub const fn resource_id(&self) -> &ResourceId {
        &self.resource_id
    }

    /// Observed columns, in table order.
    #[must_use]
    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }
}

impl TryFrom<TableSpec> for Table {
    type Error = InvariantError;

    fn try_from(spec: TableSpec) -> Result<Self, Self::Error> {
        Self::try_new(spec.resource_id, spec.columns)
    }
}

impl From<Table> for TableSpec {
    fn from(table: Table) -> Self {
        Self {
            resource_id: table.resource_id,
            columns: table.columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decimal_column() -> TableColumn {
        TableColumn {
            name: String::from("AMOUNT"),
            dtype: String::from("DECIMAL"),
            data_type: String::from("DECIMAL(18,3)"),
            is_numeric: true,
            is_string: false,
        }
    }

    fn varchar_column() -> TableColumn {
        TableColumn {
            name: String::from("NAME"),
            dtype: String::from("VARCHAR"),
            data_type: String::from("VARCHAR(256)"),
            is_numeric: false,
            is_string: true,
        }
    }

    #[test]
    fn test_empty_table_rejected() {
        let result = Table::try_new(ResourceId::new("model.p.m"), vec![]);
        assert_eq!(
            result,
            Err(InvariantError::EmptyTable {
                resource_id: String::from("model.p.m")
            })
        );
    }

    #[test]
    fn test_recorded_type_defaults_to_generic() {
        let config = ResourceConfig::default();
        assert_eq!(decimal_column().recorded_type(&config), "DECIMAL");
        assert_eq!(varchar_column().recorded_type(&config), "VARCHAR");
    }

    #[test]
    fn test_recorded_type_numeric_opt_in() {
        let config = ResourceConfig {
            numeric_precision_and_scale: true,
            ..ResourceConfig::default()
        };
        assert_eq!(decimal_column().recorded_type(&config), "DECIMAL(18,3)");
        assert_eq!(varchar_column().recorded_type(&config), "VARCHAR");
    }

    #[test]
    fn test_recorded_type_string_opt_in() {
        let config = ResourceConfig {
            string_length: true,
            ..ResourceConfig::default()
        };
        assert_eq!(decimal_column().recorded_type(&config), "DECIMAL");
        assert_eq!(varchar_column().recorded_type(&config), "VARCHAR(256)");
    }

    #[test]
    fn test_deserialize_empty_table_fails() {
        let json = r#"{"resource_id": "model.p.m", "columns": []}"#;
        let result: Result<Table, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
