//! Resource selection patterns.
//!
//! Supports dbt-style selectors:
//! - `stg_*` - resources whose name, unique id or `source.table` name matches
//! - `type:model` - resources of one type
//! - `path:models/staging/*` - resources whose code or descriptor path matches
//!
//! `*` matches any run of characters. Several patterns may be given in one
//! argument, separated by spaces.

use regex::Regex;

use crate::config::ResourceParams;
use crate::error::{ConfigError, Result, SyncError};
use crate::model::{Resource, ResourceType};

/// A single parsed pattern.
#[derive(Debug, Clone)]
enum Pattern {
    /// Matches names and ids.
    Name(Regex),
    /// Matches a resource type.
    Type(ResourceType),
    /// Matches code and descriptor paths.
    Path(Regex),
}

impl Pattern {
    fn parse(pattern: &str, flag: &str) -> Result<Self> {
        let invalid = |reason: &str| -> SyncError {
            ConfigError::ParseError {
                message: format!("Invalid selector '{pattern}': {reason}"),
                location: Some(flag.to_string()),
            }
            .into()
        };

        if let Some(type_name) = pattern.strip_prefix("type:") {
            return ResourceType::parse(type_name)
                .map(Self::Type)
                .ok_or_else(|| invalid("unknown resource type"));
        }

        if let Some(path) = pattern.strip_prefix("path:") {
            if path.is_empty() {
                return Err(invalid("path: selector requires a pattern"));
            }
            return wildcard(path).map(Self::Path).map_err(|_| invalid("bad path pattern"));
        }

        wildcard(pattern).map(Self::Name).map_err(|_| invalid("bad name pattern"))
    }

    fn matches(&self, resource: &Resource) -> bool {
        match self {
            Self::Type(resource_type) => resource.resource_type() == *resource_type,
            Self::Path(re) => [resource.path(), resource.yaml_path()]
                .into_iter()
                .flatten()
                .any(|p| re.is_match(&p.to_string_lossy())),
            Self::Name(re) => {
                re.is_match(resource.name())
                    || re.is_match(resource.unique_id().as_str())
                    || resource
                        .source_name()
                        .is_some_and(|source| re.is_match(&format!("{source}.{}", resource.name())))
            }
        }
    }
}

/// Translates a `*` wildcard into an anchored regex.
fn wildcard(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    let body = pattern.split('*').map(regex::escape).collect::<Vec<_>>().join(".*");
    Regex::new(&format!("^{body}$"))
}

fn parse_all(patterns: &[String], flag: &str) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .flat_map(|arg| arg.split_whitespace())
        .map(|p| Pattern::parse(p, flag))
        .collect()
}

/// Include and exclude patterns applied to loaded resources.
#[derive(Debug, Clone, Default)]
pub struct ResourceSelector {
    select: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl ResourceSelector {
    /// Parses the selection parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern names an unknown type or is empty.
    pub fn parse(params: &ResourceParams) -> Result<Self> {
        Ok(Self {
            select: parse_all(&params.select, "--select")?,
            exclude: parse_all(&params.exclude, "--exclude")?,
        })
    }

    /// Returns true if `resource` is selected and not excluded.
    ///
    /// With no select patterns every resource is selected.
    #[must_use]
    pub fn matches(&self, resource: &Resource) -> bool {
        let selected = self.select.is_empty() || self.select.iter().any(|p| p.matches(resource));
        selected && !self.exclude.iter().any(|p| p.matches(resource))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ResourceConfig, ResourceId, ResourceSpec};
    use std::path::PathBuf;

    fn model(name: &str) -> Resource {
        Resource::try_new(ResourceSpec {
            unique_id: ResourceId::new(format!("model.my_project.{name}")),
            name: name.to_string(),
            source_name: None,
            database: String::new(),
            schema: String::new(),
            identifier: name.to_string(),
            resource_type: ResourceType::Model,
            path: Some(PathBuf::from(format!("models/staging/{name}.sql"))),
            yaml_path: None,
            columns: vec![],
            config: ResourceConfig::default(),
        })
        .expect("valid resource")
    }

    fn source(source_name: &str, name: &str) -> Resource {
        Resource::try_new(ResourceSpec {
            unique_id: ResourceId::new(format!("source.my_project.{source_name}.{name}")),
            name: name.to_string(),
            source_name: Some(source_name.to_string()),
            database: String::new(),
            schema: String::new(),
            identifier: name.to_string(),
            resource_type: ResourceType::Source,
            path: None,
            yaml_path: Some(PathBuf::from("models/_sources.yml")),
            columns: vec![],
            config: ResourceConfig::default(),
        })
        .expect("valid resource")
    }

    fn selector(select: &[&str], exclude: &[&str]) -> ResourceSelector {
        ResourceSelector::parse(&ResourceParams {
            select: select.iter().map(ToString::to_string).collect(),
            exclude: exclude.iter().map(ToString::to_string).collect(),
        })
        .expect("valid selector")
    }

    #[test]
    fn test_empty_selects_all() {
        assert!(selector(&[], &[]).matches(&model("stg_customers")));
    }

    #[test]
    fn test_name_wildcard() {
        let selector = selector(&["stg_*"], &[]);
        assert!(selector.matches(&model("stg_customers")));
        assert!(!selector.matches(&model("customers")));
    }

    #[test]
    fn test_unique_id_and_source_name() {
        assert!(selector(&["model.my_project.*"], &[]).matches(&model("customers")));
        assert!(selector(&["ingested.orders"], &[]).matches(&source("ingested", "orders")));
        assert!(!selector(&["ingested.orders"], &[]).matches(&source("ingested", "customers")));
    }

    #[test]
    fn test_type_and_path() {
        assert!(selector(&["type:source"], &[]).matches(&source("ingested", "orders")));
        assert!(!selector(&["type:source"], &[]).matches(&model("orders")));
        assert!(selector(&["path:models/staging/*"], &[]).matches(&model("orders")));
        assert!(selector(&["path:*_sources.yml"], &[]).matches(&source("ingested", "orders")));
    }

    #[test]
    fn test_exclude_wins() {
        let selector = selector(&["stg_* type:source"], &["stg_orders"]);
        assert!(selector.matches(&model("stg_customers")));
        assert!(!selector.matches(&model("stg_orders")));
        assert!(selector.matches(&source("ingested", "orders")));
    }

    #[test]
    fn test_literal_characters_escaped() {
        assert!(!selector(&["stg.customers"], &[]).matches(&model("stgxcustomers")));
    }

    #[test]
    fn test_invalid_selectors() {
        let unknown = ResourceSelector::parse(&ResourceParams {
            select: vec![String::from("type:exposure")],
            exclude: vec![],
        });
        assert!(matches!(unknown, Err(SyncError::Config(ConfigError::ParseError { .. }))));

        let empty_path = ResourceSelector::parse(&ResourceParams {
            select: vec![],
            exclude: vec![String::from("path:")],
        });
        assert!(empty_path.is_err());
    }
}
