//! Descriptor path template resolution.

use std::path::{Path, PathBuf};

use crate::error::PathError;

/// Expands `yaml_path_template` values into project-relative paths.
///
/// Templates accept two placeholders:
///
/// - `{name}`: the resource name
/// - `{parent}`: the name of the directory holding the resource's code file
///
/// A leading `/` makes the template relative to the project root. Any other
/// template is resolved next to the resource's code file.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathResolver;

impl PathResolver {
    /// Creates a resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Resolves `template` for one resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is resource-relative or uses
    /// `{parent}` while `resource_path` is `None`.
    pub fn resolve(
        &self,
        template: &str,
        resource_name: &str,
        resource_path: Option<&Path>,
    ) -> Result<PathBuf, PathError> {
        let root_relative = template.starts_with('/');
        if !root_relative && resource_path.is_none() {
            return Err(PathError::NotRootRelative {
                resource_name: resource_name.to_string(),
                template: template.to_string(),
            });
        }

        let mut resolved = template.replace("{name}", resource_name);

        if resolved.contains("{parent}") {
            let parent = resource_path
                .and_then(Path::parent)
                .and_then(Path::file_name)
                .map(|p| p.to_string_lossy().into_owned());

            match parent {
                Some(parent) => resolved = resolved.replace("{parent}", &parent),
                None if resource_path.is_none() => {
                    return Err(PathError::ParentUnavailable {
                        resource_name: resource_name.to_string(),
                        template: template.to_string(),
                    });
                }
                // Code file at the project root
                None => resolved = resolved.replace("{parent}", ""),
            }
        }

        let Some(resource_path) = resource_path.filter(|_| !root_relative) else {
            return Ok(PathBuf::from(resolved.strip_prefix('/').unwrap_or(&resolved)));
        };

        let base = resource_path.parent().unwrap_or_else(|| Path::new(""));
        Ok(base.join(resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(template: &str, name: &str, path: Option<&str>) -> Result<PathBuf, PathError> {
        PathResolver::new().resolve(template, name, path.map(Path::new))
    }

    #[test]
    fn test_resource_relative() {
        assert_eq!(
            resolve("_schema.yml", "m", Some("models/staging/m.sql")),
            Ok(PathBuf::from("models/staging/_schema.yml"))
        );
        assert_eq!(
            resolve("{name}.yml", "customers", Some("models/staging/customers.sql")),
            Ok(PathBuf::from("models/staging/customers.yml"))
        );
    }

    #[test]
    fn test_root_relative() {
        assert_eq!(
            resolve("/models/_schema.yml", "m", Some("models/staging/m.sql")),
            Ok(PathBuf::from("models/_schema.yml"))
        );
        assert_eq!(
            resolve("/models/_{name}.yml", "src", None),
            Ok(PathBuf::from("models/_src.yml"))
        );
    }

    #[test]
    fn test_parent_placeholder() {
        assert_eq!(
            resolve("_{parent}.yml", "m", Some("models/staging/m.sql")),
            Ok(PathBuf::from("models/staging/_staging.yml"))
        );
        assert_eq!(
            resolve("/schema/{parent}/{name}.yml", "m", Some("models/marts/m.sql")),
            Ok(PathBuf::from("schema/marts/m.yml"))
        );
    }

    #[test]
    fn test_sources_require_root_relative() {
        assert_eq!(
            resolve("_{name}.yml", "src", None),
            Err(PathError::NotRootRelative {
                resource_name: String::from("src"),
                template: String::from("_{name}.yml"),
            })
        );
    }

    #[test]
    fn test_relative_parent_template_without_path() {
        assert_eq!(
            resolve("{parent}/_{name}.yml", "src", None),
            Err(PathError::NotRootRelative {
                resource_name: String::from("src"),
                template: String::from("{parent}/_{name}.yml"),
            })
        );
    }

    #[test]
    fn test_parent_without_path() {
        assert!(matches!(
            resolve("/models/{parent}.yml", "src", None),
            Err(PathError::ParentUnavailable { .. })
        ));
    }

    #[test]
    fn test_no_normalization() {
        assert_eq!(
            resolve("../shared/{name}.yml", "m", Some("models/staging/m.sql")),
            Ok(PathBuf::from("models/staging/../shared/m.yml"))
        );
    }
}
