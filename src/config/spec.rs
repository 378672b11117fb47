//! Configuration types for the descriptor reconciliation tool.
//!
//! Tool settings live under `vars.dbt-yaml-sync` in `dbt_project.yml`:
//!
//! ```yaml
//! vars:
//!   dbt-yaml-sync:
//!     naming_canon: upper
//!     yaml_format:
//!       indent: 2
//!       offset: 2
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::canon::CanonKind;
use crate::error::InvariantError;

/// Output formatting preferences for descriptors.
///
/// `indent` and `offset` are either both set or both unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "YamlFormatSpec", into = "YamlFormatSpec")]
pub struct YamlFormat {
    indent: Option<usize>,
    offset: Option<usize>,
    preserve_quotes: Option<bool>,
    max_width: Option<usize>,
}

/// Raw `yaml_format` block, before validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YamlFormatSpec {
    /// Mapping indentation.
    #[serde(default)]
    pub indent: Option<usize>,
    /// Offset of sequence dashes from their parent.
    #[serde(default)]
    pub offset: Option<usize>,
    /// Keep original scalar quoting.
    #[serde(default)]
    pub preserve_quotes: Option<bool>,
    /// Preferred line width.
    #[serde(default)]
    pub max_width: Option<usize>,
}

impl YamlFormat {
    /// Creates a format with the given indentation.
    ///
    /// # Errors
    ///
    /// Returns an error if only one of `indent` and `offset` is set, or if
    /// `indent` is below 2.
    pub fn try_new(indent: Option<usize>, offset: Option<usize>) -> Result<Self, InvariantError> {
        const DETAILS: &str = "YAML format (both indent and offset are required)";

        match (indent, offset) {
            (None, Some(_)) => return Err(InvariantError::required("indent", DETAILS)),
            (Some(_), None) => return Err(InvariantError::required("offset", DETAILS)),
            (Some(indent), Some(_)) if indent < 2 => {
                return Err(InvariantError::InvalidYamlFormat {
                    message: format!("indent must be at least 2, got {indent}"),
                });
            }
            _ => {}
        }

        Ok(Self {
            indent,
            offset,
            preserve_quotes: None,
            max_width: None,
        })
    }

    /// Sets the preferred line width.
    #[must_use]
    pub const fn with_max_width(mut self, max_width: Option<usize>) -> Self {
        self.max_width = max_width;
        self
    }

    /// Sets quote preservation.
    #[must_use]
    pub const fn with_preserve_quotes(mut self, preserve_quotes: Option<bool>) -> Self {
        self.preserve_quotes = preserve_quotes;
        self
    }

    /// Mapping indent and sequence offset, when configured.
    #[must_use]
    pub const fn indentation(&self) -> Option<(usize, usize)> {
        match (self.indent, self.offset) {
            (Some(indent), Some(offset)) => Some((indent, offset)),
            _ => None,
        }
    }

    /// Preferred line width.
    #[must_use]
    pub const fn max_width(&self) -> Option<usize> {
        self.max_width
    }

    /// Whether original quoting should be kept.
    #[must_use]
    pub const fn preserve_quotes(&self) -> Option<bool> {
        self.preserve_quotes
    }
}

impl TryFrom<YamlFormatSpec> for YamlFormat {
    type Error = InvariantError;

    fn try_from(spec: YamlFormatSpec) -> Result<Self, Self::Error> {
        Ok(Self::try_new(spec.indent, spec.offset)?
            .with_max_width(spec.max_width)
            .with_preserve_quotes(spec.preserve_quotes))
    }
}

impl From<YamlFormat> for YamlFormatSpec {
    fn from(format: YamlFormat) -> Self {
        Self {
            indent: format.indent,
            offset: format.offset,
            preserve_quotes: format.preserve_quotes,
            max_width: format.max_width,
        }
    }
}

/// Tool settings read from the project file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Descriptor formatting, if configured.
    #[serde(default)]
    pub yaml_format: Option<YamlFormat>,
    /// Warehouse identifier case.
    #[serde(default)]
    pub naming_canon: CanonKind,
}

/// Which project, profile and target a command runs against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectParams {
    /// Explicit project directory.
    pub project_dir: Option<PathBuf>,
    /// Connection profile name.
    pub profile: Option<String>,
    /// Profile target name.
    pub target: Option<String>,
}

impl ProjectParams {
    /// Sets the project directory.
    #[must_use]
    pub fn with_project_dir(mut self, project_dir: impl Into<PathBuf>) -> Self {
        self.project_dir = Some(project_dir.into());
        self
    }
}

/// Resource selection patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceParams {
    /// Include patterns; empty selects everything.
    pub select: Vec<String>,
    /// Exclude patterns.
    pub exclude: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_format_requires_both() {
        assert!(YamlFormat::try_new(None, None).is_ok());
        assert!(YamlFormat::try_new(Some(2), Some(2)).is_ok());
        assert!(matches!(
            YamlFormat::try_new(None, Some(2)),
            Err(InvariantError::PropertyRequired { property: "indent", .. })
        ));
        assert!(matches!(
            YamlFormat::try_new(Some(2), None),
            Err(InvariantError::PropertyRequired { property: "offset", .. })
        ));
    }

    #[test]
    fn test_yaml_format_minimum_indent() {
        assert!(matches!(
            YamlFormat::try_new(Some(1), Some(0)),
            Err(InvariantError::InvalidYamlFormat { .. })
        ));
    }

    #[test]
    fn test_yaml_format_deserialize() {
        let format: YamlFormat =
            serde_yaml::from_str("indent: 2\noffset: 2\nmax_width: 140\npreserve_quotes: true\n").expect("valid");
        assert_eq!(format.indentation(), Some((2, 2)));
        assert_eq!(format.max_width(), Some(140));
        assert_eq!(format.preserve_quotes(), Some(true));

        let partial: Result<YamlFormat, _> = serde_yaml::from_str("indent: 2\n");
        assert!(partial.is_err());
    }

    #[test]
    fn test_settings_defaults() {
        let settings: ProjectSettings = serde_yaml::from_str("{}").expect("valid");
        assert_eq!(settings.yaml_format, None);
        assert_eq!(settings.naming_canon, CanonKind::Upper);
    }
}
