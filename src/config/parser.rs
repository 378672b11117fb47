//! Project discovery and settings parsing.
//!
//! This module locates the dbt project directory, loads an optional `.env`
//! file from it and reads the tool settings from `dbt_project.yml`.

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::canon::CanonKind;
use crate::error::{ConfigError, Result, SyncError};

use super::spec::{ProjectParams, ProjectSettings, YamlFormat};

/// Project file name.
pub const PROJECT_FILE: &str = "dbt_project.yml";

/// Environment variable naming the project directory.
pub const PROJECT_DIR_ENV: &str = "DBT_PROJECT_DIR";

/// Key under `vars` holding the tool settings.
pub const SETTINGS_VAR: &str = "dbt-yaml-sync";

/// Top-level `dbt_project.yml` fields the tool reads.
#[derive(Debug, Default, Deserialize)]
struct ProjectFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    vars: Mapping,
}

/// Parser for project location and settings.
#[derive(Debug, Default)]
pub struct ProjectParser {
    /// Fallback directory when neither flag nor environment names one.
    base_path: Option<PathBuf>,
}

impl ProjectParser {
    /// Creates a new project parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the fallback directory used instead of the current directory.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Finds the project directory.
    ///
    /// The explicit `project_dir` wins, then `DBT_PROJECT_DIR`, then the
    /// base path or the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen directory has no `dbt_project.yml`.
    pub fn locate_project_dir(&self, params: &ProjectParams) -> Result<PathBuf> {
        let fallback = match &self.base_path {
            Some(path) => path.clone(),
            None => std::env::current_dir()?,
        };
        let env_dir = std::env::var(PROJECT_DIR_ENV).ok().filter(|d| !d.is_empty());

        let project_dir = resolve_project_dir(params.project_dir.as_deref(), env_dir.as_deref(), fallback);
        let project_file = project_dir.join(PROJECT_FILE);
        if !project_file.exists() {
            return Err(ConfigError::FileNotFound { path: project_file }.into());
        }

        debug!("Using project directory: {}", project_dir.display());
        Ok(project_dir)
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self, project_dir: Option<&Path>) -> Result<()> {
        let env_path = project_dir
            .or(self.base_path.as_deref())
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                SyncError::Config(ConfigError::parse(
                    format!("Failed to load .env file: {e}"),
                    env_path.display().to_string(),
                ))
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }

    /// Reads the tool settings of the project in `project_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the project file is missing or malformed.
    pub fn load_settings(&self, project_dir: &Path) -> Result<ProjectSettings> {
        let path = project_dir.join(PROJECT_FILE);
        info!("Loading project settings from: {}", path.display());

        if !path.exists() {
            return Err(ConfigError::FileNotFound { path }.into());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            SyncError::Config(ConfigError::parse(
                format!("Failed to read file: {e}"),
                path.display().to_string(),
            ))
        })?;

        self.parse_settings(&content, Some(&path))
    }

    /// Parses tool settings from the text of a project file.
    ///
    /// A `yaml_format` key takes precedence over the older `yaml` key; an
    /// explicit `null` disables formatting.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or a setting has the wrong shape.
    pub fn parse_settings(&self, content: &str, source: Option<&Path>) -> Result<ProjectSettings> {
        let location = source.map(|p| p.display().to_string());
        let parse_error = |message: String| {
            SyncError::Config(ConfigError::ParseError {
                message,
                location: location.clone(),
            })
        };

        let project: ProjectFile =
            serde_yaml::from_str(content).map_err(|e| parse_error(format!("YAML parse error: {e}")))?;

        let Some(vars) = project.vars.get(SETTINGS_VAR) else {
            debug!("No {SETTINGS_VAR} settings, using defaults");
            return Ok(ProjectSettings::default());
        };
        let vars = match vars {
            Value::Mapping(vars) => vars,
            Value::Null => return Ok(ProjectSettings::default()),
            _ => return Err(parse_error(format!("vars.{SETTINGS_VAR} must be a mapping"))),
        };

        let yaml_format = match vars.get("yaml_format").or_else(|| vars.get("yaml")) {
            Some(value) => serde_yaml::from_value::<Option<YamlFormat>>(value.clone())
                .map_err(|e| parse_error(format!("Invalid yaml_format: {e}")))?,
            None => None,
        };

        let naming_canon = match vars.get("naming_canon") {
            Some(Value::Null) | None => CanonKind::default(),
            Some(value) => serde_yaml::from_value::<CanonKind>(value.clone())
                .map_err(|e| parse_error(format!("Invalid naming_canon: {e}")))?,
        };

        debug!(
            "Parsed settings for project {}: naming canon {naming_canon}",
            project.name.as_deref().unwrap_or("<unnamed>")
        );

        Ok(ProjectSettings {
            yaml_format,
            naming_canon,
        })
    }
}

fn resolve_project_dir(explicit: Option<&Path>, env_dir: Option<&str>, fallback: PathBuf) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| env_dir.map(PathBuf::from))
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(content: &str) -> Result<ProjectSettings> {
        ProjectParser::new().parse_settings(content, None)
    }

    #[test]
    fn test_parse_without_settings() {
        let settings = parse("name: my_project\nversion: '1.0'\n").expect("valid");
        assert_eq!(settings, ProjectSettings::default());
    }

    #[test]
    fn test_parse_full_settings() {
        let yaml = r"
name: my_project
vars:
  dbt-yaml-sync:
    naming_canon: lower
    yaml_format:
      indent: 4
      offset: 2
      max_width: 120
";
        let settings = parse(yaml).expect("valid");
        let format = settings.yaml_format.expect("format set");
        assert_eq!(format.indentation(), Some((4, 2)));
        assert_eq!(format.max_width(), Some(120));
        assert_eq!(settings.naming_canon, CanonKind::Lower);
    }

    #[test]
    fn test_parse_legacy_yaml_key() {
        let yaml = "vars:\n  dbt-yaml-sync:\n    yaml:\n      indent: 2\n      offset: 2\n";
        let settings = parse(yaml).expect("valid");
        assert_eq!(settings.yaml_format.and_then(|f| f.indentation()), Some((2, 2)));
    }

    #[test]
    fn test_parse_null_format() {
        let yaml = "vars:\n  dbt-yaml-sync:\n    yaml_format: null\n    yaml:\n      indent: 2\n      offset: 2\n";
        let settings = parse(yaml).expect("valid");
        assert_eq!(settings.yaml_format, None);
    }

    #[test]
    fn test_parse_incomplete_format() {
        let yaml = "vars:\n  dbt-yaml-sync:\n    yaml_format:\n      indent: 2\n";
        assert!(matches!(
            parse(yaml),
            Err(SyncError::Config(ConfigError::ParseError { .. }))
        ));
    }

    #[test]
    fn test_parse_unknown_canon() {
        let yaml = "vars:\n  dbt-yaml-sync:\n    naming_canon: title\n";
        assert!(parse(yaml).is_err());
    }

    #[test]
    fn test_resolve_project_dir_precedence() {
        let fallback = PathBuf::from("cwd");

        assert_eq!(
            resolve_project_dir(Some(Path::new("flag")), Some("env"), fallback.clone()),
            PathBuf::from("flag")
        );
        assert_eq!(
            resolve_project_dir(None, Some("env"), fallback.clone()),
            PathBuf::from("env")
        );
        assert_eq!(resolve_project_dir(None, None, fallback.clone()), fallback);
    }

    #[test]
    fn test_locate_and_load() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(
            temp.path().join(PROJECT_FILE),
            "name: my_project\nvars:\n  dbt-yaml-sync:\n    naming_canon: lower\n",
        )
        .expect("write fixture");

        let parser = ProjectParser::new();
        let params = ProjectParams::default().with_project_dir(temp.path());
        let project_dir = parser.locate_project_dir(&params).expect("located");
        let settings = parser.load_settings(&project_dir).expect("loaded");

        assert_eq!(settings.naming_canon, CanonKind::Lower);
    }

    #[test]
    fn test_locate_missing_project_file() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let params = ProjectParams::default().with_project_dir(temp.path());

        let result = ProjectParser::new().locate_project_dir(&params);

        assert!(matches!(
            result,
            Err(SyncError::Config(ConfigError::FileNotFound { .. }))
        ));
    }
}
