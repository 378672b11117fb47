//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;
use tabled::{Table, Tabled};

use crate::plan::{Action, ExecutionMode, ExecutionReport, Plan};
use crate::reconciler::{Command, ReconciliationResult};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Plan action row for table display.
#[derive(Tabled)]
struct PlanActionRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "File")]
    file: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a plan for display.
    #[must_use]
    pub fn format_plan(&self, plan: &Plan) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&PlanJson::from(plan)).unwrap_or_default(),
            OutputFormat::Text => Self::format_plan_text(plan),
        }
    }

    /// Formats a plan as text.
    fn format_plan_text(plan: &Plan) -> String {
        if plan.is_empty() {
            return format!("{} Nothing to do - descriptors are up to date.\n", "✓".green());
        }

        let mut output = String::new();
        let _ = write!(output, "\nPlan ({} actions)\n\n", plan.len());

        let rows: Vec<PlanActionRow> = plan
            .actions()
            .iter()
            .enumerate()
            .map(|(i, a)| PlanActionRow {
                index: i + 1,
                action: Self::format_action_kind(a),
                resource: a.resource_name().unwrap_or_default(),
                file: Self::truncate(&Self::files_of(a), 60),
            })
            .collect();

        output.push_str(&Table::new(rows).to_string());
        output.push('\n');

        let _ = writeln!(output);
        for line in plan.describe() {
            let _ = writeln!(output, "   - {line}");
        }

        output
    }

    /// Formats a reconciliation result.
    #[must_use]
    pub fn format_result(&self, result: &ReconciliationResult) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&ResultJson::from(result)).unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = Self::format_plan_text(&result.plan);
                if !result.plan.is_empty() {
                    output.push('\n');
                    output.push_str(&Self::format_report_text(&result.report));
                }
                output
            }
        }
    }

    /// Formats an execution report as text.
    fn format_report_text(report: &ExecutionReport) -> String {
        let status = match report.mode {
            ExecutionMode::DryRun => format!("{} Dry run", "⚠".yellow()),
            ExecutionMode::Run => format!("{} Done", "✓".green()),
        };

        let mut output = format!("{status}: {report}\n");
        for path in &report.changed_files {
            let _ = writeln!(output, "   {} {}", "~".yellow(), path.display());
        }
        for path in &report.deleted_files {
            let _ = writeln!(output, "   {} {}", "-".red(), path.display());
        }
        output
    }

    /// Formats an action kind with color.
    fn format_action_kind(action: &Action) -> String {
        let kind = action.kind();
        match action {
            Action::BootstrapResource(_) | Action::AddResourceColumn(_) => kind.green().to_string(),
            Action::RelocateResource(_) | Action::UpdateResourceColumn(_) | Action::ReorderResourceColumns(_) => {
                kind.yellow().to_string()
            }
            Action::DeleteEmptyDescriptor(_) | Action::DeleteResourceColumn(_) => kind.red().to_string(),
        }
    }

    fn files_of(action: &Action) -> String {
        action
            .affected_files()
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Truncates a string to a maximum number of characters.
    fn truncate(s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else {
            let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
            format!("{kept}...")
        }
    }

    /// Formats an error message.
    #[must_use]
    pub fn format_error(&self, message: &str) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({ "status": "error", "message": message });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => format!("{} {message}", "✗".red()),
        }
    }
}

// JSON serialization helpers

#[derive(Serialize)]
struct PlanJson {
    created_at: String,
    action_count: usize,
    files: Vec<String>,
    actions: Vec<ActionJson>,
}

#[derive(Serialize)]
struct ActionJson {
    kind: &'static str,
    resource: Option<String>,
    files: Vec<String>,
    description: String,
}

#[derive(Serialize)]
struct ResultJson<'a> {
    command: Command,
    plan: PlanJson,
    report: &'a ExecutionReport,
}

fn path_strings<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Vec<String> {
    paths.into_iter().map(|p| p.display().to_string()).collect()
}

impl From<&Action> for ActionJson {
    fn from(action: &Action) -> Self {
        let files = action.affected_files();
        Self {
            kind: action.kind(),
            resource: action.resource_name(),
            files: path_strings(files.iter().map(|p| p.as_path())),
            description: action.describe(),
        }
    }
}

impl From<&Plan> for PlanJson {
    fn from(plan: &Plan) -> Self {
        let files = plan.affected_files();
        Self {
            created_at: plan.created_at.to_rfc3339(),
            action_count: plan.len(),
            files: path_strings(files.iter().map(|p| p.as_path())),
            actions: plan.actions().iter().map(ActionJson::from).collect(),
        }
    }
}

impl<'a> From<&'a ReconciliationResult> for ResultJson<'a> {
    fn from(result: &'a ReconciliationResult) -> Self {
        Self {
            command: result.command,
            plan: PlanJson::from(&result.plan),
            report: &result.report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResourceType;
    use crate::plan::{BootstrapResource, DeleteEmptyDescriptor, RelocateResource};
    use std::path::PathBuf;

    fn plan() -> Plan {
        Plan::new(vec![
            RelocateResource::new(ResourceType::Model, "customers", "models/_schema.yml", "models/_customers.yml")
                .into(),
            DeleteEmptyDescriptor::new("models/_schema.yml").into(),
        ])
    }

    fn result(plan: Plan, mode: ExecutionMode) -> ReconciliationResult {
        ReconciliationResult {
            command: Command::Relocate,
            actions: plan.describe(),
            report: ExecutionReport {
                mode,
                actions_applied: plan.len(),
                affected_files: 2,
                changed_files: vec![PathBuf::from("models/_customers.yml")],
                deleted_files: vec![PathBuf::from("models/_schema.yml")],
                persisted: mode == ExecutionMode::Run,
            },
            plan,
        }
    }

    #[test]
    fn test_text_empty_plan() {
        let output = OutputFormatter::new(OutputFormat::Text).format_plan(&Plan::empty());
        assert!(output.contains("Nothing to do"));
    }

    #[test]
    fn test_text_plan_table() {
        let output = OutputFormatter::new(OutputFormat::Text).format_plan(&plan());

        assert!(output.contains("Plan (2 actions)"));
        assert!(output.contains("relocate"));
        assert!(output.contains("delete-descriptor"));
        assert!(output.contains("Move model 'customers' from models/_schema.yml to models/_customers.yml"));
    }

    #[test]
    fn test_text_result_report() {
        let output = OutputFormatter::new(OutputFormat::Text).format_result(&result(plan(), ExecutionMode::DryRun));

        assert!(output.contains("Dry run"));
        assert!(output.contains("nothing saved"));
        assert!(output.contains("models/_customers.yml"));
    }

    #[test]
    fn test_json_result() {
        let output = OutputFormatter::new(OutputFormat::Json).format_result(&result(plan(), ExecutionMode::Run));
        let json: serde_json::Value = serde_json::from_str(&output).expect("valid json");

        assert_eq!(json["command"], "relocate");
        assert_eq!(json["plan"]["action_count"], 2);
        assert_eq!(json["plan"]["actions"][0]["kind"], "relocate");
        assert_eq!(json["plan"]["actions"][1]["resource"], serde_json::Value::Null);
        assert_eq!(json["report"]["mode"], "run");
        assert_eq!(json["report"]["persisted"], true);
    }

    #[test]
    fn test_json_bootstrap_plan() {
        let plan = Plan::new(vec![
            BootstrapResource::new(ResourceType::Seed, "countries", "seeds/_countries.yml")
                .expect("valid")
                .into(),
        ]);
        let output = OutputFormatter::new(OutputFormat::Json).format_plan(&plan);
        let json: serde_json::Value = serde_json::from_str(&output).expect("valid json");

        assert_eq!(json["files"][0], "seeds/_countries.yml");
        assert_eq!(json["actions"][0]["resource"], "countries");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(OutputFormatter::truncate("short", 10), "short");
        assert_eq!(OutputFormatter::truncate("models/staging/_schema.yml", 10), "models/...");
    }
}
