//! Output formatters for generated models.

use clap::ValueEnum;
use comfy_table::{Cell, Table};
use modelgen_core::{Diagnostic, GeneratedModels, ResolvedEntityModel};

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Summary table per entity
    Table,
    /// Full resolved models as JSON
    Json,
    /// One CSV row per entity
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter: Send + Sync {
    /// Format the models of one run.
    fn format_models(&self, models: &GeneratedModels) -> String;

    /// Format the diagnostics of one run.
    fn format_diagnostics(&self, diagnostics: &[Diagnostic]) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_models(&self, models: &GeneratedModels) -> String {
        if models.is_empty() {
            return "No models".to_string();
        }

        let mut table = Table::new();
        table.set_header(vec![
            "Entity",
            "Class",
            "Parent",
            "Abstract",
            "Attributes",
            "Relationships",
        ]);
        for model in models.assets.values() {
            table.add_row(entity_row(model));
        }

        format!(
            "{}\n{} enums, {} structs, {} relationships, {} entities",
            table,
            models.enums.len(),
            models.structs.len(),
            models.relationships.len(),
            models.assets.len()
        )
    }

    fn format_diagnostics(&self, diagnostics: &[Diagnostic]) -> String {
        if diagnostics.is_empty() {
            return "No diagnostics".to_string();
        }

        let mut table = Table::new();
        table.set_header(vec!["Kind", "Owner", "Subject", "Detail"]);
        for diagnostic in diagnostics {
            table.add_row(vec![
                Cell::new(diagnostic.kind),
                Cell::new(&diagnostic.owner),
                Cell::new(&diagnostic.subject),
                Cell::new(&diagnostic.detail),
            ]);
        }
        table.to_string()
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_models(&self, models: &GeneratedModels) -> String {
        models.to_json().unwrap_or_else(|_| "{}".to_string())
    }

    fn format_diagnostics(&self, diagnostics: &[Diagnostic]) -> String {
        serde_json::to_string_pretty(diagnostics).unwrap_or_else(|_| "[]".to_string())
    }
}

/// CSV formatter.
pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format_models(&self, models: &GeneratedModels) -> String {
        let mut output = String::from("entity,class,parent,abstract,attributes,relationships\n");
        for model in models.assets.values() {
            let row: Vec<String> = entity_row(model).iter().map(|v| escape_csv(v)).collect();
            output.push_str(&row.join(","));
            output.push('\n');
        }
        output
    }

    fn format_diagnostics(&self, diagnostics: &[Diagnostic]) -> String {
        let mut output = String::from("kind,owner,subject,detail\n");
        for diagnostic in diagnostics {
            output.push_str(&format!(
                "{},{},{},{}\n",
                escape_csv(&diagnostic.kind.to_string()),
                escape_csv(&diagnostic.owner),
                escape_csv(&diagnostic.subject),
                escape_csv(&diagnostic.detail)
            ));
        }
        output
    }
}

fn entity_row(model: &ResolvedEntityModel) -> Vec<String> {
    vec![
        model.original_name.clone(),
        model.class_name.clone(),
        model.parent_class_name.clone().unwrap_or_default(),
        model.is_abstract.to_string(),
        model.interface_attributes.len().to_string(),
        model.interface_relationships.len().to_string(),
    ]
}

/// Quote a CSV field if it needs quoting.
fn escape_csv(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelgen_core::{DiagnosticKind, EntityDef, GeneratorConfig, ModelGenerator, TypeDefSnapshot};

    fn models() -> GeneratedModels {
        let snapshot = TypeDefSnapshot::new()
            .with_entity(EntityDef::new("Referenceable"))
            .with_entity(
                EntityDef::new("Asset")
                    .with_super_type("Referenceable")
                    .with_sub_type("Table"),
            )
            .with_entity(EntityDef::new("Table").with_super_type("Asset"));
        ModelGenerator::new(GeneratorConfig::default()).generate(&snapshot)
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("hello"), "hello");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_table_summary() {
        let output = TableFormatter.format_models(&models());
        assert!(output.contains("Table"));
        assert!(output.contains("0 enums, 0 structs, 0 relationships, 3 entities"));
        assert_eq!(TableFormatter.format_models(&GeneratedModels::default()), "No models");
    }

    #[test]
    fn test_csv_rows() {
        let output = CsvFormatter.format_models(&models());
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "Asset,Asset,Reference,true,0,0");
        assert_eq!(lines[3], "Table,Table,Asset,false,0,0");
    }

    #[test]
    fn test_json_round_trips_as_value() {
        let output = JsonFormatter.format_models(&models());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["assets"]["Asset"]["is_abstract"], true);
    }

    #[test]
    fn test_diagnostics_formats() {
        let diagnostics = vec![Diagnostic {
            kind: DiagnosticKind::Conflict,
            owner: "Table".into(),
            subject: "shared".into(),
            detail: "kept SQL.shared:string, discarded Dbt.shared:long".into(),
        }];

        let csv = CsvFormatter.format_diagnostics(&diagnostics);
        assert!(csv.contains("conflict,Table,shared,\"kept SQL.shared:string, discarded Dbt.shared:long\""));
        assert!(TableFormatter.format_diagnostics(&diagnostics).contains("shared"));
        assert_eq!(TableFormatter.format_diagnostics(&[]), "No diagnostics");
    }
}
