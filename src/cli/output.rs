use serde::Serialize;

use super::OutputFormat;
use crate::model::{ResolvedLink, Selection};

/// The result of resolving one directive during a `links` scan.
#[derive(Debug, Clone, Serialize)]
pub struct LinkReport {
    /// Workspace-relative path of the scanning document.
    pub file: String,
    pub line: u32,
    pub name: String,
    pub target: Option<String>,
}

/// The selection together with the folders it searches.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionReport<'a> {
    #[serde(flatten)]
    pub selection: &'a Selection,
    pub include_folders: &'a [String],
}

/// Format any serializable value as JSON.
pub fn format_json<T: Serialize>(value: &T, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Compact => serde_json::to_string(value).unwrap_or_default(),
        OutputFormat::Json | OutputFormat::Text => {
            serde_json::to_string_pretty(value).unwrap_or_default()
        }
    }
}

/// Format the outcome of a single resolution.
pub fn format_resolved(resolved: Option<&ResolvedLink>, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Text => match resolved {
            Some(link) => link.target.clone(),
            None => "not found".to_string(),
        },
        _ => format_json(&resolved, format),
    }
}

/// Format the selected game, shader config and include folders.
pub fn format_selection(report: &SelectionReport<'_>, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = format!(
                "game:          {}\nshader config: {}\nmatched by:    {}\ninclude folders:\n",
                report.selection.game,
                report.selection.shader_config,
                report.selection.matched_by.unwrap_or("default"),
            );
            for folder in report.include_folders {
                output.push_str(&format!("  {}\n", folder));
            }
            output
        }
        _ => format_json(report, format),
    }
}

/// Format the results of a `links` scan.
pub fn format_link_reports(reports: &[LinkReport], format: &OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            for r in reports {
                let location = format!("{}:{}", r.file, r.line + 1);
                output.push_str(&format!(
                    "{:<40} {:<32} -> {}\n",
                    location,
                    r.name,
                    r.target.as_deref().unwrap_or("(not found)"),
                ));
            }
            let unresolved = reports.iter().filter(|r| r.target.is_none()).count();
            output.push_str(&format!(
                "\n{} includes, {} unresolved",
                reports.len(),
                unresolved
            ));
            output
        }
        _ => format_json(&reports, format),
    }
}
