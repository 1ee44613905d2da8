//! Shared presentation: listings and structured rendering.

use crate::discovery::Candidate;
use comfy_table::Table;
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;

/// One row of a profile or agent listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    pub name: String,
    pub origin: Option<String>,
    pub path: Option<PathBuf>,
}

impl ListedEntry {
    pub fn new(name: String, source: Option<Candidate>) -> Self {
        match source {
            Some(candidate) => Self {
                name,
                origin: Some(candidate.origin.to_string()),
                path: Some(candidate.path),
            },
            None => Self {
                name,
                origin: None,
                path: None,
            },
        }
    }
}

pub fn format_entry_list_text(kind: &str, entries: &[ListedEntry]) -> String {
    if entries.is_empty() {
        return format!("No {}s found.", kind.to_lowercase());
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec![kind, "Origin", "Path"]);
    for entry in entries {
        let origin = entry.origin.as_deref().unwrap_or("-");
        let path = entry
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![entry.name.as_str(), origin, path.as_str()]);
    }
    format!("{}\n\nTotal: {} {}(s)", table, entries.len(), kind.to_lowercase())
}

pub fn format_entry_list_json(key: &str, entries: &[ListedEntry]) -> String {
    let items: Vec<_> = entries
        .iter()
        .map(|entry| {
            json!({
                "name": entry.name,
                "origin": entry.origin,
                "path": entry.path.as_ref().map(|p| p.display().to_string()),
            })
        })
        .collect();
    let out = json!({ key: items, "total": entries.len() });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}

/// Render a value as yaml, or as pretty json for any other format.
pub(super) fn render_structured<T: Serialize>(value: &T, format: &str) -> String {
    match format {
        "yaml" => serde_yaml::to_string(value).unwrap_or_else(|_| "{}".to_string()),
        _ => serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string()),
    }
}
