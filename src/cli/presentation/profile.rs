//! Profile command presentation: show, chain, source.

use super::shared::render_structured;
use crate::discovery::Candidate;
use crate::profile::ProfileDocument;
use crate::schema::Profile;
use serde_json::{json, Value};
use std::path::PathBuf;

/// Resolved profile. Yaml renders as a front-matter document with the body
/// after the closing fence.
pub fn format_profile_show(profile: &Profile, format: &str) -> String {
    match format {
        "json" => {
            let out = json!({
                "name": profile.name(),
                "source": profile.source().map(|p| p.display().to_string()),
                "fields": Value::Object(profile.fields().clone()),
                "body": profile.body(),
            });
            serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
        }
        _ => {
            let fields = render_structured(profile.fields(), "yaml");
            let mut out = format!("---\n{}---\n", fields);
            if !profile.body().is_empty() {
                out.push('\n');
                out.push_str(profile.body());
            }
            out
        }
    }
}

pub fn format_chain_text(chain: &[ProfileDocument]) -> String {
    let mut output = String::from("Inheritance chain (root first):\n");
    for (position, doc) in chain.iter().enumerate() {
        output.push_str(&format!(
            "  {}. {:<24} {:<16} {}\n",
            position + 1,
            doc.name,
            doc.origin.to_string(),
            doc.path.display()
        ));
    }
    output.trim_end().to_string()
}

pub fn format_source_text(name: &str, candidate: &Candidate, overlays: &[PathBuf]) -> String {
    let mut output = format!("Profile: {}\n", name);
    output.push_str(&format!("Origin: {}\n", candidate.origin));
    output.push_str(&format!("Path: {}", candidate.path.display()));
    if overlays.len() > 1 {
        output.push_str("\n\nOverlay stack (lowest first):");
        for path in overlays {
            output.push_str(&format!("\n  - {}", path.display()));
        }
    }
    output
}
