//! Agents: named sub-session configurations. Agents never inherit.

use super::module::ModuleConfig;
use super::validation::check_agent;
use super::{Mapping, MODULE_LISTS};
use crate::discovery::EntityKind;
use crate::error::ResolveError;
use crate::merge::prune_nulls;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Identity of an agent, stored under the `meta` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMetadata {
    pub name: String,
    pub description: String,
}

/// A validated agent.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    metadata: AgentMetadata,
    providers: Vec<ModuleConfig>,
    tools: Vec<ModuleConfig>,
    hooks: Vec<ModuleConfig>,
    session: Option<Mapping>,
    instruction: Option<String>,
    body: String,
    source: Option<PathBuf>,
}

impl Agent {
    /// Build an agent from document metadata and its (expanded) body.
    ///
    /// Legacy documents with top-level `name`/`description` are accepted.
    /// A missing name falls back to `name`, the reference it was loaded by;
    /// a missing description to `"Agent: <name>"`. Without
    /// `system.instruction` a non-empty body becomes the instruction.
    pub fn from_mapping(
        name: &str,
        fields: Mapping,
        body: impl Into<String>,
        source: Option<PathBuf>,
    ) -> Result<Self, ResolveError> {
        let body = body.into();
        let fields = normalize(name, fields);
        let location = match &source {
            Some(path) => path.display().to_string(),
            None => format!("inline agent '{}'", name),
        };

        let violations = check_agent(&fields);
        if !violations.is_empty() {
            return Err(ResolveError::Validation {
                kind: EntityKind::Agent,
                location,
                violations,
            });
        }

        let invalid = |key: &str, e: serde_json::Error| ResolveError::Validation {
            kind: EntityKind::Agent,
            location: location.clone(),
            violations: vec![super::Violation::new(key, e.to_string())],
        };

        let metadata: AgentMetadata = serde_json::from_value(fields.get("meta").cloned().unwrap_or(Value::Null))
            .map_err(|e| invalid("meta", e))?;

        let mut lists: [Vec<ModuleConfig>; 3] = Default::default();
        for (slot, key) in lists.iter_mut().zip(MODULE_LISTS) {
            if let Some(value) = fields.get(key) {
                *slot = serde_json::from_value(value.clone()).map_err(|e| invalid(key, e))?;
            }
        }
        let [providers, tools, hooks] = lists;

        let session = fields.get("session").and_then(Value::as_object).cloned();
        let instruction = fields
            .get("system")
            .and_then(|s| s.get("instruction"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| (!body.trim().is_empty()).then(|| body.clone()));

        Ok(Self {
            metadata,
            providers,
            tools,
            hooks,
            session,
            instruction,
            body,
            source,
        })
    }

    /// Build an agent from an inline profile entry; no file is involved.
    pub fn from_inline(name: &str, fields: &Mapping) -> Result<Self, ResolveError> {
        Self::from_mapping(name, fields.clone(), String::new(), None)
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn metadata(&self) -> &AgentMetadata {
        &self.metadata
    }

    pub fn providers(&self) -> &[ModuleConfig] {
        &self.providers
    }

    pub fn tools(&self) -> &[ModuleConfig] {
        &self.tools
    }

    pub fn hooks(&self) -> &[ModuleConfig] {
        &self.hooks
    }

    pub fn session(&self) -> Option<&Mapping> {
        self.session.as_ref()
    }

    pub fn instruction(&self) -> Option<&str> {
        self.instruction.as_deref()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// `{description, providers, tools, hooks, session?, system?}` for the
    /// `agents` section of a Mount Plan.
    pub fn to_mount_plan_fragment(&self) -> Mapping {
        let mut out = Mapping::new();
        out.insert(
            "description".to_string(),
            Value::String(self.metadata.description.clone()),
        );
        for (key, modules) in MODULE_LISTS.iter().zip([&self.providers, &self.tools, &self.hooks]) {
            let items = modules
                .iter()
                .map(|m| Value::Object(m.to_mapping()))
                .collect();
            out.insert(key.to_string(), Value::Array(items));
        }
        if let Some(session) = &self.session {
            out.insert("session".to_string(), Value::Object(session.clone()));
        }
        if let Some(instruction) = &self.instruction {
            let mut system = Mapping::new();
            system.insert("instruction".to_string(), Value::String(instruction.clone()));
            out.insert("system".to_string(), Value::Object(system));
        }
        out
    }
}

/// Fold legacy top-level identity keys into `meta` and fill defaults.
fn normalize(name: &str, fields: Mapping) -> Mapping {
    let mut fields = match prune_nulls(Value::Object(fields)) {
        Value::Object(map) => map,
        _ => Mapping::new(),
    };

    let legacy_name = fields.remove("name");
    let legacy_description = fields.remove("description");

    let mut meta = match fields.remove("meta") {
        Some(Value::Object(meta)) => meta,
        Some(other) => {
            // Leave malformed meta for validation to report.
            fields.insert("meta".to_string(), other);
            return fields;
        }
        None => Mapping::new(),
    };

    if !meta.contains_key("name") {
        let resolved = match legacy_name {
            Some(Value::String(legacy)) if !legacy.trim().is_empty() => legacy,
            _ => name.to_string(),
        };
        meta.insert("name".to_string(), Value::String(resolved));
    }
    if !meta.contains_key("description") {
        let description = match legacy_description {
            Some(Value::String(legacy)) => legacy,
            _ => {
                let agent_name = meta.get("name").and_then(Value::as_str).unwrap_or(name);
                format!("Agent: {}", agent_name)
            }
        };
        meta.insert("description".to_string(), Value::String(description));
    }

    fields.insert("meta".to_string(), Value::Object(meta));
    fields
}
