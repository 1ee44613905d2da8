//! Resolved profile.

use super::module::{ModuleConfig, SessionConfig};
use super::validation::{check_profile, Violation};
use super::{Mapping, MODULE_LISTS};
use crate::discovery::EntityKind;
use crate::error::ResolveError;
use crate::merge::prune_nulls;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Identity of a profile, stored under the `profile` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    pub name: String,
    pub version: String,
    pub description: String,

    /// `provider/model`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Parent reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
}

/// Agents block of a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentsSpec {
    #[serde(default)]
    pub dirs: Vec<String>,

    #[serde(default)]
    pub include: Vec<String>,

    /// Agent name to partial agent fields.
    #[serde(default)]
    pub inline: BTreeMap<String, Mapping>,
}

/// A fully validated profile: one document, or the merge of an
/// inheritance chain and its overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    metadata: ProfileMetadata,
    session: SessionConfig,
    providers: Vec<ModuleConfig>,
    tools: Vec<ModuleConfig>,
    hooks: Vec<ModuleConfig>,
    agents: Option<AgentsSpec>,
    body: String,
    source: Option<PathBuf>,
    fields: Mapping,
}

impl Profile {
    /// Validate `fields` against the full profile schema and build the
    /// profile. `null` entries are dropped first.
    pub fn from_mapping(
        fields: Mapping,
        body: impl Into<String>,
        source: Option<PathBuf>,
    ) -> Result<Self, ResolveError> {
        let fields = match prune_nulls(Value::Object(fields)) {
            Value::Object(map) => map,
            _ => Mapping::new(),
        };

        let location = describe_location(&fields, source.as_deref());
        let invalid = |violations: Vec<Violation>| ResolveError::Validation {
            kind: EntityKind::Profile,
            location: location.clone(),
            violations,
        };

        let violations = check_profile(&fields);
        if !violations.is_empty() {
            return Err(invalid(violations));
        }

        let metadata = typed(&fields, "profile").map_err(|v| invalid(vec![v]))?;
        let session = typed(&fields, "session").map_err(|v| invalid(vec![v]))?;
        let [providers, tools, hooks] = MODULE_LISTS.map(|key| typed_or_default(&fields, key));
        let agents = match fields.get("agents") {
            Some(_) => Some(typed(&fields, "agents").map_err(|v| invalid(vec![v]))?),
            None => None,
        };

        Ok(Self {
            metadata,
            session,
            providers: providers.map_err(|v| invalid(vec![v]))?,
            tools: tools.map_err(|v| invalid(vec![v]))?,
            hooks: hooks.map_err(|v| invalid(vec![v]))?,
            agents,
            body: body.into(),
            source,
            fields,
        })
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn metadata(&self) -> &ProfileMetadata {
        &self.metadata
    }

    pub fn session(&self) -> &SessionConfig {
        &self.session
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

    pub fn agents(&self) -> Option<&AgentsSpec> {
        self.agents.as_ref()
    }

    /// Body of this profile's own document. Never inherited.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Highest-precedence file this profile was loaded from.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Directory of [`Profile::source`].
    pub fn base_dir(&self) -> Option<&Path> {
        self.source.as_deref().and_then(Path::parent)
    }

    /// The validated metadata mapping, as authored or merged.
    pub fn fields(&self) -> &Mapping {
        &self.fields
    }
}

fn typed<T: DeserializeOwned>(fields: &Mapping, key: &str) -> Result<T, Violation> {
    let value = fields.get(key).cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|e| Violation::new(key, e.to_string()))
}

fn typed_or_default<T: DeserializeOwned + Default>(fields: &Mapping, key: &str) -> Result<T, Violation> {
    match fields.get(key) {
        Some(_) => typed(fields, key),
        None => Ok(T::default()),
    }
}

fn describe_location(fields: &Mapping, source: Option<&Path>) -> String {
    match source {
        Some(path) => path.display().to_string(),
        None => {
            let name = fields
                .get("profile")
                .and_then(|p| p.get("name"))
                .and_then(Value::as_str)
                .unwrap_or("<unnamed>");
            format!("'{}'", name)
        }
    }
}
