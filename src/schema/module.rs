//! Module references and session configuration.

use super::Mapping;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A runtime module reference: identifier, optional source, optional config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub module: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ModuleSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Mapping>,
}

/// Where a module is installed from: a URI string or a structured spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModuleSource {
    Uri(String),
    Spec(Mapping),
}

impl ModuleSource {
    pub fn to_value(&self) -> Value {
        match self {
            ModuleSource::Uri(uri) => Value::String(uri.clone()),
            ModuleSource::Spec(spec) => Value::Object(spec.clone()),
        }
    }
}

impl ModuleConfig {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            source: None,
            config: None,
        }
    }

    /// Non-empty config, if any.
    pub fn non_empty_config(&self) -> Option<&Mapping> {
        self.config.as_ref().filter(|c| !c.is_empty())
    }

    /// `{module, source?, config?}` as emitted into a Mount Plan.
    pub fn to_mapping(&self) -> Mapping {
        let mut out = Mapping::new();
        out.insert("module".to_string(), Value::String(self.module.clone()));
        if let Some(source) = &self.source {
            out.insert("source".to_string(), source.to_value());
        }
        if let Some(config) = &self.config {
            out.insert("config".to_string(), Value::Object(config.clone()));
        }
        out
    }
}

/// Session block of a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub orchestrator: ModuleConfig,
    pub context: ModuleConfig,

    /// Additional scalar settings such as `max_tokens`.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}
