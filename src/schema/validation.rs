//! Schema checks over untyped document metadata.
//!
//! Checks collect every violation instead of stopping at the first one.
//! `null` values are accepted wherever a field is optional: they mark keys
//! removed during merging.

use super::{Mapping, MODULE_LISTS};
use crate::document::value_kind;
use serde_json::Value;
use std::fmt;

const PROFILE_REQUIRED: [&str; 3] = ["name", "version", "description"];
const SESSION_MODULES: [&str; 2] = ["orchestrator", "context"];

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path of the offending field, e.g. `providers[0].module`.
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Shape check for a single profile document, which may be partial.
pub fn check_profile_document(fields: &Mapping) -> Vec<Violation> {
    let mut out = Vec::new();
    check_profile_shape(fields, &mut out);
    out
}

/// Full check for a resolved profile.
pub fn check_profile(fields: &Mapping) -> Vec<Violation> {
    let mut out = Vec::new();
    check_profile_shape(fields, &mut out);

    match present(fields, "profile") {
        None => out.push(Violation::new("profile", "required")),
        Some(Value::Object(meta)) => {
            for key in PROFILE_REQUIRED {
                if present(meta, key).is_none() {
                    out.push(Violation::new(format!("profile.{}", key), "required"));
                }
            }
        }
        Some(_) => {}
    }

    match present(fields, "session") {
        None => out.push(Violation::new("session", "required")),
        Some(Value::Object(session)) => {
            for key in SESSION_MODULES {
                if present(session, key).is_none() {
                    out.push(Violation::new(format!("session.{}", key), "required"));
                }
            }
        }
        Some(_) => {}
    }
    out
}

/// Check for an agent document after legacy keys have been normalized.
pub fn check_agent(fields: &Mapping) -> Vec<Violation> {
    let mut out = Vec::new();

    match present(fields, "meta") {
        Some(Value::Object(meta)) => {
            non_empty_string(meta.get("name"), "meta.name", true, &mut out);
            string(meta.get("description"), "meta.description", &mut out);
        }
        Some(other) => out.push(expected("meta", "a mapping", other)),
        None => out.push(Violation::new("meta", "required")),
    }

    module_lists(fields, &mut out);

    if let Some(session) = present(fields, "session") {
        if !session.is_object() {
            out.push(expected("session", "a mapping", session));
        }
    }

    match present(fields, "system") {
        Some(Value::Object(system)) => string(system.get("instruction"), "system.instruction", &mut out),
        Some(other) => out.push(expected("system", "a mapping", other)),
        None => {}
    }
    out
}

fn check_profile_shape(fields: &Mapping, out: &mut Vec<Violation>) {
    match present(fields, "profile") {
        Some(Value::Object(meta)) => {
            non_empty_string(meta.get("name"), "profile.name", false, out);
            string(meta.get("version"), "profile.version", out);
            string(meta.get("description"), "profile.description", out);
            non_empty_string(meta.get("extends"), "profile.extends", false, out);
            if let Some(model) = present(meta, "model") {
                match model {
                    Value::String(model) if !is_model_pair(model) => out.push(Violation::new(
                        "profile.model",
                        format!("'{}' must be in the form 'provider/model'", model),
                    )),
                    Value::String(_) => {}
                    other => out.push(expected("profile.model", "a string", other)),
                }
            }
        }
        Some(other) => out.push(expected("profile", "a mapping", other)),
        None => {}
    }

    match present(fields, "session") {
        Some(Value::Object(session)) => {
            for (key, value) in session {
                let field = format!("session.{}", key);
                if SESSION_MODULES.contains(&key.as_str()) {
                    if !value.is_null() {
                        module_config(value, &field, out);
                    }
                } else if value.is_array() || value.is_object() {
                    out.push(expected(&field, "a scalar", value));
                }
            }
        }
        Some(other) => out.push(expected("session", "a mapping", other)),
        None => {}
    }

    module_lists(fields, out);

    match present(fields, "agents") {
        Some(Value::Object(agents)) => {
            string_list(agents.get("dirs"), "agents.dirs", out);
            string_list(agents.get("include"), "agents.include", out);
            match agents.get("inline") {
                Some(Value::Object(inline)) => {
                    for (name, entry) in inline {
                        if !entry.is_object() && !entry.is_null() {
                            out.push(expected(&format!("agents.inline.{}", name), "a mapping", entry));
                        }
                    }
                }
                Some(Value::Null) | None => {}
                Some(other) => out.push(expected("agents.inline", "a mapping", other)),
            }
        }
        Some(other) => out.push(expected("agents", "a mapping", other)),
        None => {}
    }
}

fn module_lists(fields: &Mapping, out: &mut Vec<Violation>) {
    for key in MODULE_LISTS {
        match present(fields, key) {
            Some(Value::Array(items)) => {
                for (index, item) in items.iter().enumerate() {
                    module_config(item, &format!("{}[{}]", key, index), out);
                }
            }
            Some(other) => out.push(expected(key, "a list", other)),
            None => {}
        }
    }
}

fn module_config(value: &Value, field: &str, out: &mut Vec<Violation>) {
    let Value::Object(module) = value else {
        out.push(expected(field, "a module mapping", value));
        return;
    };
    non_empty_string(module.get("module"), &format!("{}.module", field), true, out);
    match module.get("source") {
        None | Some(Value::Null) | Some(Value::String(_)) | Some(Value::Object(_)) => {}
        Some(other) => out.push(expected(
            &format!("{}.source", field),
            "a string or mapping",
            other,
        )),
    }
    match module.get("config") {
        None | Some(Value::Null) | Some(Value::Object(_)) => {}
        Some(other) => out.push(expected(&format!("{}.config", field), "a mapping", other)),
    }
}

fn string(value: Option<&Value>, field: &str, out: &mut Vec<Violation>) {
    match value {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(other) => out.push(expected(field, "a string", other)),
    }
}

fn non_empty_string(value: Option<&Value>, field: &str, required: bool, out: &mut Vec<Violation>) {
    match value {
        Some(Value::String(s)) if s.trim().is_empty() => {
            out.push(Violation::new(field, "must not be empty"))
        }
        Some(Value::String(_)) => {}
        None | Some(Value::Null) if required => out.push(Violation::new(field, "required")),
        None | Some(Value::Null) => {}
        Some(other) => out.push(expected(field, "a string", other)),
    }
}

fn string_list(value: Option<&Value>, field: &str, out: &mut Vec<Violation>) {
    match value {
        None | Some(Value::Null) => {}
        Some(Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                if !item.is_string() {
                    out.push(expected(&format!("{}[{}]", field, index), "a string", item));
                }
            }
        }
        Some(other) => out.push(expected(field, "a list of strings", other)),
    }
}

/// Value of `key`, treating `null` as absent.
fn present<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

fn expected(field: &str, what: &str, found: &Value) -> Violation {
    Violation::new(field, format!("expected {}, found {}", what, value_kind(found)))
}

/// `provider/model` with both halves non-empty.
pub fn is_model_pair(model: &str) -> bool {
    match model.split_once('/') {
        Some((provider, name)) => !provider.trim().is_empty() && !name.trim().is_empty(),
        None => false,
    }
}
