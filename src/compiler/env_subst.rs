//! `${NAME}` substitution over every string in a value tree.

use crate::env::EnvLookup;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

static VARIABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("variable regex should be valid")
});

/// Replace every `${NAME}` token in `text`; unset variables become empty.
/// Substituted values are not scanned again.
pub fn substitute_str(text: &str, env: &EnvLookup) -> String {
    if !text.contains("${") {
        return text.to_string();
    }
    VARIABLE
        .replace_all(text, |caps: &Captures<'_>| env(&caps[1]).unwrap_or_default())
        .into_owned()
}

/// Substitute in every string value of `value`. Mapping keys are left alone.
pub fn substitute_value(value: Value, env: &EnvLookup) -> Value {
    match value {
        Value::String(s) => Value::String(substitute_str(&s, env)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| substitute_value(item, env))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, substitute_value(v, env)))
                .collect(),
        ),
        other => other,
    }
}
