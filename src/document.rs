//! Document splitting: YAML front matter plus Markdown body.

use crate::error::ResolveError;
use crate::mention::ContentExpander;
use crate::schema::Mapping;
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

const DELIMITER: &str = "---";

/// Splitting failures.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("invalid YAML front matter: {0}")]
    Yaml(String),

    #[error("front matter must be a mapping, found {0}")]
    NotAMapping(&'static str),
}

/// Splits a document into structured metadata and a body.
pub trait DocumentSplitter: Send + Sync {
    /// A document without a metadata block yields an empty mapping and the
    /// full text as body.
    fn split(&self, text: &str) -> Result<(Mapping, String), SplitError>;
}

/// `---` delimited YAML front matter.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrontmatterSplitter;

impl DocumentSplitter for FrontmatterSplitter {
    fn split(&self, text: &str) -> Result<(Mapping, String), SplitError> {
        let Some((yaml, body)) = frontmatter_parts(text) else {
            return Ok((Mapping::new(), text.to_string()));
        };

        let parsed: serde_yaml::Value =
            serde_yaml::from_str(yaml).map_err(|e| SplitError::Yaml(e.to_string()))?;
        let value = serde_json::to_value(parsed).map_err(|e| SplitError::Yaml(e.to_string()))?;

        let metadata = match value {
            Value::Null => Mapping::new(),
            Value::Object(map) => map,
            other => return Err(SplitError::NotAMapping(value_kind(&other))),
        };

        Ok((metadata, body.trim().to_string()))
    }
}

/// Locate the front matter block. Returns `(yaml, body)`.
fn frontmatter_parts(text: &str) -> Option<(&str, &str)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let rest = text.strip_prefix(DELIMITER)?;
    let (opening, after) = rest.split_once('\n')?;
    if !opening.trim().is_empty() {
        return None;
    }

    let mut offset = 0;
    for line in after.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            return Some((&after[..offset], &after[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Read `path`, split it, and expand the body when an expander is given.
pub(crate) fn read_document(
    path: &Path,
    splitter: &dyn DocumentSplitter,
    expander: Option<&dyn ContentExpander>,
) -> Result<(Mapping, String), ResolveError> {
    let text = fs::read_to_string(path).map_err(|source| ResolveError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let (metadata, body) = splitter
        .split(&text)
        .map_err(|e| ResolveError::Frontmatter {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let body = match expander {
        Some(expander) => expander.expand(&body),
        None => body,
    };
    Ok((metadata, body))
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
