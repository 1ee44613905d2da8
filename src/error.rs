//! Error types for profile and agent resolution.

use crate::discovery::EntityKind;
use crate::reference::Reference;
use crate::schema::Violation;
use std::fmt::Write as _;
use std::path::PathBuf;
use thiserror::Error;

/// Resolution errors.
///
/// Every variant carries enough context to diagnose the failure without
/// re-running the resolution: searched paths, the attempted chain, or the
/// full list of schema violations.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("{kind} '{reference}' not found{}", not_found_detail(.reference, .referenced_by, .searched))]
    NotFound {
        kind: EntityKind,
        reference: String,
        /// Candidate files that were tried, highest precedence first.
        searched: Vec<PathBuf>,
        /// Profile whose `extends` named the missing reference.
        referenced_by: Option<String>,
    },

    #[error("invalid {kind} {location}: {}", join_violations(.violations))]
    Validation {
        kind: EntityKind,
        location: String,
        violations: Vec<Violation>,
    },

    #[error("circular inheritance detected: {}", .chain.join(" -> "))]
    CircularInheritance {
        /// Attempted chain in traversal order, ending with the repeated name.
        chain: Vec<String>,
    },

    #[error("failed to compile profile '{profile}': agent '{agent}': {source}")]
    Compilation {
        profile: String,
        agent: String,
        #[source]
        source: Box<ResolveError>,
    },

    #[error("failed to load agent '{agent}': {source}")]
    AgentBatch {
        agent: String,
        #[source]
        source: Box<ResolveError>,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid front matter in {path}: {message}")]
    Frontmatter { path: PathBuf, message: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl ResolveError {
    /// True for the `NotFound` kind, including a missing parent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::NotFound { .. })
    }

    /// Schema violations, when this is a validation failure (possibly wrapped
    /// by compilation or batch context).
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            ResolveError::Validation { violations, .. } => Some(violations),
            ResolveError::Compilation { source, .. } | ResolveError::AgentBatch { source, .. } => {
                source.violations()
            }
            _ => None,
        }
    }
}

impl From<config::ConfigError> for ResolveError {
    fn from(err: config::ConfigError) -> Self {
        ResolveError::Config(err.to_string())
    }
}

fn not_found_detail(reference: &str, referenced_by: &Option<String>, searched: &[PathBuf]) -> String {
    let mut out = String::new();
    if let Some(child) = referenced_by {
        let _ = write!(out, " (extended by '{}')", child);
    }
    let namespace = match Reference::parse(reference) {
        Some(Reference::Namespaced { namespace, .. }) => Some(namespace),
        _ => None,
    };
    if let Some(namespace) = namespace {
        let _ = write!(out, " in namespace '{}'", namespace);
    }
    if searched.is_empty() {
        match namespace {
            Some(_) => out.push_str("; no collection is configured for it"),
            None => out.push_str("; no search roots configured"),
        }
    } else {
        let paths: Vec<String> = searched.iter().map(|p| p.display().to_string()).collect();
        let _ = write!(out, "; searched: {}", paths.join(", "));
    }
    out
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
