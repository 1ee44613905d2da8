//! Configuration System
//!
//! Layered configuration: built-in defaults, the user config file, the
//! workspace config files, then `MOUNTPLAN__SECTION__KEY` environment
//! variables. Search roots, collections and the merge policy for the CLI are
//! derived from it.

use crate::logging::{LoggingConfig, LOG_LEVELS};
use crate::merge::MergePolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

mod facade;
mod merge;
pub mod paths;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MountplanConfig {
    /// Extra search roots
    #[serde(default)]
    pub search: SearchConfig,

    /// Namespace to collection directory
    #[serde(default)]
    pub collections: BTreeMap<String, PathBuf>,

    /// Merge behavior for module lists
    #[serde(default)]
    pub merge: MergePolicy,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Search root configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Profile roots, lowest precedence first. Relative paths resolve
    /// against the workspace root.
    #[serde(default)]
    pub profile_dirs: Vec<PathBuf>,

    /// Agent roots, lowest precedence first.
    #[serde(default)]
    pub agent_dirs: Vec<PathBuf>,

    /// Append the user and project roots after the configured ones.
    #[serde(default = "default_true")]
    pub include_defaults: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            profile_dirs: Vec::new(),
            agent_dirs: Vec::new(),
            include_defaults: default_true(),
        }
    }
}

/// Configuration validation issues
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    Search(String),
    Collection(String, String),
    Logging(String),
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigIssue::Search(msg) => write!(f, "Search: {}", msg),
            ConfigIssue::Collection(name, msg) => write!(f, "Collection '{}': {}", name, msg),
            ConfigIssue::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ConfigIssue {}

impl MountplanConfig {
    /// Validate the entire configuration, reporting every issue found.
    pub fn validate(&self) -> Result<(), Vec<ConfigIssue>> {
        let mut issues = Vec::new();

        for (key, dirs) in [
            ("profile_dirs", &self.search.profile_dirs),
            ("agent_dirs", &self.search.agent_dirs),
        ] {
            for (index, dir) in dirs.iter().enumerate() {
                if dir.as_os_str().is_empty() {
                    issues.push(ConfigIssue::Search(format!("{}[{}] is empty", key, index)));
                }
            }
        }

        for (name, root) in &self.collections {
            if name.trim().is_empty() {
                issues.push(ConfigIssue::Collection(
                    name.clone(),
                    "namespace cannot be empty".to_string(),
                ));
            }
            if name.contains(':') {
                issues.push(ConfigIssue::Collection(
                    name.clone(),
                    "namespace cannot contain ':'".to_string(),
                ));
            }
            if root.as_os_str().is_empty() {
                issues.push(ConfigIssue::Collection(
                    name.clone(),
                    "directory cannot be empty".to_string(),
                ));
            }
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            issues.push(ConfigIssue::Logging(format!(
                "unknown level '{}'",
                self.logging.level
            )));
        }
        if !["text", "json"].contains(&self.logging.format.as_str()) {
            issues.push(ConfigIssue::Logging(format!(
                "unknown format '{}'",
                self.logging.format
            )));
        }
        match self.logging.output.as_str() {
            "stdout" | "stderr" => {}
            "file" if self.logging.file.is_none() => issues.push(ConfigIssue::Logging(
                "output 'file' requires 'file' to be set".to_string(),
            )),
            "file" => {}
            other => issues.push(ConfigIssue::Logging(format!("unknown output '{}'", other))),
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}
