//! Config loader facade: the single entry point for building configuration.

use super::merge::merge_policy::builder_with_defaults;
use super::sources::{global_file, workspace_file};
use super::MountplanConfig;
use crate::error::ResolveError;
use config::{Environment, File};
use std::path::Path;

/// Environment prefix for configuration overrides, e.g.
/// `MOUNTPLAN__MERGE__MODULE_LISTS=by_module`.
pub const ENV_PREFIX: &str = "MOUNTPLAN";
pub const ENV_SEPARATOR: &str = "__";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for `workspace_root`.
    ///
    /// Precedence (lowest first): defaults, user config file, workspace
    /// `.mountplan/config.toml`, workspace `.mountplan/{MOUNTPLAN_ENV}.toml`,
    /// environment.
    pub fn load(workspace_root: &Path) -> Result<MountplanConfig, ResolveError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load configuration from one explicit file, skipping the user and
    /// workspace files.
    pub fn load_from_file(path: &Path) -> Result<MountplanConfig, ResolveError> {
        if !path.is_file() {
            return Err(ResolveError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let config = builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
