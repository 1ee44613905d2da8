//! User config file source: $XDG_CONFIG_HOME/mountplan/config.toml or ~/.config/mountplan/config.toml

use crate::config::paths;
use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::PathBuf;
use tracing::debug;

/// Path to the user config file.
pub fn global_config_path() -> Option<PathBuf> {
    paths::user_dir().map(|dir| dir.join(paths::CONFIG_FILE))
}

/// Add the user config file to the builder if it exists.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if let Some(config_path) = global_config_path() {
        if config_path.is_file() {
            let canonical = dunce::canonicalize(&config_path).unwrap_or(config_path);
            builder = builder.add_source(File::from(canonical).required(false));
        } else {
            debug!(
                config_path = %config_path.display(),
                "No user configuration file; using defaults"
            );
        }
    }
    Ok(builder)
}
