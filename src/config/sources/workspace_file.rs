//! Workspace config file source: .mountplan/config.toml and .mountplan/{env}.toml

use crate::config::paths;
use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::Path;

/// Selects the environment-specific workspace file.
pub const ENV_NAME_VAR: &str = "MOUNTPLAN_ENV";

/// Add workspace config files to builder.
/// Precedence: .mountplan/config.toml (base) then .mountplan/{MOUNTPLAN_ENV}.toml.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let config_dir = paths::workspace_dir(workspace_root);
    let mut builder = builder;

    let base_config_path = config_dir.join(paths::CONFIG_FILE);
    if base_config_path.is_file() {
        builder = builder.add_source(File::from(base_config_path).required(false));
    }

    if let Ok(env_name) = std::env::var(ENV_NAME_VAR) {
        let env_config_path = config_dir.join(format!("{}.toml", env_name));
        if env_config_path.is_file() {
            builder = builder.add_source(File::from(env_config_path).required(false));
        }
    }

    Ok(builder)
}
