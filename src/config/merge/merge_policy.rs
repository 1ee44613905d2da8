//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("search.include_defaults", true)?
        .set_default("merge.module_lists", "replace")?
        .set_default("logging.level", "warn")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}
