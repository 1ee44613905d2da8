//! Logging System
//!
//! Structured logging using the `tracing` crate. Level, format and
//! destination come from configuration and may be overridden through the
//! environment.

use crate::error::ResolveError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Full filter directive, e.g. `mountplan=debug`.
pub const LOG_ENV: &str = "MOUNTPLAN_LOG";
pub const LOG_FORMAT_ENV: &str = "MOUNTPLAN_LOG_FORMAT";
pub const LOG_OUTPUT_ENV: &str = "MOUNTPLAN_LOG_OUTPUT";
/// Comma separated `module=level` pairs.
pub const LOG_MODULES_ENV: &str = "MOUNTPLAN_LOG_MODULES";

pub const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file (default: stderr)
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path (required when output is "file")
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format only, stdout/stderr only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    // stdout carries command output
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Stdout,
    Stderr,
    File,
}

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. Environment variables (MOUNTPLAN_LOG, MOUNTPLAN_LOG_FORMAT, ...)
/// 2. The given configuration (CLI flags are folded into it by the caller)
/// 3. Defaults
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ResolveError> {
    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let output = determine_output(config)?;
    let use_color = config.map(|c| c.color).unwrap_or(true) && output != Output::File;

    let writer = match output {
        Output::Stdout => BoxMakeWriter::new(std::io::stdout),
        Output::Stderr => BoxMakeWriter::new(std::io::stderr),
        Output::File => BoxMakeWriter::new(Mutex::new(open_log_file(config)?)),
    };

    let base_subscriber = Registry::default().with(filter);
    let result = if format == "json" {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init()
    } else {
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(use_color)
                    .with_writer(writer),
            )
            .try_init()
    };

    result.map_err(|e| ResolveError::Config(format!("Failed to initialize logging: {}", e)))
}

fn open_log_file(config: Option<&LoggingConfig>) -> Result<std::fs::File, ResolveError> {
    let log_file = config.and_then(|c| c.file.clone()).ok_or_else(|| {
        ResolveError::Config("Log output 'file' requires a log file path".to_string())
    })?;

    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ResolveError::Config(format!("Failed to create log directory: {}", e))
        })?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .map_err(|e| ResolveError::Config(format!("Failed to open log file {:?}: {}", log_file, e)))
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: Option<&LoggingConfig>) -> Result<EnvFilter, ResolveError> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }

    let level = config.map(|c| c.level.as_str()).unwrap_or("warn");
    if level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(level);

    if let Some(config) = config {
        for (module, module_level) in &config.modules {
            filter = filter.add_directive(parse_directive(module, module_level)?);
        }
    }

    if let Ok(modules_str) = std::env::var(LOG_MODULES_ENV) {
        for (module, module_level) in parse_module_levels(&modules_str) {
            filter = filter.add_directive(parse_directive(module, module_level)?);
        }
    }

    Ok(filter)
}

fn parse_directive(
    module: &str,
    level: &str,
) -> Result<tracing_subscriber::filter::Directive, ResolveError> {
    format!("{}={}", module, level)
        .parse()
        .map_err(|e| ResolveError::Config(format!("Invalid log directive: {}", e)))
}

/// `a=debug, b = trace` into pairs; malformed entries are skipped.
fn parse_module_levels(spec: &str) -> Vec<(&str, &str)> {
    spec.split(',')
        .filter_map(|part| {
            let (module, level) = part.split_once('=')?;
            let (module, level) = (module.trim(), level.trim());
            (!module.is_empty() && !level.is_empty()).then_some((module, level))
        })
        .collect()
}

/// Determine output format from config or environment
fn determine_format(config: Option<&LoggingConfig>) -> Result<String, ResolveError> {
    if let Ok(format) = std::env::var(LOG_FORMAT_ENV) {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }

    let format = config.map(|c| c.format.as_str()).unwrap_or("text");
    if format != "json" && format != "text" {
        return Err(ResolveError::Config(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        )));
    }
    Ok(format.to_string())
}

/// Determine output destination from config or environment
fn determine_output(config: Option<&LoggingConfig>) -> Result<Output, ResolveError> {
    if let Ok(output) = std::env::var(LOG_OUTPUT_ENV) {
        return parse_output(&output);
    }
    parse_output(config.map(|c| c.output.as_str()).unwrap_or("stderr"))
}

fn parse_output(output: &str) -> Result<Output, ResolveError> {
    match output {
        "stdout" => Ok(Output::Stdout),
        "stderr" => Ok(Output::Stderr),
        "file" => Ok(Output::File),
        _ => Err(ResolveError::Config(format!(
            "Invalid log output: {} (must be 'stdout', 'stderr' or 'file')",
            output
        ))),
    }
}
