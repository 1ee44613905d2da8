//! CLI parse: clap types for mountplan. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// mountplan CLI - resolve profiles and agents into mount plans
#[derive(Parser)]
#[command(name = "mountplan")]
#[command(about = "Resolve layered profiles and agents into a mount plan")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Profile commands (list, show, chain, source)
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Agent commands (list, show)
    Agent {
        #[command(subcommand)]
        command: AgentCommands,
    },
    /// Compile a profile into a mount plan
    Compile {
        /// Profile name
        name: String,
        /// Additional profiles merged over the base, in order
        #[arg(long = "overlay")]
        overlays: Vec<String>,
        /// Output format (json or yaml)
        #[arg(long, default_value = "json")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// List available profiles
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the resolved profile
    Show {
        /// Profile name
        name: String,
        /// Output format (yaml or json)
        #[arg(long, default_value = "yaml")]
        format: String,
    },
    /// Show the inheritance chain, root first
    Chain {
        /// Profile name
        name: String,
    },
    /// Show where a profile is loaded from
    Source {
        /// Profile name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum AgentCommands {
    /// List available agents
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the resolved agent
    Show {
        /// Agent name
        name: String,
        /// Output format (yaml or json)
        #[arg(long, default_value = "yaml")]
        format: String,
    },
}
