//! CLI domain: parse, route, output, and presentation only.
//! No resolution logic; a single route table dispatches to the loaders and the compiler.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{AgentCommands, Cli, Commands, ProfileCommands};
pub use presentation::{
    format_agent_show, format_chain_text, format_entry_list_json, format_entry_list_text,
    format_mount_plan, format_profile_show, format_source_text, ListedEntry,
};
pub use route::RunContext;
