//! CLI presentation: text, json and yaml formatters per command family.

mod agent;
mod plan;
mod profile;
mod shared;

pub use agent::format_agent_show;
pub use plan::format_mount_plan;
pub use profile::{format_chain_text, format_profile_show, format_source_text};
pub use shared::{format_entry_list_json, format_entry_list_text, ListedEntry};
