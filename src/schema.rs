//! Profile and agent schema.
//!
//! Documents are loaded as untyped [`Mapping`]s and checked by
//! [`validation`] before being converted to the typed entities here.

pub mod agent;
pub mod module;
pub mod profile;
pub mod validation;

pub use agent::{Agent, AgentMetadata};
pub use module::{ModuleConfig, ModuleSource, SessionConfig};
pub use profile::{AgentsSpec, Profile, ProfileMetadata};
pub use validation::Violation;

/// Structured metadata of a document.
pub type Mapping = serde_json::Map<String, serde_json::Value>;

/// Module list sections shared by profiles and agents, in emission order.
pub const MODULE_LISTS: [&str; 3] = ["providers", "tools", "hooks"];
