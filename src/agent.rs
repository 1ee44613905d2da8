//! Agent resolution: first match wins, no overlays, no inheritance.

mod loader;

pub use loader::{agent_env_variable, AgentLoader};
