//! mountplan: Profile and Agent Resolution
//!
//! Locates profile and agent documents (YAML front matter over a Markdown
//! body) across layered search roots, resolves inheritance and overlays,
//! validates the result and compiles it into a Mount Plan: the configuration
//! tree a runtime uses to mount an orchestrator, a context module,
//! providers, tools, hooks and agents.

pub mod agent;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod discovery;
pub mod document;
pub mod env;
pub mod error;
pub mod logging;
pub mod mention;
pub mod merge;
pub mod profile;
pub mod reference;
pub mod schema;

pub use agent::AgentLoader;
pub use compiler::{compile_profile_to_mount_plan, Compiler, MountPlan};
pub use error::ResolveError;
pub use profile::ProfileLoader;
pub use schema::{Agent, Profile};
