//! Compiler: resolved profile to Mount Plan.

pub mod agents;
pub mod env_subst;

use crate::agent::AgentLoader;
use crate::discovery::SearchRoots;
use crate::env::{process_env, EnvLookup};
use crate::error::ResolveError;
use crate::merge::{merge_profiles_with, MergePolicy};
use crate::schema::{Mapping, ModuleConfig, Profile};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::Deref;
use tracing::info;

/// The fully resolved configuration tree handed to the runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MountPlan(Mapping);

impl MountPlan {
    pub fn into_inner(self) -> Mapping {
        self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl Deref for MountPlan {
    type Target = Mapping;

    fn deref(&self) -> &Mapping {
        &self.0
    }
}

/// Compiles profiles into Mount Plans.
#[derive(Clone)]
pub struct Compiler {
    agents: AgentLoader,
    policy: MergePolicy,
    env: EnvLookup,
}

impl std::fmt::Debug for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("agents", &self.agents)
            .field("policy", &self.policy)
            .finish()
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    /// Compiler without agent search roots: `include` names resolve only
    /// inside the profile's own `dirs`.
    pub fn new() -> Self {
        Self {
            agents: AgentLoader::new(SearchRoots::default()),
            policy: MergePolicy::default(),
            env: process_env(),
        }
    }

    pub fn with_agent_loader(mut self, agents: AgentLoader) -> Self {
        self.agents = agents;
        self
    }

    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Environment used for `${NAME}` substitution.
    pub fn with_env(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self
    }

    /// Merge `overlays` onto `profile` (lowest precedence first) and emit
    /// the Mount Plan.
    pub fn compile(&self, profile: &Profile, overlays: &[Profile]) -> Result<MountPlan, ResolveError> {
        let mut resolved = profile.clone();
        for overlay in overlays {
            resolved = merge_profiles_with(&resolved, overlay, &self.policy)?;
        }

        let session = resolved.session();
        let mut plan = Mapping::new();

        let mut session_block: Mapping = session
            .extra
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (key, module) in [("orchestrator", &session.orchestrator), ("context", &session.context)] {
            session_block.insert(key.to_string(), Value::String(module.module.clone()));
            if let Some(source) = &module.source {
                session_block.insert(format!("{}_source", key), source.to_value());
            }
            if let Some(config) = module.non_empty_config() {
                let mut section = Mapping::new();
                section.insert("config".to_string(), Value::Object(config.clone()));
                plan.insert(key.to_string(), Value::Object(section));
            }
        }
        plan.insert("session".to_string(), Value::Object(session_block));

        for (key, modules) in [
            ("providers", resolved.providers()),
            ("tools", resolved.tools()),
            ("hooks", resolved.hooks()),
        ] {
            plan.insert(key.to_string(), module_list(modules));
        }

        let agents = agents::resolve_agents(&resolved, &self.agents)?;
        let agent_count = agents.len();
        let agents: Mapping = agents
            .into_iter()
            .map(|(name, agent)| (name, Value::Object(agent.to_mount_plan_fragment())))
            .collect();
        plan.insert("agents".to_string(), Value::Object(agents));

        let plan = match env_subst::substitute_value(Value::Object(plan), &self.env) {
            Value::Object(map) => map,
            _ => Mapping::new(),
        };

        info!(
            profile = resolved.name(),
            overlays = overlays.len(),
            providers = resolved.providers().len(),
            tools = resolved.tools().len(),
            hooks = resolved.hooks().len(),
            agents = agent_count,
            "compiled mount plan"
        );
        Ok(MountPlan(plan))
    }
}

/// Compile with the default merge policy and process environment.
pub fn compile_profile_to_mount_plan(
    profile: &Profile,
    overlays: &[Profile],
    agent_loader: Option<&AgentLoader>,
) -> Result<MountPlan, ResolveError> {
    let mut compiler = Compiler::new();
    if let Some(loader) = agent_loader {
        compiler = compiler.with_agent_loader(loader.clone());
    }
    compiler.compile(profile, overlays)
}

fn module_list(modules: &[ModuleConfig]) -> Value {
    Value::Array(
        modules
            .iter()
            .map(|m| Value::Object(m.to_mapping()))
            .collect(),
    )
}
