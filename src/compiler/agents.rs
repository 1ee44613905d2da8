//! Agents section of a Mount Plan.
//!
//! Sources in order, later replacing earlier agents of the same name:
//! every document in each `dirs` entry, each `include` name, each `inline`
//! entry.

use crate::agent::AgentLoader;
use crate::discovery::SearchRoot;
use crate::error::ResolveError;
use crate::reference::document_names;
use crate::schema::{Agent, Profile};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Resolve the agents of `profile`. An empty map when it has no agents block.
pub fn resolve_agents(
    profile: &Profile,
    loader: &AgentLoader,
) -> Result<BTreeMap<String, Agent>, ResolveError> {
    let mut agents = BTreeMap::new();
    let Some(spec) = profile.agents() else {
        return Ok(agents);
    };

    let compilation = |agent: &str, source: ResolveError| ResolveError::Compilation {
        profile: profile.name().to_string(),
        agent: agent.to_string(),
        source: Box::new(source),
    };

    let dirs: Vec<PathBuf> = spec
        .dirs
        .iter()
        .filter_map(|dir| resolve_dir(dir, profile.base_dir()))
        .collect();

    for dir in &dirs {
        for name in document_names(dir) {
            let path = dir.join(format!("{}.md", name));
            let agent = loader
                .load_agent_file(&path, &name)
                .map_err(|e| compilation(&name, e))?;
            debug!(profile = profile.name(), agent = %name, dir = %dir.display(), "agent from directory");
            agents.insert(name, agent);
        }
    }

    if !spec.include.is_empty() {
        let scoped = loader.with_additional_roots(dirs.iter().map(SearchRoot::new));
        for name in &spec.include {
            let agent = scoped.load_agent(name).map_err(|e| compilation(name, e))?;
            debug!(profile = profile.name(), agent = %name, "included agent");
            agents.insert(name.clone(), agent);
        }
    }

    for (name, fields) in &spec.inline {
        let agent = Agent::from_inline(name, fields).map_err(|e| compilation(name, e))?;
        debug!(profile = profile.name(), agent = %name, "inline agent");
        agents.insert(name.clone(), agent);
    }

    Ok(agents)
}

/// Loaded documents carry entries already anchored to their own file.
/// Remaining relative entries resolve against the profile's directory, then
/// the working directory. Missing directories are skipped.
fn resolve_dir(dir: &str, base: Option<&Path>) -> Option<PathBuf> {
    let candidate = Path::new(dir);
    let resolved = if candidate.is_absolute() {
        Some(candidate.to_path_buf()).filter(|p| p.is_dir())
    } else {
        base.map(|b| b.join(candidate))
            .filter(|p| p.is_dir())
            .or_else(|| Some(candidate.to_path_buf()).filter(|p| p.is_dir()))
    };
    if resolved.is_none() {
        warn!(dir, "agent directory not found; skipping");
    }
    resolved
}
