//! Agent loader.

use crate::discovery::{Candidate, Discovery, EntityKind, Origin, SearchRoot, SearchRoots};
use crate::document::{read_document, DocumentSplitter, FrontmatterSplitter};
use crate::env::{process_env, EnvLookup};
use crate::error::ResolveError;
use crate::mention::ContentExpander;
use crate::reference::{Reference, ReferenceResolver};
use crate::schema::Agent;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

const AGENT_ENV_PREFIX: &str = "MOUNTPLAN_AGENT_";

/// Environment variable that pins the file for a bare agent name:
/// `MOUNTPLAN_AGENT_<NAME>`, upper-cased with `-` mapped to `_`.
pub fn agent_env_variable(name: &str) -> String {
    format!("{}{}", AGENT_ENV_PREFIX, name.to_uppercase().replace('-', "_"))
}

/// Loads agents from ordered search roots.
#[derive(Clone)]
pub struct AgentLoader {
    discovery: Discovery,
    splitter: Arc<dyn DocumentSplitter>,
    expander: Option<Arc<dyn ContentExpander>>,
    env: EnvLookup,
}

impl std::fmt::Debug for AgentLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentLoader")
            .field("discovery", &self.discovery)
            .field("expander", &self.expander.is_some())
            .finish()
    }
}

impl AgentLoader {
    pub fn new(roots: impl Into<SearchRoots>) -> Self {
        Self {
            discovery: Discovery::new(EntityKind::Agent, roots.into()),
            splitter: Arc::new(FrontmatterSplitter),
            expander: None,
            env: process_env(),
        }
    }

    pub fn with_reference_resolver(mut self, resolver: Arc<dyn ReferenceResolver>) -> Self {
        self.discovery = self.discovery.with_resolver(Some(resolver));
        self
    }

    pub fn with_content_expander(mut self, expander: Arc<dyn ContentExpander>) -> Self {
        self.expander = Some(expander);
        self
    }

    pub fn with_document_splitter(mut self, splitter: Arc<dyn DocumentSplitter>) -> Self {
        self.splitter = splitter;
        self
    }

    /// Environment consulted for `MOUNTPLAN_AGENT_<NAME>` overrides.
    pub fn with_env(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self
    }

    /// A copy of this loader with `roots` appended as the highest-precedence
    /// roots.
    pub fn with_additional_roots(&self, roots: impl IntoIterator<Item = SearchRoot>) -> Self {
        let mut loader = self.clone();
        loader.discovery = self
            .discovery
            .with_roots(self.discovery.roots().extended(roots));
        loader
    }

    pub fn roots(&self) -> &SearchRoots {
        self.discovery.roots()
    }

    /// Every available agent name, sorted.
    pub fn list_agents(&self) -> Vec<String> {
        self.discovery.list()
    }

    /// File for `name`: an environment pin, else the highest-precedence match.
    pub fn find_agent_file(&self, name: &str) -> Option<PathBuf> {
        self.agent_source(name).map(|c| c.path)
    }

    /// Where `name` resolves from.
    pub fn agent_source(&self, name: &str) -> Option<Candidate> {
        self.env_override(name)
            .or_else(|| self.discovery.find_candidate(name))
    }

    pub fn load_agent(&self, name: &str) -> Result<Agent, ResolveError> {
        let candidate = self.agent_source(name).ok_or_else(|| ResolveError::NotFound {
            kind: EntityKind::Agent,
            reference: name.to_string(),
            searched: self.discovery.searched_paths(name),
            referenced_by: None,
        })?;
        debug!(agent = name, path = %candidate.path.display(), origin = %candidate.origin, "loading agent");
        self.load_agent_file(&candidate.path, &agent_name(name, &candidate.path))
    }

    /// Load an agent from an explicit file.
    pub fn load_agent_file(&self, path: &Path, name: &str) -> Result<Agent, ResolveError> {
        let (fields, body) = read_document(path, self.splitter.as_ref(), self.expander.as_deref())?;
        Agent::from_mapping(name, fields, body, Some(path.to_path_buf()))
    }

    /// Load every named agent. Any failure fails the whole batch.
    pub fn load_agents_by_names<I, S>(&self, names: I) -> Result<BTreeMap<String, Agent>, ResolveError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut agents = BTreeMap::new();
        for name in names {
            let name = name.as_ref();
            let agent = self.load_agent(name).map_err(|e| ResolveError::AgentBatch {
                agent: name.to_string(),
                source: Box::new(e),
            })?;
            agents.insert(name.to_string(), agent);
        }
        Ok(agents)
    }

    fn env_override(&self, name: &str) -> Option<Candidate> {
        if !matches!(Reference::parse(name), Some(Reference::Bare(_))) {
            return None;
        }
        let variable = agent_env_variable(name);
        let path = PathBuf::from((self.env)(&variable)?);
        if !path.is_file() {
            debug!(variable = %variable, path = %path.display(), "agent override points to a missing file");
            return None;
        }
        Some(Candidate {
            path,
            origin: Origin::Environment { variable },
        })
    }
}

/// Name an agent defaults to when its document does not set one.
fn agent_name(reference: &str, path: &Path) -> String {
    match Reference::parse(reference) {
        Some(Reference::Bare(name)) => name.to_string(),
        _ => path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(reference)
            .to_string(),
    }
}
