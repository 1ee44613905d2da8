//! CLI route: single route table and run context. Dispatches to the loaders,
//! the compiler and presentation.

use crate::agent::AgentLoader;
use crate::compiler::Compiler;
use crate::config::{paths, ConfigLoader, MountplanConfig};
use crate::error::ResolveError;
use crate::mention::MentionExpander;
use crate::profile::ProfileLoader;
use crate::reference::CollectionResolver;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cli::parse::{AgentCommands, Commands, ProfileCommands};
use crate::cli::presentation::{
    format_agent_show, format_chain_text, format_entry_list_json, format_entry_list_text,
    format_mount_plan, format_profile_show, format_source_text, ListedEntry,
};

/// Runtime context for CLI execution: workspace, configuration and the
/// loaders built from it.
pub struct RunContext {
    workspace_root: PathBuf,
    config: MountplanConfig,
    profiles: ProfileLoader,
    agents: AgentLoader,
    compiler: Compiler,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ResolveError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Self::from_config(workspace_root, config)
    }

    /// Create run context from an already loaded configuration.
    pub fn from_config(workspace_root: PathBuf, config: MountplanConfig) -> Result<Self, ResolveError> {
        if let Err(issues) = config.validate() {
            let joined: Vec<String> = issues.iter().map(|i| i.to_string()).collect();
            return Err(ResolveError::Config(joined.join("; ")));
        }

        let collections = CollectionResolver::from_map(paths::collection_dirs(&config, &workspace_root));
        let mut profiles = ProfileLoader::new(paths::profile_roots(&config, &workspace_root))
            .with_merge_policy(config.merge);
        let mut agents = AgentLoader::new(paths::agent_roots(&config, &workspace_root));

        if !collections.is_empty() {
            let resolver = Arc::new(collections.clone());
            let expander = Arc::new(MentionExpander::new(collections));
            profiles = profiles
                .with_reference_resolver(resolver.clone())
                .with_content_expander(expander.clone());
            agents = agents
                .with_reference_resolver(resolver)
                .with_content_expander(expander);
        }

        debug!(
            workspace = %workspace_root.display(),
            profile_roots = profiles.roots().len(),
            agent_roots = agents.roots().len(),
            "run context ready"
        );

        let compiler = Compiler::new()
            .with_agent_loader(agents.clone())
            .with_merge_policy(config.merge);

        Ok(Self {
            workspace_root,
            config,
            profiles,
            agents,
            compiler,
        })
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config(&self) -> &MountplanConfig {
        &self.config
    }

    pub fn profiles(&self) -> &ProfileLoader {
        &self.profiles
    }

    pub fn agents(&self) -> &AgentLoader {
        &self.agents
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ResolveError> {
        match command {
            Commands::Profile { command } => self.handle_profile_command(command),
            Commands::Agent { command } => self.handle_agent_command(command),
            Commands::Compile {
                name,
                overlays,
                format,
            } => self.handle_compile(name, overlays, format),
        }
    }

    fn handle_profile_command(&self, command: &ProfileCommands) -> Result<String, ResolveError> {
        match command {
            ProfileCommands::List { format } => {
                let entries: Vec<ListedEntry> = self
                    .profiles
                    .list_profiles()
                    .into_iter()
                    .map(|name| {
                        let source = self.profiles.profile_source(&name);
                        ListedEntry::new(name, source)
                    })
                    .collect();
                Ok(match format.as_str() {
                    "json" => format_entry_list_json("profiles", &entries),
                    _ => format_entry_list_text("Profile", &entries),
                })
            }
            ProfileCommands::Show { name, format } => {
                let profile = self.profiles.load_profile(name)?;
                Ok(format_profile_show(&profile, format))
            }
            ProfileCommands::Chain { name } => {
                let chain = self.profiles.resolve_chain(name)?;
                Ok(format_chain_text(&chain))
            }
            ProfileCommands::Source { name } => {
                let candidate = self
                    .profiles
                    .profile_source(name)
                    .ok_or_else(|| self.profiles.not_found(name, None))?;
                let overlays = self.profiles.find_overlay_files(name);
                Ok(format_source_text(name, &candidate, &overlays))
            }
        }
    }

    fn handle_agent_command(&self, command: &AgentCommands) -> Result<String, ResolveError> {
        match command {
            AgentCommands::List { format } => {
                let entries: Vec<ListedEntry> = self
                    .agents
                    .list_agents()
                    .into_iter()
                    .map(|name| {
                        let source = self.agents.agent_source(&name);
                        ListedEntry::new(name, source)
                    })
                    .collect();
                Ok(match format.as_str() {
                    "json" => format_entry_list_json("agents", &entries),
                    _ => format_entry_list_text("Agent", &entries),
                })
            }
            AgentCommands::Show { name, format } => {
                let agent = self.agents.load_agent(name)?;
                Ok(format_agent_show(&agent, format))
            }
        }
    }

    fn handle_compile(&self, name: &str, overlays: &[String], format: &str) -> Result<String, ResolveError> {
        let profile = self.profiles.load_profile(name)?;
        let overlays = overlays
            .iter()
            .map(|overlay| self.profiles.load_profile(overlay))
            .collect::<Result<Vec<_>, _>>()?;
        if format != "json" && format != "yaml" {
            warn!(format = format, "unknown output format; using json");
        }
        let plan = self.compiler.compile(&profile, &overlays)?;
        Ok(format_mount_plan(&plan, format))
    }
}
