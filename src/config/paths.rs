//! Well-known locations and the default search roots.
//!
//! Roots are ordered lowest precedence first: configured directories, then
//! the user directory, then the project directory.

use super::MountplanConfig;
use crate::discovery::{SearchRoot, SearchRoots};
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "mountplan";
pub const WORKSPACE_DIR: &str = ".mountplan";
pub const CONFIG_FILE: &str = "config.toml";
pub const PROFILES_DIR: &str = "profiles";
pub const AGENTS_DIR: &str = "agents";

/// `$XDG_CONFIG_HOME`, then `$HOME/.config`, then the platform default.
pub fn config_home() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(xdg));
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(home).join(".config"));
    }
    directories::BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf())
}

/// `<config_home>/mountplan`
pub fn user_dir() -> Option<PathBuf> {
    config_home().map(|home| home.join(APP_DIR))
}

/// `<workspace>/.mountplan`
pub fn workspace_dir(workspace_root: &Path) -> PathBuf {
    workspace_root.join(WORKSPACE_DIR)
}

pub fn profile_roots(config: &MountplanConfig, workspace_root: &Path) -> SearchRoots {
    default_roots(&config.search.profile_dirs, config.search.include_defaults, workspace_root, PROFILES_DIR)
}

pub fn agent_roots(config: &MountplanConfig, workspace_root: &Path) -> SearchRoots {
    default_roots(&config.search.agent_dirs, config.search.include_defaults, workspace_root, AGENTS_DIR)
}

/// Collection directories with relative paths resolved against the workspace.
pub fn collection_dirs(config: &MountplanConfig, workspace_root: &Path) -> Vec<(String, PathBuf)> {
    config
        .collections
        .iter()
        .map(|(name, dir)| (name.clone(), absolutize(dir, workspace_root)))
        .collect()
}

fn default_roots(
    configured: &[PathBuf],
    include_defaults: bool,
    workspace_root: &Path,
    subdir: &str,
) -> SearchRoots {
    let mut roots: Vec<SearchRoot> = configured
        .iter()
        .map(|dir| SearchRoot::labelled(absolutize(dir, workspace_root), "configured"))
        .collect();

    if include_defaults {
        if let Some(user) = user_dir() {
            roots.push(SearchRoot::labelled(user.join(subdir), "user"));
        }
        roots.push(SearchRoot::labelled(
            workspace_dir(workspace_root).join(subdir),
            "project",
        ));
    }

    SearchRoots::new(roots)
}

fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
