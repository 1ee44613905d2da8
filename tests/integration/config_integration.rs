//! Integration tests for the configuration layers

use crate::integration::test_utils::with_xdg_env;
use mountplan::config::{paths, ConfigLoader};
use mountplan::merge::ModuleListMerge;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_user_config(test_dir: &TempDir, contents: &str) {
    let dir = test_dir.path().join("config").join("mountplan");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), contents).unwrap();
}

fn write_workspace_config(workspace: &std::path::Path, file: &str, contents: &str) {
    let dir = workspace.join(".mountplan");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), contents).unwrap();
}

#[test]
fn test_defaults_without_files() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();

    let config = with_xdg_env(&test_dir, || ConfigLoader::load(workspace.path()).unwrap());
    assert!(config.search.include_defaults);
    assert_eq!(config.merge.module_lists, ModuleListMerge::Replace);
    assert_eq!(config.logging.level, "warn");
    assert!(config.validate().is_ok());
}

#[test]
fn test_workspace_file_overrides_user_file() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    write_user_config(
        &test_dir,
        "[merge]\nmodule_lists = \"by_module\"\n\n[collections]\nfoundation = \"/opt/foundation\"\n",
    );
    write_workspace_config(workspace.path(), "config.toml", "[merge]\nmodule_lists = \"replace\"\n");

    let config = with_xdg_env(&test_dir, || ConfigLoader::load(workspace.path()).unwrap());
    assert_eq!(config.merge.module_lists, ModuleListMerge::Replace);
    assert_eq!(
        config.collections.get("foundation"),
        Some(&PathBuf::from("/opt/foundation"))
    );
}

#[test]
fn test_environment_file_and_variables() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    write_workspace_config(workspace.path(), "config.toml", "[logging]\nlevel = \"info\"\n");
    write_workspace_config(workspace.path(), "ci.toml", "[logging]\nlevel = \"error\"\n");

    let (from_env_file, from_variable) = with_xdg_env(&test_dir, || {
        std::env::set_var("MOUNTPLAN_ENV", "ci");
        let from_env_file = ConfigLoader::load(workspace.path());
        std::env::set_var("MOUNTPLAN__MERGE__MODULE_LISTS", "by_module");
        let from_variable = ConfigLoader::load(workspace.path());
        std::env::remove_var("MOUNTPLAN__MERGE__MODULE_LISTS");
        std::env::remove_var("MOUNTPLAN_ENV");
        (from_env_file.unwrap(), from_variable.unwrap())
    });

    assert_eq!(from_env_file.logging.level, "error");
    assert_eq!(from_env_file.merge.module_lists, ModuleListMerge::Replace);
    assert_eq!(from_variable.merge.module_lists, ModuleListMerge::ByModule);
}

#[test]
fn test_user_roots_follow_xdg_config_home() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();

    let (config, roots) = with_xdg_env(&test_dir, || {
        let config = ConfigLoader::load(workspace.path()).unwrap();
        let roots = paths::profile_roots(&config, workspace.path());
        (config, roots)
    });
    assert!(config.search.profile_dirs.is_empty());

    let listed: Vec<PathBuf> = roots.iter().map(|r| r.path.clone()).collect();
    assert_eq!(
        listed,
        vec![
            test_dir.path().join("config").join("mountplan").join("profiles"),
            workspace.path().join(".mountplan").join("profiles"),
        ]
    );
}

#[test]
fn test_missing_explicit_file_is_error() {
    let test_dir = TempDir::new().unwrap();
    let result = ConfigLoader::load_from_file(&test_dir.path().join("absent.toml"));
    assert!(result.is_err());
}
