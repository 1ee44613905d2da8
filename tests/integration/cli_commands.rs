//! Integration tests for the CLI route table

use crate::integration::test_utils::{with_xdg_env, write_agent, write_document, write_full_profile};
use mountplan::cli::{AgentCommands, Commands, ProfileCommands, RunContext};
use std::fs;
use tempfile::TempDir;

/// Workspace with a user-level base profile, a project-level child, a
/// project agent and a `foundation` collection.
fn workspace_fixture(test_dir: &TempDir, workspace: &TempDir) {
    let user_profiles = test_dir.path().join("config").join("mountplan").join("profiles");
    write_full_profile(&user_profiles, "base", "tools:\n  - module: tool-filesystem", "User base");

    let project = workspace.path().join(".mountplan");
    write_document(
        &project.join("profiles"),
        "dev",
        "profile:\n  name: dev\n  extends: base\nproviders:\n  - module: provider-anthropic\n    config:\n      api_key: ${MOUNTPLAN_TEST_UNSET_KEY}\nagents:\n  include:\n    - reviewer",
        "Dev body",
    );
    write_agent(&project.join("agents"), "reviewer", "Reviews", "Review carefully.");

    let collection = workspace.path().join("collections").join("foundation");
    write_agent(&collection.join("agents"), "explorer", "Explores", "");
    fs::write(
        project.join("config.toml"),
        "[collections]\nfoundation = \"collections/foundation\"\n",
    )
    .unwrap();
}

fn run(test_dir: &TempDir, workspace: &TempDir, command: Commands) -> Result<String, mountplan::ResolveError> {
    with_xdg_env(test_dir, || {
        let context = RunContext::new(workspace.path().to_path_buf(), None)?;
        context.execute(&command)
    })
}

#[test]
fn test_profile_list_shows_layers() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    workspace_fixture(&test_dir, &workspace);

    let out = run(
        &test_dir,
        &workspace,
        Commands::Profile {
            command: ProfileCommands::List {
                format: "json".to_string(),
            },
        },
    )
    .unwrap();
    let listing: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(listing["total"], 2);
    assert_eq!(listing["profiles"][0]["name"], "base");
    assert_eq!(listing["profiles"][0]["origin"], "user");
    assert_eq!(listing["profiles"][1]["name"], "dev");
    assert_eq!(listing["profiles"][1]["origin"], "project");
}

#[test]
fn test_profile_chain_text() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    workspace_fixture(&test_dir, &workspace);

    let out = run(
        &test_dir,
        &workspace,
        Commands::Profile {
            command: ProfileCommands::Chain {
                name: "dev".to_string(),
            },
        },
    )
    .unwrap();
    let base_at = out.find("1. base").unwrap();
    let dev_at = out.find("2. dev").unwrap();
    assert!(base_at < dev_at);
}

#[test]
fn test_profile_show_yaml_keeps_body() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    workspace_fixture(&test_dir, &workspace);

    let out = run(
        &test_dir,
        &workspace,
        Commands::Profile {
            command: ProfileCommands::Show {
                name: "dev".to_string(),
                format: "yaml".to_string(),
            },
        },
    )
    .unwrap();
    assert!(out.starts_with("---\n"));
    assert!(out.contains("tool-filesystem"));
    assert!(out.ends_with("Dev body"));
}

#[test]
fn test_agent_list_includes_collection_agents() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    workspace_fixture(&test_dir, &workspace);

    let out = run(
        &test_dir,
        &workspace,
        Commands::Agent {
            command: AgentCommands::List {
                format: "json".to_string(),
            },
        },
    )
    .unwrap();
    let listing: serde_json::Value = serde_json::from_str(&out).unwrap();
    let names: Vec<&str> = listing["agents"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|a| a["name"].as_str())
        .collect();
    assert_eq!(names, vec!["foundation:explorer", "reviewer"]);
}

#[test]
fn test_compile_resolves_agents_and_substitutes() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    workspace_fixture(&test_dir, &workspace);

    let out = run(
        &test_dir,
        &workspace,
        Commands::Compile {
            name: "dev".to_string(),
            overlays: Vec::new(),
            format: "json".to_string(),
        },
    )
    .unwrap();
    let plan: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(plan["tools"][0]["module"], "tool-filesystem");
    assert_eq!(plan["providers"][0]["config"]["api_key"], "");
    assert_eq!(plan["agents"]["reviewer"]["system"]["instruction"], "Review carefully.");
}

#[test]
fn test_compile_unknown_overlay_fails() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    workspace_fixture(&test_dir, &workspace);

    let err = run(
        &test_dir,
        &workspace,
        Commands::Compile {
            name: "dev".to_string(),
            overlays: vec!["nope".to_string()],
            format: "yaml".to_string(),
        },
    )
    .unwrap_err();
    assert!(err.is_not_found());
    assert!(mountplan::cli::map_error(&err).contains("'nope' not found"));
}
