//! Integration tests for namespaced references and mention expansion

use crate::integration::test_utils::{write_agent, write_document, write_full_profile};
use mountplan::mention::MentionExpander;
use mountplan::reference::CollectionResolver;
use mountplan::{AgentLoader, Compiler, ProfileLoader};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

struct Fixture {
    _temp_dir: TempDir,
    local: std::path::PathBuf,
    collections: CollectionResolver,
}

fn fixture() -> Fixture {
    let temp_dir = TempDir::new().unwrap();
    let foundation = temp_dir.path().join("foundation");
    let local = temp_dir.path().join("local");

    write_full_profile(
        &foundation.join("profiles"),
        "base",
        "providers:\n  - module: provider-anthropic",
        "Foundation base @foundation:context/guidelines.md",
    );
    write_agent(&foundation.join("agents"), "explorer", "Explores", "Explore the repo.");
    fs::create_dir_all(foundation.join("context")).unwrap();
    fs::write(foundation.join("context").join("guidelines.md"), "Follow the guidelines.\n").unwrap();

    let collections = CollectionResolver::new().with_collection("foundation", &foundation);
    Fixture {
        _temp_dir: temp_dir,
        local,
        collections,
    }
}

fn loader(fixture: &Fixture) -> ProfileLoader {
    ProfileLoader::new(vec![fixture.local.clone()])
        .with_reference_resolver(Arc::new(fixture.collections.clone()))
        .with_content_expander(Arc::new(MentionExpander::new(fixture.collections.clone())))
}

#[test]
fn test_local_profile_extends_namespaced_base_of_same_name() {
    let fixture = fixture();
    write_document(
        &fixture.local,
        "base",
        "profile:\n  name: base\n  extends: foundation:base\ntools:\n  - module: tool-local",
        "Local base",
    );

    let profile = loader(&fixture).load_profile("base").unwrap();
    assert_eq!(profile.providers()[0].module, "provider-anthropic");
    assert_eq!(profile.tools()[0].module, "tool-local");
    assert_eq!(profile.body(), "Local base");
}

#[test]
fn test_namespaced_profile_body_is_expanded() {
    let fixture = fixture();
    let profile = loader(&fixture).load_profile("foundation:base").unwrap();
    assert_eq!(profile.body(), "Foundation base Follow the guidelines.");
}

#[test]
fn test_full_path_reference() {
    let fixture = fixture();
    let loader = loader(&fixture);
    assert!(loader.find_profile_file("foundation:profiles/base.md").is_some());
    assert!(loader.find_profile_file("foundation:missing").is_none());
    assert!(loader.find_profile_file("elsewhere:base").is_none());
}

#[test]
fn test_namespaced_reference_without_resolver_is_not_found() {
    let fixture = fixture();
    let plain = ProfileLoader::new(vec![fixture.local.clone()]);
    let err = plain.load_profile("foundation:base").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_listing_includes_namespaced_entries() {
    let fixture = fixture();
    write_full_profile(&fixture.local, "dev", "", "");
    assert_eq!(loader(&fixture).list_profiles(), vec!["dev", "foundation:base"]);

    let agents = AgentLoader::new(vec![fixture.local.join("agents")])
        .with_reference_resolver(Arc::new(fixture.collections.clone()));
    assert_eq!(agents.list_agents(), vec!["foundation:explorer"]);
}

#[test]
fn test_namespaced_agent_include_compiles() {
    let fixture = fixture();
    write_full_profile(
        &fixture.local,
        "team",
        "agents:\n  include:\n    - foundation:explorer",
        "",
    );

    let profile = loader(&fixture).load_profile("team").unwrap();
    let agents = AgentLoader::new(vec![fixture.local.clone()])
        .with_reference_resolver(Arc::new(fixture.collections.clone()));
    let plan = Compiler::new()
        .with_agent_loader(agents)
        .compile(&profile, &[])
        .unwrap();
    assert_eq!(
        plan["agents"]["foundation:explorer"]["system"]["instruction"],
        "Explore the repo."
    );
}
