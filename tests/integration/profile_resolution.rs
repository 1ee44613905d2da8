//! Integration tests for inheritance chains and profile validation

use crate::integration::test_utils::{write_document, write_full_profile};
use mountplan::merge::{merge_profiles, MergePolicy};
use mountplan::{Profile, ProfileLoader, ResolveError};
use tempfile::TempDir;

fn three_level_chain(root: &std::path::Path) {
    write_full_profile(
        root,
        "foundation",
        "providers:\n  - module: provider-anthropic\n    config:\n      model: sonnet",
        "Foundation instructions",
    );
    write_document(
        root,
        "base",
        "profile:\n  name: base\n  extends: foundation\ntools:\n  - module: tool-filesystem",
        "Base instructions",
    );
    write_document(
        root,
        "dev",
        "profile:\n  name: dev\n  extends: base\n  description: Development\nhooks:\n  - module: hook-logging",
        "",
    );
}

#[test]
fn test_each_level_contributes_its_own_section() {
    let temp_dir = TempDir::new().unwrap();
    three_level_chain(temp_dir.path());

    let loader = ProfileLoader::new(vec![temp_dir.path().to_path_buf()]);
    let profile = loader.load_profile("dev").unwrap();

    assert_eq!(profile.name(), "dev");
    assert_eq!(profile.metadata().description, "Development");
    assert_eq!(profile.metadata().version, "1.0.0");
    assert_eq!(profile.providers()[0].module, "provider-anthropic");
    assert_eq!(profile.tools()[0].module, "tool-filesystem");
    assert_eq!(profile.hooks()[0].module, "hook-logging");
    assert_eq!(profile.session().orchestrator.module, "loop-basic");
}

#[test]
fn test_body_is_never_inherited() {
    let temp_dir = TempDir::new().unwrap();
    three_level_chain(temp_dir.path());

    let loader = ProfileLoader::new(vec![temp_dir.path().to_path_buf()]);
    assert_eq!(loader.load_profile("dev").unwrap().body(), "");
    assert_eq!(loader.load_profile("base").unwrap().body(), "Base instructions");
}

#[test]
fn test_chain_is_root_first() {
    let temp_dir = TempDir::new().unwrap();
    three_level_chain(temp_dir.path());

    let loader = ProfileLoader::new(vec![temp_dir.path().to_path_buf()]);
    let names: Vec<String> = loader
        .resolve_chain("dev")
        .unwrap()
        .into_iter()
        .map(|doc| doc.name)
        .collect();
    assert_eq!(names, vec!["foundation", "base", "dev"]);
}

#[test]
fn test_circular_inheritance_reports_attempted_chain() {
    let temp_dir = TempDir::new().unwrap();
    write_document(temp_dir.path(), "a", "profile:\n  name: a\n  extends: b", "");
    write_document(temp_dir.path(), "b", "profile:\n  name: b\n  extends: a", "");

    let loader = ProfileLoader::new(vec![temp_dir.path().to_path_buf()]);
    match loader.load_profile("a") {
        Err(ResolveError::CircularInheritance { chain }) => {
            assert_eq!(chain, vec!["a", "b", "a"]);
        }
        other => panic!("expected circular inheritance, got {:?}", other),
    }
}

#[test]
fn test_missing_required_fields_listed_together() {
    let temp_dir = TempDir::new().unwrap();
    write_document(temp_dir.path(), "thin", "profile:\n  name: thin", "");

    let loader = ProfileLoader::new(vec![temp_dir.path().to_path_buf()]);
    let err = loader.load_profile("thin").unwrap_err();
    let fields: Vec<&str> = err
        .violations()
        .unwrap()
        .iter()
        .map(|v| v.field.as_str())
        .collect();
    assert!(fields.contains(&"profile.version"));
    assert!(fields.contains(&"profile.description"));
    assert!(fields.contains(&"session"));
}

#[test]
fn test_null_in_child_removes_inherited_key() {
    let temp_dir = TempDir::new().unwrap();
    write_full_profile(
        temp_dir.path(),
        "parent",
        "tools:\n  - module: tool-bash",
        "",
    );
    write_document(
        temp_dir.path(),
        "child",
        "profile:\n  name: child\n  extends: parent\ntools: null",
        "",
    );

    let loader = ProfileLoader::new(vec![temp_dir.path().to_path_buf()]);
    let profile = loader.load_profile("child").unwrap();
    assert!(profile.tools().is_empty());
    assert!(!profile.fields().contains_key("tools"));
}

#[test]
fn test_merge_is_order_sensitive() {
    let temp_dir = TempDir::new().unwrap();
    let a_path = write_full_profile(temp_dir.path(), "a", "tools:\n  - module: tool-a", "");
    let b_path = write_full_profile(temp_dir.path(), "b", "tools:\n  - module: tool-b", "");

    let loader = ProfileLoader::new(vec![temp_dir.path().to_path_buf()]);
    let a = loader.load_profile("a").unwrap();
    let b = loader.load_profile("b").unwrap();
    assert_eq!(a.source(), Some(a_path.as_path()));
    assert_eq!(b.source(), Some(b_path.as_path()));

    let ab = merge_profiles(&a, &b).unwrap();
    let ba = merge_profiles(&b, &a).unwrap();
    assert_eq!(ab.tools()[0].module, "tool-b");
    assert_eq!(ba.tools()[0].module, "tool-a");
    assert_ne!(ab, ba);
}

#[test]
fn test_by_module_policy_merges_module_lists() {
    let temp_dir = TempDir::new().unwrap();
    write_full_profile(
        temp_dir.path(),
        "parent",
        "providers:\n  - module: provider-anthropic\n    source: git+https://example.com/anthropic\n    config:\n      model: sonnet\n      temperature: 0.2\n  - module: provider-openai",
        "",
    );
    write_document(
        temp_dir.path(),
        "child",
        "profile:\n  name: child\n  extends: parent\nproviders:\n  - module: provider-anthropic\n    config:\n      model: opus\n  - module: provider-local",
        "",
    );

    let loader = ProfileLoader::new(vec![temp_dir.path().to_path_buf()])
        .with_merge_policy(MergePolicy::by_module());
    let profile = loader.load_profile("child").unwrap();
    let modules: Vec<&str> = profile.providers().iter().map(|p| p.module.as_str()).collect();
    assert_eq!(modules, vec!["provider-anthropic", "provider-openai", "provider-local"]);

    let anthropic = &profile.providers()[0];
    assert!(anthropic.source.is_some());
    let config = anthropic.config.as_ref().unwrap();
    assert_eq!(config["model"], "opus");
    assert_eq!(config["temperature"], 0.2);

    let replaced = ProfileLoader::new(vec![temp_dir.path().to_path_buf()])
        .load_profile("child")
        .unwrap();
    assert_eq!(replaced.providers().len(), 2);
    assert_eq!(replaced.providers()[1].module, "provider-local");
}

#[test]
fn test_profile_from_mapping_rejects_bad_session_extra() {
    let fields = serde_json::json!({
        "profile": {"name": "p", "version": "1", "description": "d"},
        "session": {
            "orchestrator": {"module": "loop"},
            "context": {"module": "ctx"},
            "nested": {"not": "scalar"}
        }
    });
    let serde_json::Value::Object(fields) = fields else {
        unreachable!()
    };
    let err = Profile::from_mapping(fields, "", None).unwrap_err();
    assert!(err
        .violations()
        .unwrap()
        .iter()
        .any(|v| v.field == "session.nested"));
}
