//! Property-based tests for merge laws

use mountplan::merge::{deep_merge, merge_layers, merge_mappings, MergePolicy};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn scalar() -> BoxedStrategy<Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z]{0,4}".prop_map(Value::String),
        prop::collection::vec(0u8..10, 0..3).prop_map(|items| json!(items)),
    ]
    .boxed()
}

/// Mappings where `s*` keys always hold non-mappings and `m*` keys always hold
/// mappings, so layers never disagree on the kind of a path.
fn layered_mapping(depth: u32) -> BoxedStrategy<Value> {
    let scalars = prop::collection::btree_map("s[0-3]", scalar(), 0..4);
    if depth == 0 {
        return scalars
            .prop_map(|map| Value::Object(map.into_iter().collect()))
            .boxed();
    }
    let nested = prop::collection::btree_map("m[0-2]", layered_mapping(depth - 1), 0..3);
    (scalars, nested)
        .prop_map(|(scalars, nested)| {
            let mut map: Map<String, Value> = scalars.into_iter().collect();
            map.extend(nested);
            Value::Object(map)
        })
        .boxed()
}

#[test]
fn test_empty_mapping_is_identity() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&layered_mapping(2), |value| {
            assert_eq!(deep_merge(value.clone(), json!({})), value);
            assert_eq!(deep_merge(json!({}), value.clone()), value);
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_deep_merge_is_associative() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(layered_mapping(2), layered_mapping(2), layered_mapping(2)),
            |(a, b, c)| {
                let left = deep_merge(deep_merge(a.clone(), b.clone()), c.clone());
                let right = deep_merge(a.clone(), deep_merge(b.clone(), c.clone()));
                assert_eq!(left, right);
                assert_eq!(merge_layers(vec![a, b, c]), left);
                Ok(())
            },
        )
        .unwrap();
}

#[test]
fn test_overlay_wins_on_scalar_keys() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(layered_mapping(1), layered_mapping(1)), |(base, overlay)| {
            let merged = deep_merge(base.clone(), overlay.clone());
            let merged = merged.as_object().unwrap();
            for (key, value) in overlay.as_object().unwrap() {
                if key.starts_with('s') {
                    assert_eq!(&merged[key], value);
                }
            }
            for key in base.as_object().unwrap().keys() {
                assert!(merged.contains_key(key), "base key {} dropped", key);
            }
            Ok(())
        })
        .unwrap();
}

fn distinct_ids() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-f]", 0..6).prop_map(|ids| {
        let mut seen = Vec::new();
        for id in ids {
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
        seen
    })
}

fn module_list(ids: &[String]) -> Value {
    Value::Array(ids.iter().map(|id| json!({ "module": id })).collect())
}

#[test]
fn test_by_module_keeps_base_order_and_appends_new() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(distinct_ids(), distinct_ids()), |(base_ids, overlay_ids)| {
            let mut base = Map::new();
            base.insert("tools".to_string(), module_list(&base_ids));
            let mut overlay = Map::new();
            overlay.insert("tools".to_string(), module_list(&overlay_ids));

            let merged = merge_mappings(base, overlay, &MergePolicy::by_module());
            let merged_ids: Vec<String> = merged["tools"]
                .as_array()
                .unwrap()
                .iter()
                .map(|item| item["module"].as_str().unwrap().to_string())
                .collect();

            let mut expected = base_ids.clone();
            expected.extend(overlay_ids.iter().filter(|id| !base_ids.contains(id)).cloned());
            assert_eq!(merged_ids, expected);
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_replace_policy_takes_overlay_list() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(distinct_ids(), distinct_ids()), |(base_ids, overlay_ids)| {
            let mut base = Map::new();
            base.insert("hooks".to_string(), module_list(&base_ids));
            let mut overlay = Map::new();
            overlay.insert("hooks".to_string(), module_list(&overlay_ids));

            let merged = merge_mappings(base, overlay, &MergePolicy::default());
            assert_eq!(merged["hooks"], module_list(&overlay_ids));
            Ok(())
        })
        .unwrap();
}
