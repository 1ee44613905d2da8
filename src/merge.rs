//! Merge engine.
//!
//! Merge semantics:
//! - Mappings: deep-merge by key (recursive)
//! - Lists: replace (overlay wins entirely), unless the module-list policy
//!   says otherwise for `providers`, `tools` and `hooks`
//! - Scalars and type mismatches: overlay wins
//! - Null: overrides like any scalar; [`prune_nulls`] drops it when a
//!   profile is built, which removes the inherited key

use crate::error::ResolveError;
use crate::schema::{Mapping, Profile, MODULE_LISTS};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How top-level module lists combine across layers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleListMerge {
    /// The overlay's list replaces the base list.
    #[default]
    Replace,
    /// Items are matched by module identifier: base order is kept, matching
    /// items are merged, new items are appended.
    ByModule,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePolicy {
    #[serde(default)]
    pub module_lists: ModuleListMerge,
}

impl MergePolicy {
    pub fn by_module() -> Self {
        Self {
            module_lists: ModuleListMerge::ByModule,
        }
    }
}

/// Deep merge two JSON values, `overlay` taking precedence.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Merge layers in order (first is base, last has highest precedence).
pub fn merge_layers<I>(layers: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    layers.into_iter().fold(Value::Null, deep_merge)
}

/// Merge two document mappings under `policy`.
pub fn merge_mappings(mut base: Mapping, overlay: Mapping, policy: &MergePolicy) -> Mapping {
    for (key, overlay_value) in overlay {
        let merged = match base.remove(&key) {
            Some(Value::Array(base_items))
                if policy.module_lists == ModuleListMerge::ByModule
                    && MODULE_LISTS.contains(&key.as_str()) =>
            {
                match overlay_value {
                    Value::Array(overlay_items) => {
                        Value::Array(merge_module_list(base_items, overlay_items))
                    }
                    other => other,
                }
            }
            Some(base_value) => deep_merge(base_value, overlay_value),
            None => overlay_value,
        };
        base.insert(key, merged);
    }
    base
}

/// Fold document mappings low to high.
pub fn merge_documents<I>(documents: I, policy: &MergePolicy) -> Mapping
where
    I: IntoIterator<Item = Mapping>,
{
    documents
        .into_iter()
        .fold(Mapping::new(), |acc, doc| merge_mappings(acc, doc, policy))
}

/// Merge `child` over `parent` with the default policy.
///
/// The result carries the child's body and source; the parent's body is
/// never inherited.
pub fn merge_profiles(parent: &Profile, child: &Profile) -> Result<Profile, ResolveError> {
    merge_profiles_with(parent, child, &MergePolicy::default())
}

pub fn merge_profiles_with(
    parent: &Profile,
    child: &Profile,
    policy: &MergePolicy,
) -> Result<Profile, ResolveError> {
    let fields = merge_mappings(parent.fields().clone(), child.fields().clone(), policy);
    Profile::from_mapping(fields, child.body(), child.source().map(Into::into))
}

/// Remove `null` entries from every mapping in `value`.
pub fn prune_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, prune_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(prune_nulls).collect()),
        other => other,
    }
}

fn module_id(item: &Value) -> Option<&str> {
    item.get("module").and_then(Value::as_str)
}

fn merge_module_list(mut base: Vec<Value>, overlay: Vec<Value>) -> Vec<Value> {
    for item in overlay {
        let existing = module_id(&item)
            .and_then(|id| base.iter().position(|b| module_id(b) == Some(id)));
        match existing {
            Some(index) => {
                let current = std::mem::take(&mut base[index]);
                base[index] = merge_module_item(current, item);
            }
            None => base.push(item),
        }
    }
    base
}

/// Child fields override; `config` is deep-merged, `source` is inherited
/// when the child omits it.
fn merge_module_item(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                let merged = match (key.as_str(), base_map.remove(&key)) {
                    ("config", Some(existing)) => deep_merge(existing, value),
                    _ => value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}
