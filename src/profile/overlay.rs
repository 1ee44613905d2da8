//! Overlays: every search root may carry a file for the same profile name.
//! The files are merged lowest precedence first into a single document.

use super::loader::{ProfileDocument, ProfileLoader};
use crate::error::ResolveError;
use crate::merge::{merge_documents, MergePolicy};
use serde_json::Value;
use tracing::debug;

impl ProfileLoader {
    /// Load every document for `name`, lowest precedence first. Roots
    /// without a file are skipped.
    pub fn load_overlay_stack(&self, name: &str) -> Result<Vec<ProfileDocument>, ResolveError> {
        self.discovery()
            .find_all(name)
            .iter()
            .map(|candidate| self.load_document(candidate, name))
            .collect()
    }
}

/// Merge an overlay stack into one document. The body, path and origin are
/// those of the highest-precedence file. Returns `None` for an empty stack.
pub fn merge_overlay_stack(
    stack: Vec<ProfileDocument>,
    policy: &MergePolicy,
) -> Option<ProfileDocument> {
    if stack.len() == 1 {
        return stack.into_iter().next();
    }
    let top = stack.last()?;
    let (reference, path, origin, body, top_name) = (
        top.reference.clone(),
        top.path.clone(),
        top.origin.clone(),
        top.body.clone(),
        top.name.clone(),
    );

    for doc in &stack {
        debug!(profile = %reference, path = %doc.path.display(), origin = %doc.origin, "applying overlay");
    }
    let fields = merge_documents(stack.into_iter().map(|doc| doc.fields), policy);
    let name = fields
        .get("profile")
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or(top_name);

    Some(ProfileDocument {
        reference,
        name,
        path,
        origin,
        fields,
        body,
    })
}
