//! Inheritance chain construction.

use super::loader::{ProfileDocument, ProfileLoader};
use super::overlay::merge_overlay_stack;
use crate::error::ResolveError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

impl ProfileLoader {
    /// Chain for `name`, root ancestor first and the requested profile last.
    ///
    /// The requested profile is the merge of its overlay stack; every parent
    /// is the single highest-precedence file for its reference. A revisited
    /// file or reference fails with the attempted chain.
    pub fn resolve_chain(&self, name: &str) -> Result<Vec<ProfileDocument>, ResolveError> {
        let stack = self.load_overlay_stack(name)?;

        let mut visited_paths: HashSet<PathBuf> = stack.iter().map(|d| canonical(&d.path)).collect();
        let mut visited_refs: HashSet<String> = HashSet::from([name.to_string()]);
        let mut trail = vec![name.to_string()];

        let head = merge_overlay_stack(stack, self.merge_policy())
            .ok_or_else(|| self.not_found(name, None))?;
        let mut chain = vec![head];

        loop {
            let Some(current) = chain.last() else { break };
            let Some(parent) = current.extends().map(str::to_string) else {
                break;
            };
            let child = current.name.clone();

            if visited_refs.contains(&parent) {
                trail.push(parent);
                return Err(ResolveError::CircularInheritance { chain: trail });
            }

            let candidate = self
                .discovery()
                .find_candidate(&parent)
                .ok_or_else(|| self.not_found(&parent, Some(&child)))?;

            if !visited_paths.insert(canonical(&candidate.path)) {
                trail.push(parent);
                return Err(ResolveError::CircularInheritance { chain: trail });
            }

            let doc = self.load_document(&candidate, &parent)?;
            debug!(profile = %child, parent = %parent, path = %doc.path.display(), "resolved parent");

            visited_refs.insert(parent.clone());
            trail.push(parent);
            chain.push(doc);
        }

        chain.reverse();
        Ok(chain)
    }
}

fn canonical(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
