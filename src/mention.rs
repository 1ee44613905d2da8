//! Inline content expansion of `@namespace:path` mentions.

use crate::reference::CollectionResolver;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fs;
use tracing::{debug, warn};

static MENTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|[\s(\[])@([A-Za-z0-9_-]+):([A-Za-z0-9_./-]*[A-Za-z0-9_/-])")
        .expect("mention regex should be valid")
});

/// Rewrites a document body before it is stored.
pub trait ContentExpander: Send + Sync {
    /// Mentions that cannot be resolved are left unchanged.
    fn expand(&self, text: &str) -> String;
}

/// Replaces `@namespace:relative/path` with the text of that file inside the
/// namespace's collection. Expansion is a single pass; mentions inside the
/// inserted text are not expanded.
#[derive(Debug, Clone)]
pub struct MentionExpander {
    collections: CollectionResolver,
}

impl MentionExpander {
    pub fn new(collections: CollectionResolver) -> Self {
        Self { collections }
    }

    fn replacement(&self, caps: &Captures<'_>) -> String {
        let whole = &caps[0];
        let namespace = &caps[2];
        let path = &caps[3];

        let Some(file) = self.collections.resolve_path(namespace, path) else {
            return whole.to_string();
        };
        match fs::read_to_string(&file) {
            Ok(content) => {
                debug!(namespace, path, "expanded mention");
                format!("{}{}", &caps[1], content.trim_end())
            }
            Err(e) => {
                warn!(file = %file.display(), error = %e, "failed to read mentioned file");
                whole.to_string()
            }
        }
    }
}

impl ContentExpander for MentionExpander {
    fn expand(&self, text: &str) -> String {
        if !text.contains('@') {
            return text.to_string();
        }
        MENTION
            .replace_all(text, |caps: &Captures<'_>| self.replacement(caps))
            .into_owned()
    }
}
