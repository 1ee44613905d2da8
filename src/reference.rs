//! Reference tokens and the namespaced reference resolver.
//!
//! A reference is either a bare name (`dev`) searched across the configured
//! roots, or a namespaced token (`foundation:base`, `foundation:profiles/base.md`)
//! handed to a [`ReferenceResolver`].

use crate::discovery::{EntityKind, DOCUMENT_EXTENSION};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Parsed reference token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference<'a> {
    Bare(&'a str),
    Namespaced { namespace: &'a str, name: &'a str },
}

impl<'a> Reference<'a> {
    /// Split at the first colon. Returns `None` for tokens that cannot name
    /// anything (empty, or a colon with an empty side).
    pub fn parse(token: &'a str) -> Option<Self> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        match token.split_once(':') {
            None => Some(Reference::Bare(token)),
            Some((namespace, name)) if !namespace.is_empty() && !name.is_empty() => {
                Some(Reference::Namespaced { namespace, name })
            }
            Some(_) => None,
        }
    }

    pub fn is_namespaced(&self) -> bool {
        matches!(self, Reference::Namespaced { .. })
    }
}

/// Outcome of a lookup that may go through an optional collaborator.
///
/// `Disabled` (no collaborator configured) and `NotFound` (collaborator found
/// nothing) are distinct only for diagnostics; [`Lookup::into_path`] treats
/// them the same.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(PathBuf),
    NotFound,
    Disabled,
}

impl Lookup {
    pub fn into_path(self) -> Option<PathBuf> {
        match self {
            Lookup::Found(path) => Some(path),
            Lookup::NotFound | Lookup::Disabled => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    /// Lift an optional path into a lookup result.
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map(Lookup::Found).unwrap_or(Lookup::NotFound)
    }
}

/// Resolves `namespace:name` and `namespace:relative/path` tokens.
pub trait ReferenceResolver: Send + Sync {
    /// Locate the file for `name_or_path` inside `namespace`.
    fn locate(&self, kind: EntityKind, namespace: &str, name_or_path: &str) -> Lookup;

    /// Every `(namespace, name)` pair this resolver can serve for `kind`.
    fn list_all(&self, kind: EntityKind) -> Vec<(String, String)>;

    /// Files [`ReferenceResolver::locate`] tries, in order. Empty when the
    /// namespace is unknown.
    fn candidate_paths(&self, _kind: EntityKind, _namespace: &str, _name_or_path: &str) -> Vec<PathBuf> {
        Vec::new()
    }
}

/// Route a lookup through an optional resolver.
pub fn locate_with(
    resolver: Option<&dyn ReferenceResolver>,
    kind: EntityKind,
    namespace: &str,
    name_or_path: &str,
) -> Lookup {
    match resolver {
        Some(resolver) => resolver.locate(kind, namespace, name_or_path),
        None => Lookup::Disabled,
    }
}

/// Directory-backed resolver: each namespace ("collection") is a directory
/// holding `profiles/` and `agents/` subdirectories.
#[derive(Debug, Clone, Default)]
pub struct CollectionResolver {
    collections: BTreeMap<String, PathBuf>,
}

impl CollectionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(mut self, namespace: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        self.collections.insert(namespace.into(), root.into());
        self
    }

    pub fn from_map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<PathBuf>,
    {
        Self {
            collections: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Root directory of a collection.
    pub fn collection_root(&self, namespace: &str) -> Option<&Path> {
        self.collections.get(namespace).map(PathBuf::as_path)
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Resolve a path inside a collection, as written. Used for mentions.
    pub fn resolve_path(&self, namespace: &str, relative: &str) -> Option<PathBuf> {
        let candidate = self.collection_root(namespace)?.join(relative);
        candidate.is_file().then_some(candidate)
    }
}

impl ReferenceResolver for CollectionResolver {
    fn locate(&self, kind: EntityKind, namespace: &str, name_or_path: &str) -> Lookup {
        Lookup::from_option(
            self.candidate_paths(kind, namespace, name_or_path)
                .into_iter()
                .find(|path| path.is_file()),
        )
    }

    /// Full path form first (`foundation:profiles/base.md`), then the simple
    /// name form (`foundation:base` -> `<root>/profiles/base.md`).
    fn candidate_paths(&self, kind: EntityKind, namespace: &str, name_or_path: &str) -> Vec<PathBuf> {
        let Some(root) = self.collection_root(namespace) else {
            return Vec::new();
        };
        let mut paths = vec![root.join(name_or_path)];

        let subdir = format!("{}/", kind.collection_subdir());
        if !name_or_path.starts_with(&subdir) {
            let suffix = format!(".{}", DOCUMENT_EXTENSION);
            let file_name = if name_or_path.ends_with(&suffix) {
                name_or_path.to_string()
            } else {
                format!("{}{}", name_or_path, suffix)
            };
            paths.push(root.join(kind.collection_subdir()).join(file_name));
        }
        paths
    }

    fn list_all(&self, kind: EntityKind) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        for (namespace, root) in &self.collections {
            let dir = root.join(kind.collection_subdir());
            for name in document_names(&dir) {
                entries.push((namespace.clone(), name));
            }
        }
        entries
    }
}

/// Names (file stems) of the documents directly inside `dir`, sorted.
/// README files are not documents.
pub(crate) fn document_names(dir: &Path) -> Vec<String> {
    if !dir.is_dir() {
        return Vec::new();
    }
    let mut names: Vec<String> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry.path().extension().and_then(|e| e.to_str()) == Some(DOCUMENT_EXTENSION)
        })
        .filter_map(|entry| {
            entry
                .path()
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
        })
        .filter(|stem| !stem.eq_ignore_ascii_case("readme"))
        .collect();
    names.sort();
    names
}
