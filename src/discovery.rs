//! Discovery: locate documents across ordered search roots.
//!
//! Roots are ordered lowest precedence first. Single-match lookups search
//! from the last root to the first; overlay scans return every match from the
//! first root to the last.

use crate::reference::{document_names, locate_with, Lookup, Reference, ReferenceResolver};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Extension of every profile and agent document.
pub const DOCUMENT_EXTENSION: &str = "md";

/// Which kind of document is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Profile,
    Agent,
}

impl EntityKind {
    /// Subdirectory holding this kind inside a collection.
    pub fn collection_subdir(&self) -> &'static str {
        match self {
            EntityKind::Profile => "profiles",
            EntityKind::Agent => "agents",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Profile => write!(f, "profile"),
            EntityKind::Agent => write!(f, "agent"),
        }
    }
}

/// One search root, optionally labelled with the layer it represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRoot {
    pub path: PathBuf,
    pub label: Option<String>,
}

impl SearchRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            label: None,
        }
    }

    pub fn labelled(path: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: Some(label.into()),
        }
    }

    fn document_path(&self, name: &str) -> PathBuf {
        self.path.join(format!("{}.{}", name, DOCUMENT_EXTENSION))
    }
}

/// Ordered search roots, index 0 = lowest precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRoots {
    roots: Vec<SearchRoot>,
}

impl SearchRoots {
    pub fn new(roots: Vec<SearchRoot>) -> Self {
        Self { roots }
    }

    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: paths.into_iter().map(SearchRoot::new).collect(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchRoot> {
        self.roots.iter()
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// New root set with `extra` appended as the highest-precedence roots.
    pub fn extended(&self, extra: impl IntoIterator<Item = SearchRoot>) -> Self {
        let mut roots = self.roots.clone();
        roots.extend(extra);
        Self { roots }
    }
}

impl From<Vec<PathBuf>> for SearchRoots {
    fn from(paths: Vec<PathBuf>) -> Self {
        Self::from_paths(paths)
    }
}

/// Where a located document came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// A search root, by index (0 = lowest precedence).
    Root {
        index: usize,
        label: Option<String>,
        root: PathBuf,
    },
    /// A namespace served by the reference resolver.
    Collection { namespace: String },
    /// A file pinned through an environment variable.
    Environment { variable: String },
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Root {
                label: Some(label), ..
            } => write!(f, "{}", label),
            Origin::Root { index, .. } => write!(f, "root[{}]", index),
            Origin::Collection { namespace } => write!(f, "collection:{}", namespace),
            Origin::Environment { variable } => write!(f, "env:{}", variable),
        }
    }
}

/// A located candidate file together with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub origin: Origin,
}

/// Locates documents of one kind.
#[derive(Clone)]
pub struct Discovery {
    kind: EntityKind,
    roots: SearchRoots,
    resolver: Option<Arc<dyn ReferenceResolver>>,
}

impl fmt::Debug for Discovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Discovery")
            .field("kind", &self.kind)
            .field("roots", &self.roots)
            .field("resolver", &self.resolver.is_some())
            .finish()
    }
}

impl Discovery {
    pub fn new(kind: EntityKind, roots: SearchRoots) -> Self {
        Self {
            kind,
            roots,
            resolver: None,
        }
    }

    pub fn with_resolver(mut self, resolver: Option<Arc<dyn ReferenceResolver>>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Same kind and resolver over different roots.
    pub fn with_roots(&self, roots: SearchRoots) -> Self {
        Self {
            kind: self.kind,
            roots,
            resolver: self.resolver.clone(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn roots(&self) -> &SearchRoots {
        &self.roots
    }

    pub fn resolver(&self) -> Option<&dyn ReferenceResolver> {
        self.resolver.as_deref()
    }

    /// Single highest-precedence match.
    pub fn find(&self, token: &str) -> Lookup {
        self.find_candidate(token)
            .map(|c| Lookup::Found(c.path))
            .unwrap_or_else(|| match Reference::parse(token) {
                Some(Reference::Namespaced { .. }) if self.resolver.is_none() => Lookup::Disabled,
                _ => Lookup::NotFound,
            })
    }

    /// Single highest-precedence match, with its origin.
    pub fn find_candidate(&self, token: &str) -> Option<Candidate> {
        match Reference::parse(token)? {
            Reference::Bare(name) => self
                .roots
                .iter()
                .enumerate()
                .rev()
                .find_map(|(index, root)| self.root_candidate(index, root, name)),
            Reference::Namespaced { namespace, name } => self.namespaced_candidate(namespace, name),
        }
    }

    /// Every match, lowest precedence first. Namespaced tokens yield at most
    /// one candidate.
    pub fn find_all(&self, token: &str) -> Vec<Candidate> {
        match Reference::parse(token) {
            Some(Reference::Bare(name)) => self
                .roots
                .iter()
                .enumerate()
                .filter_map(|(index, root)| self.root_candidate(index, root, name))
                .collect(),
            Some(Reference::Namespaced { namespace, name }) => {
                self.namespaced_candidate(namespace, name).into_iter().collect()
            }
            None => Vec::new(),
        }
    }

    /// Candidate paths a lookup would try, highest precedence first. A
    /// namespaced token yields the collection files the resolver tries.
    pub fn searched_paths(&self, token: &str) -> Vec<PathBuf> {
        match Reference::parse(token) {
            Some(Reference::Bare(name)) => self
                .roots
                .iter()
                .rev()
                .map(|root| root.document_path(name))
                .collect(),
            Some(Reference::Namespaced { namespace, name }) => self
                .resolver
                .as_deref()
                .map(|resolver| resolver.candidate_paths(self.kind, namespace, name))
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// All available names: bare names from every root plus
    /// `namespace:name` labels from the resolver. Sorted, deduplicated.
    pub fn list(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        for root in self.roots.iter() {
            names.extend(document_names(&root.path));
        }
        if let Some(resolver) = self.resolver.as_deref() {
            for (namespace, name) in resolver.list_all(self.kind) {
                names.insert(format!("{}:{}", namespace, name));
            }
        }
        names.into_iter().collect()
    }

    fn root_candidate(&self, index: usize, root: &SearchRoot, name: &str) -> Option<Candidate> {
        let path = root.document_path(name);
        if !path.is_file() {
            return None;
        }
        debug!(kind = %self.kind, name, path = %path.display(), "located document");
        Some(Candidate {
            origin: Origin::Root {
                index,
                label: root.label.clone(),
                root: root.path.clone(),
            },
            path,
        })
    }

    fn namespaced_candidate(&self, namespace: &str, name: &str) -> Option<Candidate> {
        let path = locate_with(self.resolver.as_deref(), self.kind, namespace, name).into_path()?;
        debug!(kind = %self.kind, namespace, name, path = %path.display(), "resolved namespaced reference");
        Some(Candidate {
            origin: Origin::Collection {
                namespace: namespace.to_string(),
            },
            path,
        })
    }
}
