//! Profile loader: discovery, parsing and final assembly.

use crate::discovery::{Candidate, Discovery, EntityKind, Origin, SearchRoots};
use crate::document::{read_document, DocumentSplitter, FrontmatterSplitter};
use crate::error::ResolveError;
use crate::merge::{merge_documents, MergePolicy};
use crate::mention::ContentExpander;
use crate::reference::{Reference, ReferenceResolver};
use crate::schema::validation::check_profile_document;
use crate::schema::{Mapping, Profile};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// One profile document, checked for shape only. Documents in an
/// inheritance chain may be partial.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDocument {
    /// Token the document was loaded by.
    pub reference: String,
    /// `profile.name`, or the file stem when absent.
    pub name: String,
    pub path: PathBuf,
    pub origin: Origin,
    pub fields: Mapping,
    pub body: String,
}

impl ProfileDocument {
    /// Parent reference, if any.
    pub fn extends(&self) -> Option<&str> {
        self.fields
            .get("profile")
            .and_then(|p| p.get("extends"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Loads and resolves profiles across ordered search roots.
#[derive(Clone)]
pub struct ProfileLoader {
    discovery: Discovery,
    splitter: Arc<dyn DocumentSplitter>,
    expander: Option<Arc<dyn ContentExpander>>,
    policy: MergePolicy,
}

impl std::fmt::Debug for ProfileLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileLoader")
            .field("discovery", &self.discovery)
            .field("expander", &self.expander.is_some())
            .field("policy", &self.policy)
            .finish()
    }
}

impl ProfileLoader {
    /// Loader over `roots` (lowest precedence first) with the front matter
    /// splitter and no collaborators.
    pub fn new(roots: impl Into<SearchRoots>) -> Self {
        Self {
            discovery: Discovery::new(EntityKind::Profile, roots.into()),
            splitter: Arc::new(FrontmatterSplitter),
            expander: None,
            policy: MergePolicy::default(),
        }
    }

    pub fn with_reference_resolver(mut self, resolver: Arc<dyn ReferenceResolver>) -> Self {
        self.discovery = self.discovery.with_resolver(Some(resolver));
        self
    }

    pub fn with_content_expander(mut self, expander: Arc<dyn ContentExpander>) -> Self {
        self.expander = Some(expander);
        self
    }

    pub fn with_document_splitter(mut self, splitter: Arc<dyn DocumentSplitter>) -> Self {
        self.splitter = splitter;
        self
    }

    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn merge_policy(&self) -> &MergePolicy {
        &self.policy
    }

    pub fn roots(&self) -> &SearchRoots {
        self.discovery.roots()
    }

    pub(super) fn discovery(&self) -> &Discovery {
        &self.discovery
    }

    /// Every available profile name, sorted.
    pub fn list_profiles(&self) -> Vec<String> {
        self.discovery.list()
    }

    /// Highest-precedence file for `name`.
    pub fn find_profile_file(&self, name: &str) -> Option<PathBuf> {
        self.discovery.find(name).into_path()
    }

    /// Every file for `name`, lowest precedence first.
    pub fn find_overlay_files(&self, name: &str) -> Vec<PathBuf> {
        self.discovery
            .find_all(name)
            .into_iter()
            .map(|c| c.path)
            .collect()
    }

    /// Where the highest-precedence file for `name` comes from.
    pub fn profile_source(&self, name: &str) -> Option<Candidate> {
        self.discovery.find_candidate(name)
    }

    /// Read one profile document and check its shape.
    pub fn load_document(&self, candidate: &Candidate, reference: &str) -> Result<ProfileDocument, ResolveError> {
        let path = &candidate.path;
        let (fields, body) = read_document(path, self.splitter.as_ref(), self.expander.as_deref())?;
        let fields = normalize_parent_alias(fields, path);
        let fields = anchor_agent_dirs(fields, path);

        let violations = check_profile_document(&fields);
        if !violations.is_empty() {
            return Err(ResolveError::Validation {
                kind: EntityKind::Profile,
                location: path.display().to_string(),
                violations,
            });
        }

        let name = fields
            .get("profile")
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| fallback_name(reference, path));

        debug!(profile = %name, path = %path.display(), origin = %candidate.origin, "loaded profile document");
        Ok(ProfileDocument {
            reference: reference.to_string(),
            name,
            path: path.clone(),
            origin: candidate.origin.clone(),
            fields,
            body,
        })
    }

    /// Resolve `name` into a validated profile: overlays merged, the
    /// inheritance chain merged root first, the full schema checked.
    pub fn load_profile(&self, name: &str) -> Result<Profile, ResolveError> {
        let chain = self.resolve_chain(name)?;
        let Some(head) = chain.last() else {
            return Err(self.not_found(name, None));
        };
        let body = head.body.clone();
        let source = head.path.clone();

        debug!(
            profile = name,
            links = chain.len(),
            "merging inheritance chain"
        );
        let fields = merge_documents(chain.into_iter().map(|doc| doc.fields), &self.policy);
        Profile::from_mapping(fields, body, Some(source))
    }

    pub(crate) fn not_found(&self, reference: &str, referenced_by: Option<&str>) -> ResolveError {
        ResolveError::NotFound {
            kind: EntityKind::Profile,
            reference: reference.to_string(),
            searched: self.discovery.searched_paths(reference),
            referenced_by: referenced_by.map(str::to_string),
        }
    }
}

/// Accept `profile.parent` as a spelling of `profile.extends`.
fn normalize_parent_alias(mut fields: Mapping, path: &Path) -> Mapping {
    if let Some(Value::Object(meta)) = fields.get_mut("profile") {
        if let Some(parent) = meta.remove("parent") {
            if meta.contains_key("extends") {
                warn!(path = %path.display(), "both 'extends' and 'parent' set; using 'extends'");
            } else {
                meta.insert("extends".to_string(), parent);
            }
        }
    }
    fields
}

/// Resolve relative `agents.dirs` entries against the directory of the
/// document that declares them.
fn anchor_agent_dirs(mut fields: Mapping, path: &Path) -> Mapping {
    let Some(base) = path.parent() else {
        return fields;
    };
    let dirs = fields
        .get_mut("agents")
        .and_then(|agents| agents.get_mut("dirs"))
        .and_then(Value::as_array_mut);
    for entry in dirs.into_iter().flatten() {
        if let Value::String(dir) = entry {
            if Path::new(dir.as_str()).is_relative() {
                *dir = base.join(dir.as_str()).to_string_lossy().into_owned();
            }
        }
    }
    fields
}

fn fallback_name(reference: &str, path: &Path) -> String {
    match Reference::parse(reference) {
        Some(Reference::Bare(name)) => name.to_string(),
        _ => path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(reference)
            .to_string(),
    }
}
