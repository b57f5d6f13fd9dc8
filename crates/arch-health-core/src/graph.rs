//! Dependency graph and import resolution.
//!
//! The graph stores one [`DependencyNode`] per scanned file, keyed by its
//! relative id, in scan order. Edges are never stored: they are derived on
//! demand by [`DependencyGraph::resolve`], which maps an import specifier to
//! the id of a known node.
//!
//! Only relative specifiers (`./x`, `../x`) resolve. Alias prefixes such as
//! `@/` are intentionally left unresolved, and bare package names are
//! treated as external dependencies.

use miette::Diagnostic;
use std::collections::{HashMap, HashSet};
use tracing::trace;

use crate::config::{AnalyzerConfig, DEFAULT_ALIAS_PREFIXES, DEFAULT_EXTENSIONS};
use crate::types::DependencyNode;

/// Errors raised while building a graph.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum GraphError {
    /// A node with the same id was already inserted.
    #[error("duplicate module id: {0}")]
    #[diagnostic(
        code(arch_health::graph::duplicate),
        help("source roots probably overlap; each file must be scanned once")
    )]
    DuplicateNode(String),
}

/// Settings that drive import resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Extensions tried when a specifier omits one, in order, without dots.
    pub extensions: Vec<String>,
    /// Specifier prefixes that are never resolved.
    pub alias_prefixes: Vec<String>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            alias_prefixes: DEFAULT_ALIAS_PREFIXES
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl From<&AnalyzerConfig> for ResolveOptions {
    fn from(config: &AnalyzerConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
            alias_prefixes: config.alias_prefixes.clone(),
        }
    }
}

/// In-memory registry of analyzed modules.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<DependencyNode>,
    index: HashMap<String, usize>,
    options: ResolveOptions,
}

impl DependencyGraph {
    /// Creates an empty graph with default resolution options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with the given resolution options.
    #[must_use]
    pub fn with_options(options: ResolveOptions) -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            options,
        }
    }

    /// Adds a node. Ids are write-once.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateNode`] if the id is already present.
    pub fn insert(&mut self, node: DependencyNode) -> Result<(), GraphError> {
        if self.index.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &DependencyNode> {
        self.nodes.iter()
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&DependencyNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Returns true if a node with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolution options in use.
    #[must_use]
    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Maps an import specifier written in `from_id` to a known node id.
    ///
    /// Candidates for a relative specifier are tried in order: the exact
    /// path, the path with each extension appended, then `index.<ext>`
    /// inside the path treated as a directory.
    #[must_use]
    pub fn resolve(&self, from_id: &str, specifier: &str) -> Option<&str> {
        if is_relative(specifier) {
            let target = join_relative(from_id, specifier)?;
            return self
                .candidates(&target)
                .into_iter()
                .find_map(|candidate| self.index.get_key_value(&candidate))
                .map(|(id, _)| id.as_str());
        }

        if self
            .options
            .alias_prefixes
            .iter()
            .any(|p| specifier.starts_with(p.as_str()))
        {
            trace!("{from_id}: alias import '{specifier}' left unresolved");
        }

        None
    }

    /// Distinct resolved targets of one node, in order of first import.
    #[must_use]
    pub fn resolved_targets(&self, id: &str) -> Vec<&str> {
        let Some(node) = self.get(id) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        node.imports
            .iter()
            .filter_map(|spec| self.resolve(id, spec))
            .filter(|target| seen.insert(*target))
            .collect()
    }

    /// Every resolved edge, one per import statement, in node then import order.
    #[must_use]
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.nodes
            .iter()
            .flat_map(|node| {
                node.imports
                    .iter()
                    .filter_map(|spec| self.resolve(&node.id, spec))
                    .map(|target| (node.id.as_str(), target))
            })
            .collect()
    }

    fn candidates(&self, target: &str) -> Vec<String> {
        let exts = &self.options.extensions;
        let mut out = Vec::with_capacity(exts.len() * 2 + 1);

        if !target.is_empty() {
            out.push(target.to_string());
            out.extend(exts.iter().map(|ext| format!("{target}.{ext}")));
        }

        let dir = if target.is_empty() {
            String::new()
        } else {
            format!("{target}/")
        };
        out.extend(exts.iter().map(|ext| format!("{dir}index.{ext}")));

        out
    }
}

fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Joins a relative specifier onto the directory of `from_id`, normalizing
/// `.` and `..` lexically. Returns `None` when the path climbs above the base.
fn join_relative(from_id: &str, specifier: &str) -> Option<String> {
    let mut parts: Vec<&str> = from_id.split('/').collect();
    parts.pop();

    for segment in specifier.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            s => parts.push(s),
        }
    }

    Some(parts.join("/"))
}
