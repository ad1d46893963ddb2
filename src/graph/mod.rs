pub mod edge;

use std::collections::HashMap;

use petgraph::Directed;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};

use crate::parser::imports::{ImportKind, ImportRecord, is_internal};
use crate::resolver::{normalize_path, resolve};

use edge::Edge;

/// The file-level dependency graph: a directed petgraph StableGraph keyed by
/// repository-relative path, with an O(1) path lookup index.
///
/// Nodes are created the first time a path appears as an edge endpoint, so node
/// indices follow first-seen order. Parallel edges are kept: every import
/// occurrence is one edge.
pub struct DependencyGraph {
    /// Node weight is the path; edge weight is the import occurrence that produced it.
    pub graph: StableGraph<String, ImportRecord, Directed>,
    /// Maps paths to their node indices.
    pub path_index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            path_index: HashMap::new(),
        }
    }

    /// Add a path node, returning the existing index if the path was seen before.
    pub fn add_node(&mut self, path: &str) -> NodeIndex {
        if let Some(&existing) = self.path_index.get(path) {
            return existing;
        }
        let idx = self.graph.add_node(path.to_owned());
        self.path_index.insert(path.to_owned(), idx);
        idx
    }

    /// Append one `from -> to` edge. Never merges with an existing edge.
    pub fn add_import(&mut self, from: &str, to: &str, import: ImportRecord) {
        let from_idx = self.add_node(from);
        let to_idx = self.add_node(to);
        self.graph.add_edge(from_idx, to_idx, import);
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of edges produced by imports of the given kind.
    pub fn edge_count_by_kind(&self, kind: ImportKind) -> usize {
        self.graph
            .edge_references()
            .filter(|e| e.weight().kind == kind)
            .count()
    }

    /// Node paths in first-seen order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.node_indices().map(|idx| self.graph[idx].as_str())
    }

    /// Edges in the order they were added.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.graph.edge_references().map(|e| Edge {
            from: self.graph[e.source()].clone(),
            to: self.graph[e.target()].clone(),
        })
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the graph from scanned files, given as `(path, imports)` pairs.
///
/// Only relative specifiers produce edges: `from` is the normalized importer
/// path and `to` is the specifier resolved against it.
///
/// A specifier that resolves to the repository root itself (`..` or `.` from a
/// top-level file) yields an empty path. It is dropped rather than kept as an
/// edge to `""`, which would emit a dangling `a_ts-->` line, so such imports
/// are not counted in [`DependencyGraph::edge_count`].
pub fn assemble<'a, I>(files: I) -> DependencyGraph
where
    I: IntoIterator<Item = (&'a str, &'a [ImportRecord])>,
{
    let mut graph = DependencyGraph::new();
    for (path, imports) in files {
        let from = normalize_path(path);
        for import in imports {
            if !is_internal(&import.specifier) {
                continue;
            }
            let to = resolve(&from, &import.specifier);
            if to.is_empty() {
                tracing::debug!(file = %from, specifier = %import.specifier, "import resolves to repository root, skipped");
                continue;
            }
            graph.add_import(&from, &to, import.clone());
        }
    }
    graph
}
