pub mod dot;
pub mod mermaid;
pub mod model;

use std::collections::HashSet;

use crate::graph::DependencyGraph;

use model::{DiagramFormat, NodeOrder, RenderedGraph};

/// Select at most `max_nodes` nodes and the edges between them.
///
/// Steps:
/// 1. Order the node set (`Path`: lexicographic; `Insertion`: first-seen).
/// 2. Keep the first `max_nodes`.
/// 3. Keep only edges whose `from` and `to` are both kept, in production order.
pub fn truncate(graph: &DependencyGraph, max_nodes: usize, order: NodeOrder) -> RenderedGraph {
    let mut nodes: Vec<&str> = graph.nodes().collect();
    if order == NodeOrder::Path {
        nodes.sort_unstable();
    }

    let dropped_nodes = nodes.len().saturating_sub(max_nodes);
    nodes.truncate(max_nodes);

    if dropped_nodes > 0 {
        tracing::info!(
            kept = nodes.len(),
            dropped = dropped_nodes,
            "node cap reached, diagram truncated"
        );
    }

    let keep: HashSet<&str> = nodes.iter().copied().collect();
    let edges = graph
        .edges()
        .filter(|e| keep.contains(e.from.as_str()) && keep.contains(e.to.as_str()))
        .collect();

    RenderedGraph {
        nodes: nodes.into_iter().map(str::to_owned).collect(),
        edges,
        dropped_nodes,
    }
}

/// Serialize the rendered graph in the requested dialect.
pub fn render(rendered: &RenderedGraph, format: DiagramFormat) -> String {
    if rendered.dropped_nodes > rendered.nodes.len() {
        tracing::warn!(
            "Large graph: {} of {} nodes were left out of the diagram. \
             Consider raising max_nodes or adding exclude patterns.",
            rendered.dropped_nodes,
            rendered.dropped_nodes + rendered.nodes.len()
        );
    }

    match format {
        DiagramFormat::Mermaid => mermaid::render_mermaid(rendered),
        DiagramFormat::Dot => dot::render_dot(rendered),
    }
}
