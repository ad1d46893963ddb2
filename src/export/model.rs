use serde::Deserialize;

use crate::graph::edge::Edge;

/// Diagram dialect for the emitted text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum DiagramFormat {
    /// Mermaid `graph LR` flowchart (default). Renders in markdown and browsers.
    #[default]
    Mermaid,
    /// Graphviz DOT digraph, left to right.
    Dot,
}

/// Order in which nodes compete for the render cap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeOrder {
    /// Lexicographic by path (default). Same input, same diagram.
    #[default]
    Path,
    /// First-seen order while assembling edges.
    Insertion,
}

/// The bounded subgraph that gets rendered.
#[derive(Debug, Clone, Default)]
pub struct RenderedGraph {
    /// Selected node paths, in selection order.
    pub nodes: Vec<String>,
    /// Edges whose endpoints are both selected, in production order.
    pub edges: Vec<Edge>,
    /// Number of graph nodes left out by the cap.
    pub dropped_nodes: usize,
}
