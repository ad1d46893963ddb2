use std::fmt::Write;

use crate::export::model::RenderedGraph;

/// Sanitize a path for use as a DOT node ID.
///
/// Replaces characters outside `[A-Za-z0-9_]` with `_`. Prepends `n` if the
/// result starts with a digit (DOT IDs must not start with a digit).
pub fn sanitize_dot_id(s: &str) -> String {
    let mut result: String = s
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, 'n');
    }
    if result.is_empty() {
        result = "node".to_string();
    }
    result
}

/// Escape a string for a double-quoted DOT label.
fn escape_dot_label(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render the graph as a left-to-right Graphviz digraph.
///
/// Nodes are declared with their full path as label so that sanitized IDs
/// stay readable.
pub fn render_dot(rendered: &RenderedGraph) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "digraph dependencies {{");
    let _ = writeln!(out, "  rankdir=LR;");
    let _ = writeln!(out, "  node [shape=box];");
    for node in &rendered.nodes {
        let _ = writeln!(
            out,
            "  {} [label=\"{}\"];",
            sanitize_dot_id(node),
            escape_dot_label(node)
        );
    }
    for edge in &rendered.edges {
        let _ = writeln!(
            out,
            "  {} -> {};",
            sanitize_dot_id(&edge.from),
            sanitize_dot_id(&edge.to)
        );
    }
    out.push('}');
    out
}
