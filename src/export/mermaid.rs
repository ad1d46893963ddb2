use crate::export::model::RenderedGraph;

/// Header line of the emitted flowchart.
pub const MERMAID_HEADER: &str = "graph LR";

/// Map a path to a Mermaid node identifier.
///
/// Every character outside `[A-Za-z0-9_]` becomes `_`. Distinct paths can map
/// to the same identifier (`a-b.ts` and `a_b.ts`); such nodes merge in the
/// rendered diagram.
pub fn mermaid_id(path: &str) -> String {
    path.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Render the graph as a left-to-right Mermaid flowchart, one line per edge.
pub fn render_mermaid(rendered: &RenderedGraph) -> String {
    let mut lines = Vec::with_capacity(rendered.edges.len() + 1);
    lines.push(MERMAID_HEADER.to_string());
    for edge in &rendered.edges {
        lines.push(format!("  {}-->{}", mermaid_id(&edge.from), mermaid_id(&edge.to)));
    }
    lines.join("\n")
}
