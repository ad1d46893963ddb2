use std::sync::Arc;

use serde::Serialize;

use crate::config::GraphSettings;
use crate::error::GraphError;
use crate::export::model::DiagramFormat;
use crate::export::{render, truncate};
use crate::fetcher::{cap_files, fetch_and_scan};
use crate::graph::assemble;
use crate::parser::imports::ImportKind;
use crate::parser::languages::has_source_extension;
use crate::source::{FileRef, FileSource};

/// Result of one graph build, in the shape returned to callers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphReport {
    /// Edges in the full (untruncated) graph, parallel edges included.
    pub edge_count: usize,
    /// Edges produced by `import` statements.
    pub esm_edge_count: usize,
    /// Edges produced by `require(...)` calls.
    pub cjs_edge_count: usize,
    /// Files selected for fetching after filtering and the file cap.
    pub file_count: usize,
    /// Selected files whose content could not be fetched.
    pub skipped_count: usize,
    /// The files behind `skipped_count`, in selection order.
    pub skipped_files: Vec<SkippedFile>,
    /// Nodes in the full graph.
    pub node_count: usize,
    /// Nodes that made it into the diagram.
    pub rendered_node_count: usize,
    pub diagram_text: String,
    /// The selected files.
    pub sample_files: Vec<FileRef>,
}

/// A selected file that contributed nothing to the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Build the dependency graph of the repository behind `source` and render it.
///
/// Steps:
/// 1. Enumerate files (a failure here aborts the build).
/// 2. Keep allowlisted source extensions, drop excluded paths, take the first `max_files`.
/// 3. Fetch and scan every selected file concurrently; failed files are skipped.
/// 4. Assemble edges from relative imports.
/// 5. Truncate to `max_nodes` and emit the diagram.
pub async fn build_report(
    source: Arc<dyn FileSource>,
    settings: &GraphSettings,
    format: DiagramFormat,
) -> Result<GraphReport, GraphError> {
    let listed = source.enumerate().await?;
    let listed_count = listed.len();

    let candidates = select_source_files(listed, settings);
    let candidate_count = candidates.len();
    let selected = cap_files(candidates, settings.max_files);
    tracing::info!(
        listed = listed_count,
        candidates = candidate_count,
        selected = selected.len(),
        "enumerated repository files"
    );

    let batch = fetch_and_scan(source, selected.clone(), settings.concurrency).await;
    let skipped_files: Vec<SkippedFile> = batch
        .skipped()
        .map(|(file, reason)| SkippedFile {
            path: file.path.clone(),
            reason: reason.to_string(),
        })
        .collect();
    if !skipped_files.is_empty() {
        tracing::info!(skipped = skipped_files.len(), "some files could not be fetched");
    }

    let graph = assemble(batch.scanned());
    let rendered = truncate(&graph, settings.max_nodes, settings.node_order);
    let diagram_text = render(&rendered, format);

    Ok(GraphReport {
        edge_count: graph.edge_count(),
        esm_edge_count: graph.edge_count_by_kind(ImportKind::Esm),
        cjs_edge_count: graph.edge_count_by_kind(ImportKind::Cjs),
        file_count: selected.len(),
        skipped_count: skipped_files.len(),
        skipped_files,
        node_count: graph.node_count(),
        rendered_node_count: rendered.nodes.len(),
        diagram_text,
        sample_files: selected,
    })
}

/// Keep files with an allowlisted extension that match no exclude pattern.
fn select_source_files(files: Vec<FileRef>, settings: &GraphSettings) -> Vec<FileRef> {
    let patterns: Vec<glob::Pattern> = settings
        .exclude
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(err) => {
                tracing::warn!(pattern = %p, "ignoring invalid exclude pattern: {err}");
                None
            }
        })
        .collect();

    files
        .into_iter()
        .filter(|f| has_source_extension(&f.path, &settings.extensions))
        .filter(|f| !is_excluded(&f.path, &patterns))
        .collect()
}

/// True if the whole path, or any single component of it, matches a pattern.
fn is_excluded(path: &str, patterns: &[glob::Pattern]) -> bool {
    patterns
        .iter()
        .any(|p| p.matches(path) || path.split('/').any(|component| p.matches(component)))
}
