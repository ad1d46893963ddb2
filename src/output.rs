use crate::cli::OutputFormat;
use crate::pipeline::GraphReport;

/// Render the report as text for the selected output format.
pub fn format_report(report: &GraphReport, format: &OutputFormat) -> anyhow::Result<String> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Diagram => report.diagram_text.clone(),
        OutputFormat::Compact => {
            let mut lines = vec![format!(
                "Scanned {} files: {} edges between {} nodes",
                report.file_count, report.edge_count, report.node_count
            )];
            lines.push(format!(
                "  {} ESM, {} CJS imports",
                report.esm_edge_count, report.cjs_edge_count
            ));
            if report.rendered_node_count < report.node_count {
                lines.push(format!(
                    "  diagram shows {} of {} nodes",
                    report.rendered_node_count, report.node_count
                ));
            }
            lines.push(String::new());
            lines.push(report.diagram_text.clone());
            lines.join("\n")
        }
    };
    Ok(text)
}

/// Notice listing the skipped files, or `None` if every file was scanned.
pub fn format_skipped(report: &GraphReport) -> Option<String> {
    if report.skipped_files.is_empty() {
        return None;
    }
    let mut lines = vec![format!(
        "  {} files skipped (fetch failed)",
        report.skipped_files.len()
    )];
    lines.extend(
        report
            .skipped_files
            .iter()
            .map(|skipped| format!("    {}: {}", skipped.path, skipped.reason)),
    );
    Some(lines.join("\n"))
}

/// Print the report to stdout.
///
/// If any file was skipped, the notice is written to **stderr** so that
/// the stdout stream remains clean for downstream JSON consumers.
pub fn print_report(report: &GraphReport, format: &OutputFormat) -> anyhow::Result<()> {
    println!("{}", format_report(report, format)?);
    if let Some(notice) = format_skipped(report) {
        eprintln!("{notice}");
    }
    Ok(())
}
