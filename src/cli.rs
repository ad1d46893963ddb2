use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::export::model::{DiagramFormat, NodeOrder};

/// Map the relative imports of a TypeScript/JavaScript repository.
///
/// repo-graph lists a repository's source files, scans them for relative
/// `import`/`require` specifiers, and renders the resulting file dependency
/// graph as a Mermaid (or DOT) diagram.
#[derive(Parser, Debug)]
#[command(
    name = "repo-graph",
    version,
    about,
    long_about = None,
    propagate_version = true,
)]
pub struct Cli {
    /// Emit debug-level log events on stderr (RUST_LOG takes precedence when set).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for the graph report.
#[derive(Clone, Debug, ValueEnum, Default)]
pub enum OutputFormat {
    /// One-line summary followed by the diagram (default).
    #[default]
    Compact,
    /// Structured JSON object suitable for programmatic consumption.
    Json,
    /// The diagram text only, ready to paste into a renderer.
    Diagram,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the relative-import dependency graph of a repository.
    ///
    /// TARGET is a GitHub URL (https://github.com/<owner>/<repo>) unless --local is given,
    /// in which case it is a directory on disk.
    Graph {
        /// GitHub repository URL, or a directory path with --local.
        target: String,

        /// Treat TARGET as a local directory instead of a GitHub URL.
        #[arg(long)]
        local: bool,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Compact)]
        format: OutputFormat,

        /// Diagram dialect.
        #[arg(long, value_enum, default_value_t = DiagramFormat::Mermaid)]
        diagram: DiagramFormat,

        /// Node order applied before the node cap (overrides config).
        #[arg(long, value_enum)]
        order: Option<NodeOrder>,

        /// Maximum number of source files to fetch (overrides config; default 60).
        #[arg(long)]
        max_files: Option<usize>,

        /// Maximum number of nodes in the diagram (overrides config; default 80).
        #[arg(long)]
        max_nodes: Option<usize>,

        /// Number of fetches in flight at once (overrides config; default: max-files).
        #[arg(long)]
        concurrency: Option<usize>,

        /// Path to a repo-graph.toml file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
