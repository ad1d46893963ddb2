mod cli;
mod config;
mod error;
mod export;
mod fetcher;
mod graph;
mod logging;
mod output;
mod parser;
mod pipeline;
mod resolver;
mod source;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use config::{GraphSettings, RepoGraphConfig, SettingsOverrides};
use source::FileSource;
use source::github::{GitHubSource, RepoRef};
use source::local::LocalSource;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Graph {
            target,
            local,
            format,
            diagram,
            order,
            max_files,
            max_nodes,
            concurrency,
            config,
        } => {
            let file_config = match (&config, local) {
                (Some(path), _) => RepoGraphConfig::load_file(path),
                (None, true) => RepoGraphConfig::load(Path::new(&target)),
                (None, false) => RepoGraphConfig::load(Path::new(".")),
            };
            let overrides = SettingsOverrides {
                max_files,
                max_nodes,
                concurrency,
                node_order: order,
            };
            let settings = GraphSettings::resolve(file_config, &overrides);

            let source: Arc<dyn FileSource> = if local {
                Arc::new(LocalSource::new(&target))
            } else {
                // Reject a malformed URL before any network traffic.
                let repo = RepoRef::parse(&target)?;
                Arc::new(GitHubSource::new(repo, &settings.github)?)
            };

            let report = pipeline::build_report(source, &settings, diagram).await?;
            output::print_report(&report, &format)?;
        }
    }

    Ok(())
}
