use std::path::Path;

use serde::Deserialize;

use crate::export::model::NodeOrder;
use crate::parser::languages::DEFAULT_EXTENSIONS;

/// File name looked up in the working directory (or the local target root).
pub const CONFIG_FILE_NAME: &str = "repo-graph.toml";

/// Default number of enumerated files that are fetched and scanned.
pub const DEFAULT_MAX_FILES: usize = 60;

/// Default number of nodes kept in the rendered diagram.
pub const DEFAULT_MAX_NODES: usize = 80;

/// Configuration loaded from `repo-graph.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct RepoGraphConfig {
    /// Maximum number of enumerated files to fetch.
    pub max_files: Option<usize>,
    /// Maximum number of nodes kept for rendering.
    pub max_nodes: Option<usize>,
    /// Number of fetches in flight at once. Defaults to `max_files`.
    pub concurrency: Option<usize>,
    /// Ordering applied to nodes before the render cap.
    pub node_order: Option<NodeOrder>,
    /// Source file extensions to scan (without the dot).
    pub extensions: Option<Vec<String>>,
    /// Glob patterns for repository paths to leave out before the file cap.
    pub exclude: Option<Vec<String>>,
    /// GitHub endpoint settings.
    #[serde(default)]
    pub github: GithubConfig,
}

/// The `[github]` table.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct GithubConfig {
    pub api_base: Option<String>,
    pub raw_base: Option<String>,
    /// Git reference to list and fetch (branch, tag, or sha).
    pub reference: Option<String>,
    /// Environment variable holding a bearer token.
    pub token_env: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl GithubConfig {
    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or("https://api.github.com")
    }

    pub fn raw_base(&self) -> &str {
        self.raw_base
            .as_deref()
            .unwrap_or("https://raw.githubusercontent.com")
    }

    pub fn reference(&self) -> &str {
        self.reference.as_deref().unwrap_or("HEAD")
    }

    pub fn token_env(&self) -> &str {
        self.token_env.as_deref().unwrap_or("GITHUB_TOKEN")
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(30)
    }
}

impl RepoGraphConfig {
    /// Load configuration from `repo-graph.toml` in the given root directory.
    ///
    /// Returns a default (empty) configuration if the file does not exist or cannot be parsed.
    pub fn load(root: &Path) -> Self {
        Self::load_file(&root.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from an explicit file path, with the same fallback rules as [`load`].
    ///
    /// [`load`]: RepoGraphConfig::load
    pub fn load_file(config_path: &Path) -> Self {
        if !config_path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(config_path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!(
                        path = %config_path.display(),
                        "failed to parse config: {err}. Using defaults."
                    );
                    Self::default()
                }
            },
            Err(err) => {
                tracing::warn!(
                    path = %config_path.display(),
                    "failed to read config: {err}. Using defaults."
                );
                Self::default()
            }
        }
    }
}

/// Effective settings for one graph build: config values with CLI overrides applied.
#[derive(Debug, Clone)]
pub struct GraphSettings {
    pub max_files: usize,
    pub max_nodes: usize,
    /// Always at least 1.
    pub concurrency: usize,
    pub node_order: NodeOrder,
    pub extensions: Vec<String>,
    pub exclude: Vec<String>,
    pub github: GithubConfig,
}

/// Values passed on the command line; `None` leaves the config value in place.
#[derive(Debug, Default, Clone)]
pub struct SettingsOverrides {
    pub max_files: Option<usize>,
    pub max_nodes: Option<usize>,
    pub concurrency: Option<usize>,
    pub node_order: Option<NodeOrder>,
}

impl GraphSettings {
    pub fn resolve(config: RepoGraphConfig, overrides: &SettingsOverrides) -> Self {
        let max_files = overrides
            .max_files
            .or(config.max_files)
            .unwrap_or(DEFAULT_MAX_FILES);
        let max_nodes = overrides
            .max_nodes
            .or(config.max_nodes)
            .unwrap_or(DEFAULT_MAX_NODES);
        let concurrency = overrides
            .concurrency
            .or(config.concurrency)
            .unwrap_or(max_files)
            .max(1);
        let node_order = overrides
            .node_order
            .or(config.node_order)
            .unwrap_or_default();
        let extensions = config
            .extensions
            .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect());

        Self {
            max_files,
            max_nodes,
            concurrency,
            node_order,
            extensions,
            exclude: config.exclude.unwrap_or_default(),
            github: config.github,
        }
    }
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self::resolve(RepoGraphConfig::default(), &SettingsOverrides::default())
    }
}
