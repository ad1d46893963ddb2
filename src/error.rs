use std::fmt;
use std::path::PathBuf;

/// Request-level failures. Any of these aborts the run before a graph is built.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The target could not be parsed into an owner/repo pair.
    #[error("invalid GitHub URL: {0}")]
    InvalidRepoUrl(String),
    /// The repository listing endpoint answered with a non-success status.
    #[error("repository listing failed ({status}): {body}")]
    Listing { status: u16, body: String },
    /// The repository listing request never produced a response.
    #[error("repository listing request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The repository listing body was not the expected JSON shape.
    #[error("unexpected repository listing payload: {0}")]
    Decode(#[from] serde_json::Error),
    /// The local root directory is missing or unreadable.
    #[error("cannot read local repository root {}: {source}", path.display())]
    LocalRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single file contributed nothing to the graph.
///
/// Per-file failures never abort the batch; they are counted and logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The content request returned a non-success HTTP status.
    Status(u16),
    /// The content request failed before a status was received.
    Transport(String),
    /// Reading a local file failed.
    Io(String),
    /// The fetch task panicked or was cancelled.
    Aborted(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Status(code) => write!(f, "HTTP status {code}"),
            SkipReason::Transport(msg) => write!(f, "transport error: {msg}"),
            SkipReason::Io(msg) => write!(f, "read error: {msg}"),
            SkipReason::Aborted(msg) => write!(f, "task aborted: {msg}"),
        }
    }
}
