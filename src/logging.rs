use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` wins when set. Otherwise only warnings are shown, or this
/// crate's debug events too when `verbose` is true. Calling twice is a no-op.
pub fn init(verbose: bool) {
    let default_filter = if verbose {
        "warn,repo_graph=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        // No colour codes when stderr is piped into a file or CI log.
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}
