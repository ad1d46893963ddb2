//! Where file listings and file contents come from.
//!
//! [`FileSource`] is the boundary between the graph pipeline and the outside
//! world. [`github::GitHubSource`] talks to the GitHub REST API and raw content
//! host; [`local::LocalSource`] reads a checked-out directory.

pub mod github;
pub mod local;

use std::future::Future;
use std::pin::Pin;

use serde::Serialize;

use crate::error::{GraphError, SkipReason};

/// Boxed future type alias used by [`FileSource`] to keep the trait dyn-compatible.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One enumerated source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    /// Repository-relative, forward-slash path.
    pub path: String,
    /// Opaque handle understood by the source that produced it (a URL or a filesystem path).
    pub content_locator: String,
}

/// Lists repository files and retrieves their text.
pub trait FileSource: Send + Sync {
    /// Lists every file object at the configured reference, in a stable order.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] if the listing cannot be produced. This aborts the run.
    fn enumerate(&self) -> SourceFuture<'_, Result<Vec<FileRef>, GraphError>>;

    /// Retrieves the text content of one enumerated file.
    ///
    /// # Errors
    ///
    /// Returns a [`SkipReason`]; the caller skips the file and carries on.
    fn fetch<'a>(&'a self, file: &'a FileRef) -> SourceFuture<'a, Result<String, SkipReason>>;
}
