use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::error::SkipReason;
use crate::parser::imports::{ImportRecord, extract_internal_imports};
use crate::source::{FileRef, FileSource};

/// What happened to one file of the batch.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Content was retrieved; `imports` holds its relative import occurrences in source order.
    Scanned {
        file: FileRef,
        imports: Vec<ImportRecord>,
    },
    /// Retrieval failed; the file contributes nothing.
    Skipped { file: FileRef, reason: SkipReason },
}

/// Result of a fetch-and-scan fan-out, one outcome per capped file.
#[derive(Debug, Default)]
pub struct FetchBatch {
    pub outcomes: Vec<FetchOutcome>,
}

impl FetchBatch {
    /// `(path, imports)` for every successfully scanned file.
    pub fn scanned(&self) -> impl Iterator<Item = (&str, &[ImportRecord])> + '_ {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FetchOutcome::Scanned { file, imports } => Some((file.path.as_str(), imports.as_slice())),
            FetchOutcome::Skipped { .. } => None,
        })
    }

    /// Every file that could not be fetched, with the reason.
    pub fn skipped(&self) -> impl Iterator<Item = (&FileRef, &SkipReason)> + '_ {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FetchOutcome::Skipped { file, reason } => Some((file, reason)),
            FetchOutcome::Scanned { .. } => None,
        })
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped().count()
    }
}

/// Keep the first `max_files` files of the enumeration, in enumeration order.
pub fn cap_files(mut files: Vec<FileRef>, max_files: usize) -> Vec<FileRef> {
    files.truncate(max_files);
    files
}

/// Fetch and scan the files concurrently.
///
/// Every file gets its own task; at most `concurrency` of them hold a fetch in
/// flight at once. All tasks are awaited before returning, and a failure in
/// one file (including a panicked task) becomes a [`FetchOutcome::Skipped`]
/// without affecting the rest. Outcomes are reported in input order.
pub async fn fetch_and_scan(
    source: Arc<dyn FileSource>,
    files: Vec<FileRef>,
    concurrency: usize,
) -> FetchBatch {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));

    let mut tasks = Vec::with_capacity(files.len());
    for file in files {
        let source = Arc::clone(&source);
        let permits = Arc::clone(&permits);
        let task_file = file.clone();
        let task = tokio::spawn(async move {
            let _permit = permits.acquire_owned().await.ok();
            scan_one(source.as_ref(), task_file).await
        });
        tasks.push((file, task));
    }

    let mut outcomes = Vec::with_capacity(tasks.len());
    for (file, task) in tasks {
        match task.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                tracing::warn!(path = %file.path, "fetch task failed: {e}");
                outcomes.push(FetchOutcome::Skipped {
                    file,
                    reason: SkipReason::Aborted(e.to_string()),
                });
            }
        }
    }

    FetchBatch { outcomes }
}

async fn scan_one(source: &dyn FileSource, file: FileRef) -> FetchOutcome {
    let fetched = source.fetch(&file).await;
    match fetched {
        Ok(text) => {
            let imports = extract_internal_imports(&text)
                .map(|import| import.to_record())
                .collect();
            FetchOutcome::Scanned { file, imports }
        }
        Err(reason) => {
            tracing::debug!(path = %file.path, %reason, "skipping file");
            FetchOutcome::Skipped { file, reason }
        }
    }
}
