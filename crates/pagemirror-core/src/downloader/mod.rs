//! Concurrent asset download coordinator.
//!
//! Every job is fetched and written independently: one tokio task per job,
//! with the blocking curl transfer and file write on the blocking pool. A
//! failing job only produces a failed outcome; the coordinator returns once
//! every job has one. When `max_concurrent` is set, a semaphore bounds the
//! number of transfers in flight.

mod fetch;

pub use fetch::{CurlFetcher, FetchError, Fetcher};
pub(crate) use fetch::get;

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::storage::{self, StorageError};

/// One asset to fetch and persist.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub url: String,
    /// Relative path as written into the document.
    pub local_path: String,
    /// Absolute filesystem target (`root` joined with `local_path`).
    pub target: PathBuf,
}

/// Result of one job. Produced exactly once; jobs are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadOutcome {
    pub url: String,
    pub local_path: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DownloadOutcome {
    fn ok(job: &DownloadJob) -> Self {
        Self {
            url: job.url.clone(),
            local_path: job.local_path.clone(),
            success: true,
            error: None,
        }
    }

    fn failed(job: &DownloadJob, error: String) -> Self {
        Self {
            url: job.url.clone(),
            local_path: job.local_path.clone(),
            success: false,
            error: Some(error),
        }
    }
}

/// Aggregate counts for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DownloadSummary {
    pub queued: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl DownloadSummary {
    pub fn from_outcomes(outcomes: &[DownloadOutcome]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.success).count();
        Self {
            queued: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum JobError {
    #[error("fetch: {0}")]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn fetch_and_persist<F: Fetcher + ?Sized>(fetcher: &F, job: &DownloadJob) -> Result<usize, JobError> {
    let bytes = fetcher.fetch(&job.url)?;
    storage::write_file(&job.target, &bytes)?;
    Ok(bytes.len())
}

/// Runs all `jobs` to completion and returns their outcomes in job order.
///
/// `max_concurrent` of `None` (or zero) dispatches everything at once.
pub async fn download_all<F: Fetcher>(
    jobs: Vec<DownloadJob>,
    fetcher: Arc<F>,
    max_concurrent: Option<usize>,
) -> (Vec<DownloadOutcome>, DownloadSummary) {
    let limiter = max_concurrent
        .filter(|n| *n > 0)
        .map(|n| Arc::new(Semaphore::new(n)));

    tracing::info!(queued = jobs.len(), bound = ?max_concurrent, "dispatching asset downloads");

    let mut join_set = JoinSet::new();
    for (index, job) in jobs.iter().cloned().enumerate() {
        let fetcher = Arc::clone(&fetcher);
        let limiter = limiter.clone();
        join_set.spawn(async move {
            let _permit = match limiter {
                Some(sem) => sem.acquire_owned().await.ok(),
                None => None,
            };
            let res = tokio::task::spawn_blocking({
                let job = job.clone();
                move || fetch_and_persist(fetcher.as_ref(), &job)
            })
            .await;
            let outcome = match res {
                Ok(Ok(bytes)) => {
                    tracing::debug!(url = %job.url, path = %job.local_path, bytes, "asset saved");
                    DownloadOutcome::ok(&job)
                }
                Ok(Err(e)) => {
                    tracing::warn!(url = %job.url, path = %job.local_path, "asset failed: {}", e);
                    DownloadOutcome::failed(&job, e.to_string())
                }
                Err(e) => {
                    tracing::warn!(url = %job.url, "asset task panicked: {}", e);
                    DownloadOutcome::failed(&job, format!("task failed: {}", e))
                }
            };
            (index, outcome)
        });
    }

    let mut slots: Vec<Option<DownloadOutcome>> = vec![None; jobs.len()];
    while let Some(res) = join_set.join_next().await {
        match res {
            Ok((index, outcome)) => slots[index] = Some(outcome),
            Err(e) => tracing::warn!("download task join: {}", e),
        }
    }

    let outcomes: Vec<DownloadOutcome> = slots
        .into_iter()
        .zip(jobs.iter())
        .map(|(slot, job)| {
            slot.unwrap_or_else(|| DownloadOutcome::failed(job, "task did not complete".to_string()))
        })
        .collect();
    let summary = DownloadSummary::from_outcomes(&outcomes);
    tracing::info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "asset downloads finished"
    );
    (outcomes, summary)
}
