//! Record loader port consumed by the scheduler.

use crate::scheduler::domain::{LastRecord, Runner, TaskRef};
use crate::scheduler::ports::TaskRecordRepositoryError;
use async_trait::async_trait;
use thiserror::Error;

/// Result type for record loader operations.
pub type RecordLoaderResult<T> = Result<T, RecordLoaderError>;

/// Errors returned by record loaders.
#[derive(Debug, Clone, Error)]
pub enum RecordLoaderError {
    /// The backing store failed.
    #[error(transparent)]
    Repository(#[from] TaskRecordRepositoryError),

    /// The loader's cache lock was poisoned.
    #[error("record cache unavailable: {0}")]
    CacheUnavailable(String),
}

/// Reads and writes the last known record of a task.
///
/// The scheduler calls one transition method per lifecycle step. Each
/// transition has persisted the new status and message by the time it
/// returns, so the next tick can make overlap decisions immediately.
#[async_trait]
pub trait RecordLoader: Send + Sync {
    /// Returns the current known record, or `None` if the task never ran.
    ///
    /// # Errors
    ///
    /// Returns [`RecordLoaderError`] when storage cannot be read.
    async fn get_record(&self, task: &TaskRef) -> RecordLoaderResult<Option<LastRecord>>;

    /// Records that the runner's worker went away. Target status: exited.
    ///
    /// Returns `None` when the runner never started.
    ///
    /// # Errors
    ///
    /// Returns [`RecordLoaderError`] when the write fails.
    async fn store_exit_runner(&self, runner: &Runner) -> RecordLoaderResult<Option<LastRecord>>;

    /// Records that a tick was skipped because a run is still in progress.
    /// Target status: skipped.
    ///
    /// # Errors
    ///
    /// Returns [`RecordLoaderError`] when the write fails.
    async fn do_skip_progress(&self, runner: &Runner) -> RecordLoaderResult<Option<LastRecord>>;

    /// Records that the runner started. Target status: progress.
    ///
    /// Returns `None` when another worker already holds the task in
    /// progress.
    ///
    /// # Errors
    ///
    /// Returns [`RecordLoaderError`] when the write fails.
    async fn do_start_progress(&self, runner: &Runner) -> RecordLoaderResult<Option<LastRecord>>;

    /// Records the runner's reported outcome and stamps the finish time.
    ///
    /// # Errors
    ///
    /// Returns [`RecordLoaderError`] when the write fails.
    async fn finish(&self, execution_time: i64, runner: &Runner) -> RecordLoaderResult<LastRecord>;
}
