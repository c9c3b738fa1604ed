//! One scheduler tick for one task, driven through a record loader.

use crate::scheduler::{
    domain::{LastRecord, Message, MessageKind, Runner, StatusCode, TaskRef},
    ports::{RecordLoader, RecordLoaderResult},
};
use futures::FutureExt;
use mockable::Clock;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Payload recorded when a job panics.
const PANICKED_JOB_MESSAGE: &str = "job panicked";

/// What happened during a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    /// The task was already in progress; the tick was recorded as skipped.
    Skipped(Option<LastRecord>),
    /// The job ran and reported an outcome.
    Finished(LastRecord),
    /// The job ended without reporting an outcome.
    Exited(Option<LastRecord>),
}

impl RunReport {
    /// Returns the record persisted for this tick, if any.
    #[must_use]
    pub const fn record(&self) -> Option<&LastRecord> {
        match self {
            Self::Skipped(record) | Self::Exited(record) => record.as_ref(),
            Self::Finished(record) => Some(record),
        }
    }
}

/// Drives the run-state transitions of a task around its job.
///
/// Cron timing lives with the caller; the coordinator only decides, for one
/// tick, whether to skip or to run, and records the outcome.
#[derive(Clone)]
pub struct TaskRunCoordinator<L, C>
where
    L: RecordLoader,
    C: Clock + Send + Sync,
{
    loader: Arc<L>,
    clock: Arc<C>,
}

impl<L, C> TaskRunCoordinator<L, C>
where
    L: RecordLoader,
    C: Clock + Send + Sync,
{
    /// Creates a coordinator over an explicit loader instance.
    #[must_use]
    pub const fn new(loader: Arc<L>, clock: Arc<C>) -> Self {
        Self { loader, clock }
    }

    /// Returns the loader used by this coordinator.
    #[must_use]
    pub const fn loader(&self) -> &Arc<L> {
        &self.loader
    }

    /// Runs one tick of `task`.
    ///
    /// The job resolves to `Some(message)` with its outcome, or `None` when
    /// its worker went away without reporting. A job that panics is recorded
    /// as exited and the panic is not propagated.
    ///
    /// # Errors
    ///
    /// Returns the loader's error when reading or persisting run state
    /// fails. The job is not run if the start transition cannot be written.
    pub async fn run_once<F, Fut>(&self, task: &TaskRef, job: F) -> RecordLoaderResult<RunReport>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Option<Message>> + Send,
    {
        let mut runner = Runner::new(task.clone());

        let previous = self.loader.get_record(task).await?;
        if previous.is_some_and(|record| record.status_code() == StatusCode::Progress) {
            tracing::debug!(identity = %task.identity(), "task still in progress; skipping tick");
            return self.skip(&runner).await;
        }

        runner.mark_started(self.clock.utc().timestamp());
        if self.loader.do_start_progress(&runner).await?.is_none() {
            return self.skip(&runner).await;
        }

        let outcome = match AssertUnwindSafe(async move { job().await })
            .catch_unwind()
            .await
        {
            Ok(Some(outcome)) => outcome,
            Ok(None) => return self.exit(&runner).await,
            Err(_) => {
                tracing::error!(identity = %task.identity(), task = %task, "task job panicked");
                runner.mark_finished(Message::with_text(
                    MessageKind::Exited,
                    PANICKED_JOB_MESSAGE,
                ));
                return self.exit(&runner).await;
            }
        };
        runner.mark_finished(outcome);
        let started_at = runner.started_at().unwrap_or_default();
        let record = self.loader.finish(started_at, &runner).await?;
        Ok(RunReport::Finished(record))
    }

    async fn exit(&self, runner: &Runner) -> RecordLoaderResult<RunReport> {
        let record = self.loader.store_exit_runner(runner).await?;
        Ok(RunReport::Exited(record))
    }

    async fn skip(&self, runner: &Runner) -> RecordLoaderResult<RunReport> {
        let record = self.loader.do_skip_progress(runner).await?;
        Ok(RunReport::Skipped(record))
    }
}
