//! Storage-backed record loader.

use super::reconcile::reconcile_record;
use crate::scheduler::{
    config::RecordLoaderConfig,
    domain::{
        LastRecord, Message, MessageKind, PersistedTaskRecord, Runner, StatusCode, StoredMessage,
        TaskIdentity, TaskRef,
    },
    ports::{RecordLoader, RecordLoaderError, RecordLoaderResult, TaskRecordRepository},
};
use async_trait::async_trait;
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Lifecycle transition being persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Progress,
    Skipped,
    Exited,
    Finish,
}

impl Transition {
    /// Status written for this transition. A finish keeps whatever outcome
    /// the record carries.
    const fn target_status(self, record_status: StatusCode) -> StatusCode {
        match self {
            Self::Progress => StatusCode::Progress,
            Self::Skipped => StatusCode::Skipped,
            Self::Exited => StatusCode::Exited,
            Self::Finish => record_status,
        }
    }
}

/// Record loader backed by a [`TaskRecordRepository`].
///
/// Reads reconcile legacy rows into canonical records and are cached per
/// identity for the lifetime of the loader. Transitions write through to
/// storage before updating the cache. The cache is never authoritative
/// across processes; each process must build its own loader.
pub struct EntityLoader<R, C>
where
    R: TaskRecordRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    config: RecordLoaderConfig,
    cache: RwLock<HashMap<TaskIdentity, LastRecord>>,
}

impl<R, C> EntityLoader<R, C>
where
    R: TaskRecordRepository,
    C: Clock + Send + Sync,
{
    /// Creates a loader with default configuration.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self::with_config(repository, clock, RecordLoaderConfig::default())
    }

    /// Creates a loader with explicit configuration.
    #[must_use]
    pub fn with_config(repository: Arc<R>, clock: Arc<C>, config: RecordLoaderConfig) -> Self {
        Self {
            repository,
            clock,
            config,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &RecordLoaderConfig {
        &self.config
    }

    /// Drops the cached record of a task so the next read hits storage.
    ///
    /// # Errors
    ///
    /// Returns [`RecordLoaderError::CacheUnavailable`] when the cache lock is
    /// poisoned.
    pub fn invalidate(&self, task: &TaskRef) -> RecordLoaderResult<()> {
        let mut cache = self.cache.write().map_err(cache_poisoned)?;
        cache.remove(task.identity());
        Ok(())
    }

    /// Drops every cached record.
    ///
    /// # Errors
    ///
    /// Returns [`RecordLoaderError::CacheUnavailable`] when the cache lock is
    /// poisoned.
    pub fn clear_cache(&self) -> RecordLoaderResult<()> {
        let mut cache = self.cache.write().map_err(cache_poisoned)?;
        cache.clear();
        Ok(())
    }

    fn cached(&self, identity: &TaskIdentity) -> RecordLoaderResult<Option<LastRecord>> {
        let cache = self.cache.read().map_err(cache_poisoned)?;
        Ok(cache.get(identity).cloned())
    }

    fn remember(&self, record: &LastRecord) -> RecordLoaderResult<()> {
        let mut cache = self.cache.write().map_err(cache_poisoned)?;
        cache.insert(record.task().identity().clone(), record.clone());
        Ok(())
    }

    fn now(&self) -> i64 {
        self.clock.utc().timestamp()
    }

    /// Persists a transition and caches the stored view of the record.
    ///
    /// Returns `None` when a progress claim was refused because another
    /// worker holds the task in progress.
    async fn save_record(
        &self,
        record: &LastRecord,
        transition: Transition,
    ) -> RecordLoaderResult<Option<LastRecord>> {
        let task = record.task();
        let status = transition.target_status(record.status_code());
        let mut row = self
            .repository
            .find_by_identity(task.identity())
            .await?
            .unwrap_or_else(|| PersistedTaskRecord::new_for(task));

        if transition == Transition::Finish {
            row.finish_time = Some(self.now());
        }
        row.executed_object_class = Some(task.kind().to_owned());
        row.execution_time = record.last_execution_time();
        row.message = StoredMessage::Current(record.message().clone());
        row.status_code = status;

        if transition == Transition::Progress {
            if !self.repository.claim_progress(&row).await? {
                tracing::warn!(
                    identity = %task.identity(),
                    task = %task,
                    "start refused: task is already in progress elsewhere"
                );
                return Ok(None);
            }
        } else {
            self.repository.upsert(&row).await?;
        }

        tracing::info!(
            identity = %task.identity(),
            task = %task,
            status = %status,
            execution_time = row.execution_time,
            "persisted task transition"
        );
        let stored = record.with_status_code(status);
        self.remember(&stored)?;
        Ok(Some(stored))
    }
}

fn cache_poisoned<E: std::fmt::Display>(err: E) -> RecordLoaderError {
    RecordLoaderError::CacheUnavailable(err.to_string())
}

#[async_trait]
impl<R, C> RecordLoader for EntityLoader<R, C>
where
    R: TaskRecordRepository,
    C: Clock + Send + Sync,
{
    async fn get_record(&self, task: &TaskRef) -> RecordLoaderResult<Option<LastRecord>> {
        let identity = task.identity();
        if let Some(record) = self.cached(identity)? {
            tracing::debug!(identity = %identity, "task record served from cache");
            return Ok(Some(record));
        }

        let Some(row) = self.repository.find_by_identity(identity).await? else {
            return Ok(None);
        };
        let record = reconcile_record(task, row, self.config.min_plausible_execution_time);
        self.remember(&record)?;
        Ok(Some(record))
    }

    async fn store_exit_runner(&self, runner: &Runner) -> RecordLoaderResult<Option<LastRecord>> {
        let Some(started_at) = runner.started_at() else {
            return Ok(None);
        };
        let message = Message::new(
            MessageKind::Exited,
            runner.message().payload().map(str::to_owned),
        );
        let record = LastRecord::new(runner.task().clone(), started_at, message);
        self.save_record(&record, Transition::Exited).await
    }

    async fn do_skip_progress(&self, runner: &Runner) -> RecordLoaderResult<Option<LastRecord>> {
        let task = runner.task();
        let previous_time = self
            .get_record(task)
            .await?
            .map(|previous| previous.last_execution_time())
            .filter(|time| *time > 0);
        let execution_time = previous_time.unwrap_or_else(|| self.now());
        let message = Message::with_text(MessageKind::Skipped, self.config.skip_message.clone());
        let record = LastRecord::new(task.clone(), execution_time, message);
        self.save_record(&record, Transition::Skipped).await
    }

    async fn do_start_progress(&self, runner: &Runner) -> RecordLoaderResult<Option<LastRecord>> {
        let started_at = runner.started_at().unwrap_or_else(|| self.now());
        let record = LastRecord::new(
            runner.task().clone(),
            started_at,
            Message::empty(MessageKind::Progress),
        );
        self.save_record(&record, Transition::Progress).await
    }

    async fn finish(&self, execution_time: i64, runner: &Runner) -> RecordLoaderResult<LastRecord> {
        let record = LastRecord::new(runner.task().clone(), execution_time, runner.message().clone())
            .with_status_code(runner.status());
        let stored = self.save_record(&record, Transition::Finish).await?;
        Ok(stored.unwrap_or(record))
    }
}
