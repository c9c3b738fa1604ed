//! Repository port for task run record persistence.

use crate::scheduler::domain::{PersistedTaskRecord, TaskIdentity};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task record repository operations.
pub type TaskRecordRepositoryResult<T> = Result<T, TaskRecordRepositoryError>;

/// Keyed storage of one run record per task identity.
///
/// Every write must be durable when the returned future resolves.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRecordRepository: Send + Sync {
    /// Finds the row stored for an identity.
    ///
    /// Returns `None` when the task has never been recorded.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRecordRepositoryError::Persistence`] when the read
    /// fails.
    async fn find_by_identity(
        &self,
        identity: &TaskIdentity,
    ) -> TaskRecordRepositoryResult<Option<PersistedTaskRecord>>;

    /// Inserts the row or replaces the stored row with the same identity.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRecordRepositoryError::Persistence`] when the write
    /// fails.
    async fn upsert(&self, record: &PersistedTaskRecord) -> TaskRecordRepositoryResult<()>;

    /// Writes the row unless the stored row is currently in progress.
    ///
    /// Inserts when no row exists. Updates only when the stored status is
    /// not [`StatusCode::Progress`](crate::scheduler::domain::StatusCode::Progress),
    /// as one atomic conditional write. Returns whether the row was written.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRecordRepositoryError::Persistence`] when the write
    /// fails.
    async fn claim_progress(&self, record: &PersistedTaskRecord)
    -> TaskRecordRepositoryResult<bool>;
}

/// Errors returned by task record repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRecordRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRecordRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
