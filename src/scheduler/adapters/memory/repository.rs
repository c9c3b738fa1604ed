//! In-memory task record repository for tests and single-process use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::scheduler::{
    domain::{PersistedTaskRecord, StatusCode, TaskIdentity},
    ports::{TaskRecordRepository, TaskRecordRepositoryError, TaskRecordRepositoryResult},
};

/// Thread-safe in-memory task record repository.
///
/// Clones share the same underlying rows, which lets tests hand one clone to
/// a loader and inspect storage through another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRecordRepository {
    rows: Arc<RwLock<HashMap<TaskIdentity, PersistedTaskRecord>>>,
}

impl InMemoryTaskRecordRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored rows.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRecordRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn len(&self) -> TaskRecordRepositoryResult<usize> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows.len())
    }

    /// Returns `true` when no rows are stored.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRecordRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn is_empty(&self) -> TaskRecordRepositoryResult<bool> {
        Ok(self.len()? == 0)
    }
}

fn poisoned<E: std::fmt::Display>(err: E) -> TaskRecordRepositoryError {
    TaskRecordRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRecordRepository for InMemoryTaskRecordRepository {
    async fn find_by_identity(
        &self,
        identity: &TaskIdentity,
    ) -> TaskRecordRepositoryResult<Option<PersistedTaskRecord>> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows.get(identity).cloned())
    }

    async fn upsert(&self, record: &PersistedTaskRecord) -> TaskRecordRepositoryResult<()> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        rows.insert(record.identity.clone(), record.clone());
        Ok(())
    }

    async fn claim_progress(
        &self,
        record: &PersistedTaskRecord,
    ) -> TaskRecordRepositoryResult<bool> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        let held = rows
            .get(&record.identity)
            .is_some_and(|row| row.status_code == StatusCode::Progress);
        if held {
            return Ok(false);
        }
        rows.insert(record.identity.clone(), record.clone());
        Ok(true)
    }
}
