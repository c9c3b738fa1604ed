//! `PostgreSQL` repository implementation for task run state storage.

use super::{
    models::{NewTaskSchedulerRow, TaskSchedulerRow},
    schema::task_schedulers,
};
use crate::scheduler::{
    domain::{PersistedTaskRecord, StatusCode, StoredMessage, TaskIdentity},
    ports::{TaskRecordRepository, TaskRecordRepositoryError, TaskRecordRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_types::{BigInt, Jsonb, Nullable, SmallInt, Text};
use serde_json::Value;

/// `PostgreSQL` connection pool type used by task record adapters.
pub type TaskRecordPgPool = Pool<ConnectionManager<PgConnection>>;

/// Conditional upsert used to claim a task for a new run. The `WHERE` clause
/// makes the update a no-op while another worker holds the row in progress.
const CLAIM_PROGRESS_SQL: &str = concat!(
    "INSERT INTO task_schedulers (identity, name, executed_object_class, status_code, ",
    "execution_time, finish_time, message) VALUES ($1, $2, $3, $4, $5, $6, $7) ",
    "ON CONFLICT (identity) DO UPDATE SET ",
    "name = EXCLUDED.name, ",
    "executed_object_class = EXCLUDED.executed_object_class, ",
    "status_code = EXCLUDED.status_code, ",
    "execution_time = EXCLUDED.execution_time, ",
    "finish_time = EXCLUDED.finish_time, ",
    "message = EXCLUDED.message ",
    "WHERE task_schedulers.status_code <> $8",
);

/// `PostgreSQL`-backed task record repository.
///
/// Each statement runs in autocommit mode, so a write is durable once the
/// call returns.
#[derive(Debug, Clone)]
pub struct PostgresTaskRecordRepository {
    pool: TaskRecordPgPool,
}

impl PostgresTaskRecordRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskRecordPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRecordRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRecordRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRecordRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRecordRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRecordRepository for PostgresTaskRecordRepository {
    async fn find_by_identity(
        &self,
        identity: &TaskIdentity,
    ) -> TaskRecordRepositoryResult<Option<PersistedTaskRecord>> {
        let key = identity.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = task_schedulers::table
                .find(key)
                .select(TaskSchedulerRow::as_select())
                .first::<TaskSchedulerRow>(connection)
                .optional()
                .map_err(TaskRecordRepositoryError::persistence)?;
            Ok(row.map(row_to_record))
        })
        .await
    }

    async fn upsert(&self, record: &PersistedTaskRecord) -> TaskRecordRepositoryResult<()> {
        let new_row = to_new_row(record)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(task_schedulers::table)
                .values(&new_row)
                .on_conflict(task_schedulers::identity)
                .do_update()
                .set(&new_row)
                .execute(connection)
                .map_err(TaskRecordRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn claim_progress(
        &self,
        record: &PersistedTaskRecord,
    ) -> TaskRecordRepositoryResult<bool> {
        let new_row = to_new_row(record)?;
        self.run_blocking(move |connection| {
            let written = diesel::sql_query(CLAIM_PROGRESS_SQL)
                .bind::<Text, _>(new_row.identity)
                .bind::<Text, _>(new_row.name)
                .bind::<Nullable<Text>, _>(new_row.executed_object_class)
                .bind::<SmallInt, _>(new_row.status_code)
                .bind::<BigInt, _>(new_row.execution_time)
                .bind::<Nullable<BigInt>, _>(new_row.finish_time)
                .bind::<Nullable<Jsonb>, _>(new_row.message)
                .bind::<SmallInt, _>(StatusCode::Progress.code())
                .execute(connection)
                .map_err(TaskRecordRepositoryError::persistence)?;
            Ok(written > 0)
        })
        .await
    }
}

fn to_new_row(record: &PersistedTaskRecord) -> TaskRecordRepositoryResult<NewTaskSchedulerRow> {
    let message = record
        .message
        .to_value()
        .map_err(TaskRecordRepositoryError::persistence)?;

    Ok(NewTaskSchedulerRow {
        identity: record.identity.as_str().to_owned(),
        name: record.name.clone(),
        executed_object_class: record.executed_object_class.clone(),
        status_code: record.status_code.code(),
        execution_time: record.execution_time,
        finish_time: record.finish_time,
        message: match message {
            Value::Null => None,
            value => Some(value),
        },
    })
}

fn row_to_record(row: TaskSchedulerRow) -> PersistedTaskRecord {
    let TaskSchedulerRow {
        identity,
        name,
        executed_object_class,
        status_code,
        execution_time,
        finish_time,
        message,
    } = row;

    PersistedTaskRecord {
        identity: TaskIdentity::from_persisted(identity),
        name,
        executed_object_class,
        status_code: StatusCode::from_code(status_code),
        execution_time,
        finish_time,
        message: StoredMessage::from_column(message),
    }
}
