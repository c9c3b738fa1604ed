//! Diesel row models for task run state persistence.

use super::schema::task_schedulers;
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task run records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_schedulers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskSchedulerRow {
    /// Task identity hash.
    pub identity: String,
    /// Task name.
    pub name: String,
    /// Concrete task type that last wrote the row.
    pub executed_object_class: Option<String>,
    /// Task status code.
    pub status_code: i16,
    /// Start time of the recorded run.
    pub execution_time: i64,
    /// Time of the last finish transition.
    pub finish_time: Option<i64>,
    /// Status message payload.
    pub message: Option<Value>,
}

/// Insert and update model for task run records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = task_schedulers)]
#[diesel(primary_key(identity))]
#[diesel(treat_none_as_null = true)]
pub struct NewTaskSchedulerRow {
    /// Task identity hash.
    pub identity: String,
    /// Task name.
    pub name: String,
    /// Concrete task type that last wrote the row.
    pub executed_object_class: Option<String>,
    /// Task status code.
    pub status_code: i16,
    /// Start time of the recorded run.
    pub execution_time: i64,
    /// Time of the last finish transition.
    pub finish_time: Option<i64>,
    /// Status message payload.
    pub message: Option<Value>,
}
