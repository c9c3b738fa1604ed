//! Task run records: the value handed between scheduler and loader, and the
//! row shape kept by storage.

use super::{Message, StatusCode, StoredMessage, TaskIdentity, TaskRef};

/// Last known outcome of a task.
///
/// Records are values: [`LastRecord::with_status_code`] returns a new record
/// and leaves the original untouched, so a cached record is never altered
/// while a merged view is derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastRecord {
    task: TaskRef,
    last_execution_time: i64,
    status_code: StatusCode,
    message: Message,
}

impl LastRecord {
    /// Creates a record whose status is implied by the message kind.
    #[must_use]
    pub fn new(task: TaskRef, last_execution_time: i64, message: Message) -> Self {
        let status_code = message.kind().status_code();
        Self {
            task,
            last_execution_time,
            status_code,
            message,
        }
    }

    /// Returns a copy of this record with the status code replaced.
    #[must_use]
    pub fn with_status_code(&self, status_code: StatusCode) -> Self {
        Self {
            status_code,
            ..self.clone()
        }
    }

    /// Returns the task this record belongs to.
    #[must_use]
    pub const fn task(&self) -> &TaskRef {
        &self.task
    }

    /// Returns the last execution time in unix seconds; `0` means never run.
    #[must_use]
    pub const fn last_execution_time(&self) -> i64 {
        self.last_execution_time
    }

    /// Returns the status code.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.status_code
    }

    /// Returns the message.
    #[must_use]
    pub const fn message(&self) -> &Message {
        &self.message
    }
}

/// One stored row per task identity.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedTaskRecord {
    /// Primary key.
    pub identity: TaskIdentity,
    /// Task name at the time the row was created.
    pub name: String,
    /// Concrete task type that last wrote the row.
    pub executed_object_class: Option<String>,
    /// Stored status.
    pub status_code: StatusCode,
    /// Start time of the recorded run in unix seconds.
    pub execution_time: i64,
    /// Time the last finish transition was written, in unix seconds.
    pub finish_time: Option<i64>,
    /// Stored message payload in whichever format it was written.
    pub message: StoredMessage,
}

impl PersistedTaskRecord {
    /// Creates an empty row for a task that has not been recorded yet.
    #[must_use]
    pub fn new_for(task: &TaskRef) -> Self {
        Self {
            identity: task.identity().clone(),
            name: task.name().as_str().to_owned(),
            executed_object_class: None,
            status_code: StatusCode::Queue,
            execution_time: 0,
            finish_time: None,
            message: StoredMessage::Scalar(serde_json::Value::Null),
        }
    }
}
