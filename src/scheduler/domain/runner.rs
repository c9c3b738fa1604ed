//! Scheduler-side handle for a single task invocation.

use super::{Message, MessageKind, StatusCode, TaskRef};

/// State of one invocation of a task as seen by the scheduler.
///
/// The record loader derives the records it persists from a runner at each
/// lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Runner {
    task: TaskRef,
    status: StatusCode,
    message: Message,
    started_at: Option<i64>,
}

impl Runner {
    /// Creates a queued runner for a task.
    #[must_use]
    pub const fn new(task: TaskRef) -> Self {
        Self {
            task,
            status: StatusCode::Queue,
            message: Message::empty(MessageKind::Unknown),
            started_at: None,
        }
    }

    /// Marks the runner as started at the given unix time.
    pub fn mark_started(&mut self, at: i64) {
        self.status = StatusCode::Progress;
        self.message = Message::empty(MessageKind::Progress);
        self.started_at = Some(at);
    }

    /// Records the outcome reported by the task. The status follows the
    /// message kind.
    pub fn mark_finished(&mut self, message: Message) {
        self.status = message.kind().status_code();
        self.message = message;
    }

    /// Returns the task.
    #[must_use]
    pub const fn task(&self) -> &TaskRef {
        &self.task
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the latest message.
    #[must_use]
    pub const fn message(&self) -> &Message {
        &self.message
    }

    /// Returns the start time, or `None` when the runner never started.
    #[must_use]
    pub const fn started_at(&self) -> Option<i64> {
        self.started_at
    }
}
