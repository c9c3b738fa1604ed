//! Turns a stored row into the canonical last record.
//!
//! Rows written by older versions nest the whole record inside the message
//! column, and rows written by hand may carry a bare scalar. Both are upgraded
//! on read without a migration.

use crate::scheduler::domain::{
    EmbeddedRecord, LastRecord, Message, MessageKind, PersistedTaskRecord, StatusCode,
    StoredMessage, TaskRef,
};
use serde_json::Value;

/// Builds the effective record for a stored row.
///
/// - A current message is taken as stored, with the row's status and time.
/// - A legacy embedded record supplies the message. Its status replaces the
///   row's status only when the row status is uninformative (queue or
///   unknown) and the embedded status is neither unknown nor progress. Its
///   time replaces the row's time when it exceeds `min_plausible_time`.
/// - A scalar is sanitized to a string or `None` and wrapped in the message
///   kind matching the row's status.
#[must_use]
pub fn reconcile_record(
    task: &TaskRef,
    row: PersistedTaskRecord,
    min_plausible_time: i64,
) -> LastRecord {
    let PersistedTaskRecord {
        status_code,
        execution_time,
        message,
        ..
    } = row;

    let (effective_status, effective_time, effective_message) = match message {
        StoredMessage::Current(current) => (status_code, execution_time, current),
        StoredMessage::LegacyEmbeddedRecord { last_record } => {
            merge_embedded(task, status_code, execution_time, last_record, min_plausible_time)
        }
        StoredMessage::Scalar(value) => (
            status_code,
            execution_time,
            synthesize_message(task, status_code, &value),
        ),
    };

    LastRecord::new(task.clone(), effective_time, effective_message)
        .with_status_code(effective_status)
}

fn merge_embedded(
    task: &TaskRef,
    row_status: StatusCode,
    row_time: i64,
    embedded: EmbeddedRecord,
    min_plausible_time: i64,
) -> (StatusCode, i64, Message) {
    let EmbeddedRecord {
        inner_status,
        inner_time,
        inner_message,
    } = embedded;

    let embedded_is_terminal = !matches!(inner_status, StatusCode::Unknown | StatusCode::Progress);
    let status = if row_status.is_uninformative() && embedded_is_terminal {
        inner_status
    } else {
        row_status
    };
    let time = if inner_time > min_plausible_time {
        inner_time
    } else {
        row_time
    };

    tracing::debug!(
        identity = %task.identity(),
        row_status = %row_status,
        embedded_status = %inner_status,
        effective_status = %status,
        "reconciled legacy embedded record"
    );
    (status, time, inner_message)
}

fn synthesize_message(task: &TaskRef, status: StatusCode, value: &Value) -> Message {
    if !value.is_null() && !value.is_string() {
        tracing::warn!(
            identity = %task.identity(),
            "dropping non-text stored message payload"
        );
    }
    Message::from_value(MessageKind::for_status(status), value)
}
