//! Messages explaining why a task reached its status, and their stored
//! encodings.

use super::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Discriminant of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// The run succeeded.
    Success,
    /// The run failed.
    Failure,
    /// The tick was skipped.
    Skipped,
    /// The run was stopped.
    Stopped,
    /// The worker exited without finishing.
    Exited,
    /// The run is in progress.
    Progress,
    /// No better description is available.
    Unknown,
}

impl MessageKind {
    /// Picks the message kind that describes a status code.
    ///
    /// [`StatusCode::Queue`] and [`StatusCode::Unknown`] have no dedicated
    /// message and map to [`MessageKind::Unknown`].
    #[must_use]
    pub const fn for_status(status: StatusCode) -> Self {
        match status {
            StatusCode::Skipped => Self::Skipped,
            StatusCode::Failure => Self::Failure,
            StatusCode::Exited => Self::Exited,
            StatusCode::Progress => Self::Progress,
            StatusCode::Stopped => Self::Stopped,
            StatusCode::Success => Self::Success,
            StatusCode::Queue | StatusCode::Unknown => Self::Unknown,
        }
    }

    /// Returns the status code a message of this kind implies.
    #[must_use]
    pub const fn status_code(self) -> StatusCode {
        match self {
            Self::Success => StatusCode::Success,
            Self::Failure => StatusCode::Failure,
            Self::Skipped => StatusCode::Skipped,
            Self::Stopped => StatusCode::Stopped,
            Self::Exited => StatusCode::Exited,
            Self::Progress => StatusCode::Progress,
            Self::Unknown => StatusCode::Unknown,
        }
    }

    /// Returns the canonical textual representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Skipped => "skipped",
            Self::Stopped => "stopped",
            Self::Exited => "exited",
            Self::Progress => "progress",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason attached to a task status: a kind plus an optional text payload.
///
/// A stored payload that is not a JSON string decodes as `None` rather than
/// failing the whole message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    kind: MessageKind,
    #[serde(default, deserialize_with = "deserialize_text_payload")]
    payload: Option<String>,
}

impl Message {
    /// Creates a message with an optional text payload.
    #[must_use]
    pub const fn new(kind: MessageKind, payload: Option<String>) -> Self {
        Self { kind, payload }
    }

    /// Creates a message without payload.
    #[must_use]
    pub const fn empty(kind: MessageKind) -> Self {
        Self::new(kind, None)
    }

    /// Creates a message with a text payload.
    #[must_use]
    pub fn with_text(kind: MessageKind, payload: impl Into<String>) -> Self {
        Self::new(kind, Some(payload.into()))
    }

    /// Creates a message from any displayable payload.
    #[must_use]
    pub fn from_display(kind: MessageKind, payload: &impl fmt::Display) -> Self {
        Self::new(kind, Some(payload.to_string()))
    }

    /// Creates a message from an arbitrary JSON payload.
    ///
    /// Only JSON strings survive; any other value is dropped to `None`.
    #[must_use]
    pub fn from_value(kind: MessageKind, payload: &Value) -> Self {
        Self::new(kind, sanitize_payload(payload))
    }

    /// Creates a success message.
    #[must_use]
    pub fn success(payload: impl Into<String>) -> Self {
        Self::with_text(MessageKind::Success, payload)
    }

    /// Creates a failure message.
    #[must_use]
    pub fn failure(payload: impl Into<String>) -> Self {
        Self::with_text(MessageKind::Failure, payload)
    }

    /// Creates a stopped message.
    #[must_use]
    pub fn stopped(payload: impl Into<String>) -> Self {
        Self::with_text(MessageKind::Stopped, payload)
    }

    /// Returns the message kind.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Returns the text payload, if any.
    #[must_use]
    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// Consumes the message and returns its payload.
    #[must_use]
    pub fn into_payload(self) -> Option<String> {
        self.payload
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::empty(MessageKind::Unknown)
    }
}

/// Keeps a JSON string payload and discards everything else.
fn sanitize_payload(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        _ => None,
    }
}

fn deserialize_text_payload<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(sanitize_payload))
}

/// Accepts a structured message, or wraps any other value as an unknown
/// message carrying its text.
fn deserialize_embedded_message<'de, D>(deserializer: D) -> Result<Message, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value::<Message>(value.clone())
        .unwrap_or_else(|_| Message::from_value(MessageKind::Unknown, &value)))
}

/// A complete record nested inside the message column by an older storage
/// format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedRecord {
    /// Status recorded inside the legacy payload.
    #[serde(rename = "status_code")]
    pub inner_status: StatusCode,
    /// Execution time recorded inside the legacy payload.
    #[serde(rename = "last_execution_time", default)]
    pub inner_time: i64,
    /// Message recorded inside the legacy payload.
    #[serde(
        rename = "message",
        default,
        deserialize_with = "deserialize_embedded_message"
    )]
    pub inner_message: Message,
}

/// Contents of the `message` column.
///
/// Decoding is total: anything that is neither a current message nor a
/// legacy embedded record is kept as a raw [`StoredMessage::Scalar`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredMessage {
    /// Current format: a structured message.
    Current(Message),
    /// Legacy format: the whole last record nested in the message column.
    LegacyEmbeddedRecord {
        /// The nested record.
        last_record: EmbeddedRecord,
    },
    /// Any other JSON value, including `null`.
    Scalar(Value),
}

impl StoredMessage {
    /// Decodes a stored JSON value. Never fails.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or(Self::Scalar(value))
    }

    /// Decodes an optional column value; SQL `NULL` becomes a null scalar.
    #[must_use]
    pub fn from_column(value: Option<Value>) -> Self {
        value.map_or(Self::Scalar(Value::Null), Self::from_value)
    }

    /// Encodes the message for storage.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] if encoding fails.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl From<Message> for StoredMessage {
    fn from(message: Message) -> Self {
        Self::Current(message)
    }
}
