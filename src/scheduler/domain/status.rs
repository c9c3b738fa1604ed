//! Task run status codes.

use super::ParseStatusCodeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of the latest run of a task.
///
/// The discriminants are the values stored in the `status_code` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i16", into = "i16")]
#[repr(i16)]
pub enum StatusCode {
    /// Never run, or waiting for its first tick.
    #[default]
    Queue = 0,
    /// Currently running.
    Progress = 1,
    /// Last run completed successfully.
    Success = 2,
    /// Last run failed.
    Failure = 3,
    /// Last tick was skipped because a run was still in progress.
    Skipped = 4,
    /// Last run was stopped before completion.
    Stopped = 5,
    /// The worker running the task went away without finishing.
    Exited = 6,
    /// Fallback for unrecognized codes and messages.
    Unknown = 7,
}

impl StatusCode {
    /// All status codes in storage order.
    pub const ALL: [Self; 8] = [
        Self::Queue,
        Self::Progress,
        Self::Success,
        Self::Failure,
        Self::Skipped,
        Self::Stopped,
        Self::Exited,
        Self::Unknown,
    ];

    /// Decodes a stored integer. Unrecognized values map to
    /// [`StatusCode::Unknown`].
    #[must_use]
    pub const fn from_code(code: i16) -> Self {
        match code {
            0 => Self::Queue,
            1 => Self::Progress,
            2 => Self::Success,
            3 => Self::Failure,
            4 => Self::Skipped,
            5 => Self::Stopped,
            6 => Self::Exited,
            _ => Self::Unknown,
        }
    }

    /// Returns the stored integer.
    #[must_use]
    pub const fn code(self) -> i16 {
        self as i16
    }

    /// Returns the canonical textual representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queue => "queue",
            Self::Progress => "progress",
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Skipped => "skipped",
            Self::Stopped => "stopped",
            Self::Exited => "exited",
            Self::Unknown => "unknown",
        }
    }

    /// Returns `true` when the status says nothing about a past run.
    ///
    /// Reconciliation lets an embedded legacy status replace an
    /// uninformative column value.
    #[must_use]
    pub const fn is_uninformative(self) -> bool {
        matches!(self, Self::Queue | Self::Unknown)
    }
}

impl From<i16> for StatusCode {
    fn from(code: i16) -> Self {
        Self::from_code(code)
    }
}

impl From<StatusCode> for i16 {
    fn from(status: StatusCode) -> Self {
        status.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for StatusCode {
    type Error = ParseStatusCodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "queue" => Ok(Self::Queue),
            "progress" => Ok(Self::Progress),
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            "skipped" => Ok(Self::Skipped),
            "stopped" => Ok(Self::Stopped),
            "exited" => Ok(Self::Exited),
            "unknown" => Ok(Self::Unknown),
            _ => Err(ParseStatusCodeError(value.to_owned())),
        }
    }
}
