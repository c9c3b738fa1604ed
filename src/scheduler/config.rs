//! Configuration for record loaders.

use serde::{Deserialize, Serialize};

/// 2000-01-01T00:00:00Z. Embedded legacy timestamps at or below this are
/// treated as garbage.
pub const DEFAULT_MIN_PLAUSIBLE_EXECUTION_TIME: i64 = 946_684_800;

/// Message payload recorded when a tick is skipped.
pub const DEFAULT_SKIP_MESSAGE: &str = "previous run still in progress";

/// Tunables for [`EntityLoader`](crate::scheduler::services::EntityLoader).
///
/// Every field has a default, so a partial JSON document is valid:
///
/// ```
/// use taskledger::scheduler::config::RecordLoaderConfig;
///
/// let config = RecordLoaderConfig::from_json(r#"{"min_plausible_execution_time": 1}"#)
///     .expect("valid config");
/// assert_eq!(config.min_plausible_execution_time, 1);
/// assert_eq!(config.skip_message, "previous run still in progress");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordLoaderConfig {
    /// Embedded legacy execution times must exceed this unix time to be
    /// adopted during reconciliation.
    pub min_plausible_execution_time: i64,
    /// Payload of the message stored with a skipped tick.
    pub skip_message: String,
}

impl RecordLoaderConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the document is not valid JSON or a
    /// field has the wrong type.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Sets the minimum plausible embedded execution time.
    #[must_use]
    pub const fn with_min_plausible_execution_time(mut self, value: i64) -> Self {
        self.min_plausible_execution_time = value;
        self
    }

    /// Sets the skipped-tick message payload.
    #[must_use]
    pub fn with_skip_message(mut self, message: impl Into<String>) -> Self {
        self.skip_message = message.into();
        self
    }
}

impl Default for RecordLoaderConfig {
    fn default() -> Self {
        Self {
            min_plausible_execution_time: DEFAULT_MIN_PLAUSIBLE_EXECUTION_TIME,
            skip_message: DEFAULT_SKIP_MESSAGE.to_owned(),
        }
    }
}
