//! Domain model for persisted task run state.
//!
//! The scheduler domain covers status codes, status messages (including the
//! legacy embedded-record encoding), task identities, and the records that
//! move between the scheduler and storage. Infrastructure stays outside this
//! boundary.

mod error;
mod ids;
mod message;
mod record;
mod runner;
mod status;

pub use error::{ParseStatusCodeError, TaskDomainError};
pub use ids::{TaskIdentity, TaskName, TaskRef};
pub use message::{EmbeddedRecord, Message, MessageKind, StoredMessage};
pub use record::{LastRecord, PersistedTaskRecord};
pub use runner::Runner;
pub use status::StatusCode;
