//! Port contracts for task run state.
//!
//! Ports define infrastructure-agnostic interfaces: the storage contract used
//! by loaders and the loader contract used by the scheduler.

pub mod loader;
pub mod repository;

pub use loader::{RecordLoader, RecordLoaderError, RecordLoaderResult};
pub use repository::{TaskRecordRepository, TaskRecordRepositoryError, TaskRecordRepositoryResult};

#[cfg(test)]
pub use repository::MockTaskRecordRepository;
