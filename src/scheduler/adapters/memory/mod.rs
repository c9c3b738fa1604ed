//! In-memory adapters for task run state.

mod repository;

pub use repository::InMemoryTaskRecordRepository;
