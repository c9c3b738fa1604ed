//! `PostgreSQL` adapters for task run state persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresTaskRecordRepository, TaskRecordPgPool};
