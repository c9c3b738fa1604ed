//! Taskledger: durable run state for scheduled background tasks.
//!
//! This crate records the last known outcome of every scheduled task so that
//! process restarts, overlapping ticks, and workers that disappear mid-run
//! never lose track of a task's status.
//!
//! # Architecture
//!
//! Taskledger follows hexagonal architecture principles:
//!
//! - **Domain**: Status codes, messages, and records with no infrastructure
//!   dependencies
//! - **Ports**: The record loader contract used by schedulers and the storage
//!   contract used by loaders
//! - **Adapters**: In-memory and `PostgreSQL` storage
//!
//! # Modules
//!
//! - [`scheduler`]: Run-state model, reconciliation of legacy rows, and the
//!   storage-backed record loader

pub mod scheduler;
