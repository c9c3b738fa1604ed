//! Persisted run state for scheduled tasks.
//!
//! The scheduler records the outcome of each task run durably so that
//! restarts, overlapping ticks, and crashed workers never lose a task's last
//! known status. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Loader and tick orchestration in [`services`]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;
