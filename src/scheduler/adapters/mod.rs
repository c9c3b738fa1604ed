//! Adapter implementations for task run state ports.

pub mod memory;
pub mod postgres;
