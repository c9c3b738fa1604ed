//! Shared helpers for in-memory task run state tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskledger::scheduler::{
    adapters::memory::InMemoryTaskRecordRepository,
    domain::{Runner, TaskRef},
    services::{EntityLoader, TaskRunCoordinator},
};

/// Loader type used by the in-memory tests.
pub type MemoryLoader = EntityLoader<InMemoryTaskRecordRepository, DefaultClock>;

/// Coordinator type used by the in-memory tests.
pub type MemoryCoordinator = TaskRunCoordinator<MemoryLoader, DefaultClock>;

/// Fixed start time used by runners built in tests.
pub const STARTED_AT: i64 = 1_700_000_000;

/// Shared storage standing in for the database across "processes".
#[fixture]
pub fn storage() -> InMemoryTaskRecordRepository {
    InMemoryTaskRecordRepository::new()
}

/// The task most tests schedule.
#[fixture]
pub fn report_task() -> TaskRef {
    TaskRef::new("nightly-report", "app::ReportTask").expect("valid task reference")
}

/// Builds a loader as a freshly started process would.
#[must_use]
pub fn fresh_loader(storage: &InMemoryTaskRecordRepository) -> MemoryLoader {
    EntityLoader::new(Arc::new(storage.clone()), Arc::new(DefaultClock))
}

/// Builds a coordinator over a fresh loader.
#[must_use]
pub fn fresh_coordinator(storage: &InMemoryTaskRecordRepository) -> MemoryCoordinator {
    TaskRunCoordinator::new(Arc::new(fresh_loader(storage)), Arc::new(DefaultClock))
}

/// Returns a runner for `task` that started at [`STARTED_AT`].
#[must_use]
pub fn started_runner(task: &TaskRef) -> Runner {
    let mut runner = Runner::new(task.clone());
    runner.mark_started(STARTED_AT);
    runner
}
