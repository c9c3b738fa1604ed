//! Then steps for task run state BDD scenarios.

use super::world::{TaskRunStateWorld, run_async};
use rstest_bdd_macros::then;
use taskledger::scheduler::{
    domain::StatusCode,
    ports::{RecordLoader, TaskRecordRepository},
    services::RunReport,
};

#[then(r#"the recorded status is "{status}""#)]
fn recorded_status_is(world: &TaskRunStateWorld, status: String) -> Result<(), eyre::Report> {
    let expected = StatusCode::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = world.task()?;

    let record = run_async(world.coordinator.loader().get_record(task))?
        .ok_or_else(|| eyre::eyre!("no record stored for {task}"))?;

    if record.status_code() != expected {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected.as_str(),
            record.status_code().as_str()
        ));
    }
    Ok(())
}

#[then("the tick was skipped")]
fn tick_was_skipped(world: &TaskRunStateWorld) -> Result<(), eyre::Report> {
    let report = world
        .last_report
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing run report"))?;
    if !matches!(report, RunReport::Skipped(_)) {
        return Err(eyre::eyre!("expected a skipped tick, got {report:?}"));
    }
    Ok(())
}

#[then("the finish time is set")]
fn finish_time_is_set(world: &TaskRunStateWorld) -> Result<(), eyre::Report> {
    let task = world.task()?;
    let row = run_async(world.storage.find_by_identity(task.identity()))?
        .ok_or_else(|| eyre::eyre!("no row stored for {task}"))?;
    if row.finish_time.is_none() {
        return Err(eyre::eyre!("expected finish_time to be set"));
    }
    Ok(())
}

#[then("the finish time is not set")]
fn finish_time_is_not_set(world: &TaskRunStateWorld) -> Result<(), eyre::Report> {
    let task = world.task()?;
    let row = run_async(world.storage.find_by_identity(task.identity()))?
        .ok_or_else(|| eyre::eyre!("no row stored for {task}"))?;
    if let Some(finish_time) = row.finish_time {
        return Err(eyre::eyre!("expected no finish_time, found {finish_time}"));
    }
    Ok(())
}
