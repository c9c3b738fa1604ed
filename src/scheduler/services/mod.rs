//! Application services for task run state.

mod coordinator;
mod entity_loader;
mod reconcile;

pub use coordinator::{RunReport, TaskRunCoordinator};
pub use entity_loader::EntityLoader;
pub use reconcile::reconcile_record;
