//! World contract: the minimal trait a world must implement.
//!
//! Worlds provide a planning task. Worlds may NOT configure evaluators,
//! drive the search or write plans; those are runner concerns.

use waypoint_kernel::task::{Task, TaskError};

/// A source of planning tasks the runner can search.
pub trait PlanningWorld {
    /// Unique world identifier (e.g., `"line"`).
    fn world_id(&self) -> &str;

    /// Build the world's task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError`] if the world's description is malformed.
    fn task(&self) -> Result<Task, TaskError>;
}
