//! Unsolvable world: position 2 is the goal but nothing moves past 1.

use waypoint_kernel::task::{Task, TaskError};

use super::{position_task, Move};
use crate::contract::PlanningWorld;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeadEndWorld;

impl PlanningWorld for DeadEndWorld {
    #[allow(clippy::unnecessary_literal_bound)]
    fn world_id(&self) -> &str {
        "dead_end"
    }

    fn task(&self) -> Result<Task, TaskError> {
        position_task(
            3,
            vec![Move::new("forward", 0, 1, 1), Move::new("back", 1, 0, 1)],
            2,
        )
    }
}
