//! Unit-cost chain `0 -> 1 -> ... -> length`.

use waypoint_kernel::task::{Task, TaskError};

use super::{position_task, Move};
use crate::contract::PlanningWorld;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineWorld {
    pub length: u32,
}

impl Default for LineWorld {
    fn default() -> Self {
        Self { length: 5 }
    }
}

impl PlanningWorld for LineWorld {
    #[allow(clippy::unnecessary_literal_bound)]
    fn world_id(&self) -> &str {
        "line"
    }

    fn task(&self) -> Result<Task, TaskError> {
        let moves = (0..self.length)
            .map(|i| Move::new(format!("step-{i}"), i, i + 1, 1))
            .collect();
        position_task(self.length + 1, moves, self.length)
    }
}
