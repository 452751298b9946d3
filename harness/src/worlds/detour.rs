//! Two routes to the goal: `s0 -> s1 -> s2` costs 3 + 4, the direct
//! `s0 -> s2` costs 5. The cheap route is found only if the search relaxes
//! the g value of `s2`.

use waypoint_kernel::task::{Task, TaskError};

use super::{position_task, Move};
use crate::contract::PlanningWorld;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetourWorld;

impl PlanningWorld for DetourWorld {
    #[allow(clippy::unnecessary_literal_bound)]
    fn world_id(&self) -> &str {
        "detour"
    }

    fn task(&self) -> Result<Task, TaskError> {
        position_task(
            3,
            vec![
                Move::new("s0-s1", 0, 1, 3),
                Move::new("s1-s2", 1, 2, 4),
                Move::new("s0-s2", 0, 2, 5),
            ],
            2,
        )
    }
}
