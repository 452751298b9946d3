//! World implementations for the harness runner.
//!
//! The built-in worlds share one shape: a single `position` variable and
//! operators that move it from one value to another.

pub mod dead_end;
pub mod detour;
pub mod line;
pub mod task_file;

use waypoint_kernel::task::{Fact, Operator, Task, TaskError, Variable};

use crate::contract::PlanningWorld;
use dead_end::DeadEndWorld;
use detour::DetourWorld;
use line::LineWorld;

/// Built-in world by identifier: `line`, `detour` or `dead_end`.
#[must_use]
pub fn builtin(world_id: &str) -> Option<Box<dyn PlanningWorld>> {
    match world_id {
        "line" => Some(Box::new(LineWorld::default())),
        "detour" => Some(Box::new(DetourWorld)),
        "dead_end" => Some(Box::new(DeadEndWorld)),
        _ => None,
    }
}

/// One `position -> position` move.
struct Move {
    name: String,
    from: u32,
    to: u32,
    cost: i32,
}

impl Move {
    fn new(name: impl Into<String>, from: u32, to: u32, cost: i32) -> Self {
        Self {
            name: name.into(),
            from,
            to,
            cost,
        }
    }
}

/// Task over one variable with `positions` values, starting at 0.
fn position_task(positions: u32, moves: Vec<Move>, goal: u32) -> Result<Task, TaskError> {
    let operators = moves
        .into_iter()
        .map(|m| Operator {
            name: m.name,
            cost: m.cost,
            preconditions: vec![Fact::new(0, m.from)],
            effects: vec![Fact::new(0, m.to)],
        })
        .collect();
    Task::new(
        vec![Variable {
            name: "position".into(),
            domain_size: positions,
        }],
        operators,
        vec![0],
        vec![Fact::new(0, goal)],
    )
}
