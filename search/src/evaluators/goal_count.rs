//! Goal-count heuristic: the number of unsatisfied goal facts.

use std::rc::Rc;

use waypoint_kernel::state::{OperatorId, State};
use waypoint_kernel::task::Task;

use crate::heuristic::{Heuristic, HeuristicFunction, HeuristicOptions};
use crate::ordered_set::OrderedSet;

/// Counts goal facts that do not hold. Operators applicable in the state
/// that achieve one of them are preferred.
#[derive(Debug)]
pub struct GoalCount {
    task: Rc<Task>,
}

impl GoalCount {
    #[must_use]
    pub fn new(task: Rc<Task>) -> Self {
        Self { task }
    }
}

impl HeuristicFunction for GoalCount {
    fn compute_heuristic(
        &self,
        state: &State,
        preferred: Option<&mut OrderedSet<OperatorId>>,
    ) -> i32 {
        let unsatisfied: Vec<_> = self
            .task
            .goals()
            .iter()
            .filter(|goal| !goal.holds_in(state))
            .collect();

        if let Some(preferred) = preferred {
            for (index, op) in self.task.operators().iter().enumerate() {
                let id = OperatorId::new(index);
                let achieves_goal = op.effects.iter().any(|effect| unsatisfied.contains(&effect));
                if achieves_goal && self.task.is_applicable(id, state) {
                    preferred.insert(id);
                }
            }
        }

        i32::try_from(unsatisfied.len()).unwrap_or(i32::MAX)
    }
}

pub type GoalCountHeuristic = Heuristic<GoalCount>;

impl Heuristic<GoalCount> {
    #[must_use]
    pub fn goal_count(task: Rc<Task>, options: HeuristicOptions) -> Self {
        Self::new(GoalCount::new(task), options, "goalcount")
    }
}
