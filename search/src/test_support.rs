//! Shared fixtures for unit tests: small tasks and stub evaluators.

use std::cell::Cell;
use std::rc::Rc;

use waypoint_kernel::registry::StateRegistry;
use waypoint_kernel::state::OperatorId;
use waypoint_kernel::task::{Fact, Operator, Task, Variable};

use crate::evaluation_context::{
    ContextEntry, EdgeEvaluationContext, EvaluationContext, StateEntry, StateEvaluationContext,
};
use crate::evaluation_result::EvaluationResult;
use crate::evaluator::{Evaluator, EvaluatorBase, EvaluatorFlags};

pub(crate) fn single_variable_task(
    domain_size: u32,
    operators: Vec<Operator>,
    goal: u32,
) -> Rc<Task> {
    Rc::new(
        Task::new(
            vec![Variable {
                name: "at".into(),
                domain_size,
            }],
            operators,
            vec![0],
            vec![Fact::new(0, goal)],
        )
        .unwrap(),
    )
}

pub(crate) fn move_op(name: &str, from: u32, to: u32, cost: i32) -> Operator {
    Operator {
        name: name.into(),
        cost,
        preconditions: vec![Fact::new(0, from)],
        effects: vec![Fact::new(0, to)],
    }
}

/// S0 -(3)-> S1 -(4)-> S2 and S0 -(5)-> S2; goal S2.
///
/// Operators are `op0 = s0-s1`, `op1 = s1-s2`, `op2 = s0-s2`.
pub(crate) fn detour_task() -> Rc<Task> {
    single_variable_task(
        3,
        vec![
            move_op("s0-s1", 0, 1, 3),
            move_op("s1-s2", 1, 2, 4),
            move_op("s0-s2", 0, 2, 5),
        ],
        2,
    )
}

/// Unit-cost chain 0 -> 1 -> ... -> `length`; goal `length`.
pub(crate) fn line_task(length: u32) -> Rc<Task> {
    let operators = (0..length)
        .map(|i| move_op(&format!("step-{i}"), i, i + 1, 1))
        .collect();
    single_variable_task(length + 1, operators, length)
}

pub(crate) fn context_for_initial_state(task: &Rc<Task>) -> StateEvaluationContext {
    let mut registry = StateRegistry::new(Rc::clone(task));
    let initial = registry.initial_state();
    StateEvaluationContext::new(StateEntry(initial.id()), &registry, false, None, false)
}

/// Returns a fixed value and counts how often it was computed.
pub(crate) struct CountingEvaluator {
    base: EvaluatorBase,
    value: i32,
    calls: Cell<usize>,
    preferred: Vec<OperatorId>,
}

impl CountingEvaluator {
    pub(crate) fn new(value: i32) -> Self {
        Self {
            base: EvaluatorBase::new("counting", EvaluatorFlags::HEURISTIC),
            value,
            calls: Cell::new(0),
            preferred: Vec::new(),
        }
    }

    pub(crate) fn with_preferred(mut self, preferred: Vec<OperatorId>) -> Self {
        self.preferred = preferred;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.get()
    }

    fn compute<E: ContextEntry>(&self, context: &EvaluationContext<E>) -> EvaluationResult {
        self.calls.set(self.calls.get() + 1);
        let mut result = EvaluationResult::with_value(self.value);
        result.set_count_evaluation(true);
        if context.get_calculate_preferred() {
            result.set_preferred_operators(self.preferred.clone());
        }
        result
    }
}

impl Evaluator for CountingEvaluator {
    fn base(&self) -> &EvaluatorBase {
        &self.base
    }

    fn compute_state_result(&self, context: &mut StateEvaluationContext) -> EvaluationResult {
        self.compute(context)
    }

    fn compute_edge_result(&self, context: &mut EdgeEvaluationContext) -> EvaluationResult {
        self.compute(context)
    }
}

/// Always infinite.
pub(crate) struct InfiniteEvaluator {
    base: EvaluatorBase,
    reliable: bool,
}

impl InfiniteEvaluator {
    pub(crate) fn new(reliable: bool) -> Self {
        Self {
            base: EvaluatorBase::new("infinite", EvaluatorFlags::HEURISTIC),
            reliable,
        }
    }
}

impl Evaluator for InfiniteEvaluator {
    fn base(&self) -> &EvaluatorBase {
        &self.base
    }

    fn compute_state_result(&self, _context: &mut StateEvaluationContext) -> EvaluationResult {
        EvaluationResult::infinite()
    }

    fn compute_edge_result(&self, _context: &mut EdgeEvaluationContext) -> EvaluationResult {
        EvaluationResult::infinite()
    }

    fn dead_ends_are_reliable(&self) -> bool {
        self.reliable
    }
}
