//! Path-cost ("g") evaluator.
//!
//! The g value of a state is not a function of the state: it is the cost of
//! the best path found to it so far. The evaluator therefore keeps its own
//! per-state cache, seeded by `notify_initial_state` and relaxed by
//! `notify_state_transition`.

use std::cell::RefCell;
use std::rc::Rc;

use waypoint_kernel::cost::OperatorCost;
use waypoint_kernel::state::{OperatorId, State};
use waypoint_kernel::task::Task;

use crate::evaluation_context::{EdgeEvaluationContext, StateEvaluationContext};
use crate::evaluation_result::EvaluationResult;
use crate::evaluator::{Evaluator, EvaluatorBase, EvaluatorFlags, EvaluatorSet};
use crate::heuristic::{HeuristicCache, HeuristicCacheEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GEvaluatorOptions {
    /// Cost transformation applied to operator costs.
    pub cost_type: OperatorCost,
    pub cache_estimates: bool,
}

impl Default for GEvaluatorOptions {
    fn default() -> Self {
        Self {
            cost_type: OperatorCost::Normal,
            cache_estimates: true,
        }
    }
}

pub struct GEvaluator {
    base: EvaluatorBase,
    task: Rc<Task>,
    options: GEvaluatorOptions,
    cache: RefCell<HeuristicCache>,
}

impl GEvaluator {
    #[must_use]
    pub fn new(task: Rc<Task>, options: GEvaluatorOptions, description: impl Into<String>) -> Self {
        Self {
            base: EvaluatorBase::new(description, EvaluatorFlags::HEURISTIC),
            task,
            options,
            cache: RefCell::new(HeuristicCache::new()),
        }
    }

    /// Original costs, caching on.
    #[must_use]
    pub fn with_defaults(task: Rc<Task>) -> Self {
        Self::new(task, GEvaluatorOptions::default(), "g")
    }

    /// Best known g value and dirty flag for `state`.
    #[must_use]
    pub fn cache_entry(&self, state: &State) -> HeuristicCacheEntry {
        self.cache.borrow().get(state.id())
    }

    fn known_g(&self, state: &State) -> i32 {
        let g = self.cache.borrow().get(state.id()).h;
        assert!(
            g != HeuristicCache::NO_VALUE,
            "{} has no g value for state {}; was the search notified of its path?",
            self.base.description(),
            state.id()
        );
        g
    }

    /// Value of a node reached without a new operator: the cached g, which
    /// is now settled.
    fn settle(&self, state: &State) -> EvaluationResult {
        let g = self.known_g(state);
        self.cache.borrow_mut().entry_mut(state.id()).dirty = false;
        EvaluationResult::with_value(g)
    }

    fn cost(&self, operator_id: OperatorId) -> i32 {
        self.task.operator_cost(operator_id, self.options.cost_type)
    }
}

fn add_cost(g: i32, cost: i32) -> i32 {
    g.saturating_add(cost).min(EvaluationResult::MAX_FINITE)
}

impl Evaluator for GEvaluator {
    fn base(&self) -> &EvaluatorBase {
        &self.base
    }

    fn compute_state_result(&self, context: &mut StateEvaluationContext) -> EvaluationResult {
        self.settle(context.get_state())
    }

    /// For an edge `(parent, op)` the value is `g(parent) + cost(op)`, the
    /// cost of the candidate path before it is committed to.
    fn compute_edge_result(&self, context: &mut EdgeEvaluationContext) -> EvaluationResult {
        let operator_id = context.get_operator_id();
        if operator_id.is_no_operator() {
            return self.settle(context.get_state());
        }
        let g = self.known_g(context.get_state());
        let mut result = EvaluationResult::with_value(add_cost(g, self.cost(operator_id)));
        result.set_count_evaluation(true);
        result
    }

    fn get_path_dependent_evaluators(self: Rc<Self>, evals: &mut EvaluatorSet) {
        evals.insert(self);
    }

    fn does_cache_estimates(&self) -> bool {
        self.options.cache_estimates
    }

    fn notify_initial_state(&self, initial_state: &State) {
        *self.cache.borrow_mut().entry_mut(initial_state.id()) =
            HeuristicCacheEntry { h: 0, dirty: true };
    }

    /// Relax `state` through `parent_state`: keep the new path only if it is
    /// the first one or strictly cheaper.
    fn notify_state_transition(
        &self,
        parent_state: &State,
        operator_id: OperatorId,
        state: &State,
    ) {
        let parent_g = self.known_g(parent_state);
        let new_g = add_cost(parent_g, self.cost(operator_id));
        let mut cache = self.cache.borrow_mut();
        let entry = cache.entry_mut(state.id());
        if entry.h == HeuristicCache::NO_VALUE || new_g < entry.h {
            *entry = HeuristicCacheEntry {
                h: new_g,
                dirty: true,
            };
        }
    }
}
