//! Lazy best-first search with deferred evaluation.
//!
//! Successors are not evaluated when generated. Each is queued as the edge
//! `(parent, operator)` under the parent's evaluator values, and the state
//! is only materialised, evaluated and expanded once the edge is popped.

use std::rc::Rc;

use waypoint_kernel::registry::StateLookup;
use waypoint_kernel::state::{OperatorId, State, StateId};

use crate::evaluation_context::{EdgeEntry, EdgeEvaluationContext};
use crate::evaluator::{EvaluatorRef, EvaluatorSet};
use crate::open_list::OpenList;
use crate::ordered_set::OrderedSet;
use crate::search_engine::{
    collect_preferred_operators, print_initial_evaluator_values, EngineCore, SearchAlgorithm,
    SearchStatus,
};

#[derive(Debug, Clone, Default)]
pub struct LazySearchOptions {
    /// Re-expand closed states reached again on a cheaper path.
    pub reopen_closed: bool,
    pub preferred: Vec<EvaluatorRef>,
    /// Queue successors reached by preferred operators before the others.
    pub preferred_successors_first: bool,
}

/// The state selected for expansion and how it was reached.
struct Current {
    state: State,
    predecessor: Option<StateId>,
    operator_id: OperatorId,
    g: i32,
    context: EdgeEvaluationContext,
}

pub struct LazySearch {
    open_list: Box<dyn OpenList<EdgeEntry>>,
    options: LazySearchOptions,
    path_dependent_evaluators: Vec<EvaluatorRef>,
    current: Option<Current>,
}

impl LazySearch {
    #[must_use]
    pub fn new(open_list: Box<dyn OpenList<EdgeEntry>>, options: LazySearchOptions) -> Self {
        Self {
            open_list,
            options,
            path_dependent_evaluators: Vec::new(),
            current: None,
        }
    }

    /// Context of a popped state. It counts as preferred since it has
    /// already been selected for expansion.
    fn context(&self, core: &EngineCore, state: &State) -> EdgeEvaluationContext {
        EdgeEvaluationContext::with_state(
            state.clone(),
            OperatorId::NO_OPERATOR,
            true,
            Some(Rc::clone(core.statistics())),
            !self.options.preferred.is_empty(),
        )
    }

    fn successor_operators(
        &self,
        core: &EngineCore,
        state: &State,
        preferred_operators: &OrderedSet<OperatorId>,
    ) -> Vec<OperatorId> {
        let applicable_ops = core.successor_generator().generate_applicable_ops(state);
        if !self.options.preferred_successors_first {
            return applicable_ops;
        }
        let (mut ordered, rest): (Vec<_>, Vec<_>) = applicable_ops
            .into_iter()
            .partition(|op| preferred_operators.contains(op));
        ordered.extend(rest);
        ordered
    }

    fn generate_successors(&mut self, core: &mut EngineCore, current: &mut Current) {
        let mut preferred_operators = OrderedSet::new();
        for evaluator in &self.options.preferred {
            collect_preferred_operators(&mut current.context, evaluator, &mut preferred_operators);
        }

        let successor_operators =
            self.successor_operators(core, &current.state, &preferred_operators);
        core.statistics().inc_generated_ops(successor_operators.len() as u64);
        for op in successor_operators {
            core.statistics().inc_generated();
            if core.exceeds_bound(&current.state, op) {
                continue;
            }
            let is_preferred = preferred_operators.contains(&op);
            let mut succ_context =
                EdgeEvaluationContext::from_context(&current.context, is_preferred, None, false);
            self.open_list.insert(&mut succ_context, EdgeEntry::new(current.state.id(), op));
        }
    }

    /// Pop the next edge and materialise its target as the current state.
    fn fetch_next_state(&mut self, core: &mut EngineCore) -> SearchStatus {
        let Some(EdgeEntry {
            state_id: predecessor_id,
            operator_id,
        }) = self.open_list.remove_min()
        else {
            tracing::info!("Completely explored state space -- no solution!");
            return SearchStatus::Failed;
        };

        let predecessor = core.registry().lookup_state(predecessor_id);
        debug_assert!(core.task().is_applicable(operator_id, &predecessor));
        let state = core.registry_mut().get_successor_state(&predecessor, operator_id);
        let predecessor_node = core.search_space().node(predecessor_id);
        let cost = core.get_adjusted_cost(operator_id);
        let context = self.context(core, &state);
        self.current = Some(Current {
            state,
            predecessor: Some(predecessor_id),
            operator_id,
            g: predecessor_node.g.saturating_add(cost),
            context,
        });
        SearchStatus::InProgress
    }

    /// Evaluate, open and expand `current`. Returns `Solved` if it is a
    /// goal.
    fn process(&mut self, core: &mut EngineCore, current: &mut Current) -> SearchStatus {
        let node = core.search_space().node(current.state.id());
        let reopen = self.options.reopen_closed
            && !node.is_new()
            && !node.is_dead_end()
            && current.g < node.g;
        if !(node.is_new() || reopen) {
            return SearchStatus::InProgress;
        }

        if let Some(predecessor_id) = current.predecessor {
            let predecessor = core.registry().lookup_state(predecessor_id);
            for evaluator in &self.path_dependent_evaluators {
                evaluator.notify_state_transition(
                    &predecessor,
                    current.operator_id,
                    &current.state,
                );
            }
        }

        core.statistics().inc_evaluated_states(1);
        if self.open_list.is_dead_end(&mut current.context) {
            core.search_space_mut().mark_as_dead_end(&current.state);
            core.statistics().inc_dead_ends();
            return SearchStatus::InProgress;
        }

        match current.predecessor {
            None => core.search_space_mut().open_initial(&current.state),
            Some(predecessor_id) => {
                let predecessor = core.registry().lookup_state(predecessor_id);
                let (op, cost) = (current.operator_id, core.get_adjusted_cost(current.operator_id));
                let search_space = core.search_space_mut();
                if reopen {
                    search_space.reopen(&current.state, &predecessor, op, cost);
                    core.statistics().inc_reopened();
                } else {
                    search_space.open(&current.state, &predecessor, op, cost);
                }
            }
        }
        core.search_space_mut().close(&current.state);
        if core.check_goal_and_set_plan(&current.state) {
            return SearchStatus::Solved;
        }
        if core.progress_mut().check_progress(&current.context) {
            core.statistics().print_checkpoint_line(current.g);
            self.open_list.boost_preferred();
        }
        self.generate_successors(core, current);
        core.statistics().inc_expanded();
        SearchStatus::InProgress
    }
}

impl SearchAlgorithm for LazySearch {
    fn initialize(&mut self, core: &mut EngineCore) {
        tracing::info!(
            "Conducting lazy best first search, (real) bound = {}",
            core.bound()
        );

        let mut evals = EvaluatorSet::new();
        self.open_list.get_path_dependent_evaluators(&mut evals);
        for evaluator in self.options.preferred.iter().chain(core.real_g_evaluator()) {
            Rc::clone(evaluator).get_path_dependent_evaluators(&mut evals);
        }
        self.path_dependent_evaluators = evals.into_vec();

        let initial_state = core.registry_mut().initial_state();
        for evaluator in &self.path_dependent_evaluators {
            evaluator.notify_initial_state(&initial_state);
        }
        let context = self.context(core, &initial_state);
        self.current = Some(Current {
            state: initial_state,
            predecessor: None,
            operator_id: OperatorId::NO_OPERATOR,
            g: 0,
            context,
        });
    }

    fn step(&mut self, core: &mut EngineCore) -> SearchStatus {
        let Some(mut current) = self.current.take() else {
            return self.fetch_next_state(core);
        };
        let status = self.process(core, &mut current);
        if current.predecessor.is_none() {
            print_initial_evaluator_values(&current.context);
        }
        if status == SearchStatus::Solved {
            return status;
        }
        self.fetch_next_state(core)
    }

    fn print_statistics(&self, core: &EngineCore) {
        core.statistics().print_detailed_statistics();
        tracing::info!("Number of registered states: {}", core.registry().len());
    }
}
