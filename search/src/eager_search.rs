//! Eager best-first search.
//!
//! Successors are evaluated when they are generated, so the open list holds
//! states keyed by their own evaluator values. With an open list keyed on
//! `g + h` this is A*, with `h` alone greedy best-first search.

use std::rc::Rc;

use waypoint_kernel::registry::StateLookup;
use waypoint_kernel::state::{OperatorId, State};

use crate::evaluation_context::{StateEntry, StateEvaluationContext};
use crate::evaluator::{EvaluatorRef, EvaluatorSet};
use crate::open_list::OpenList;
use crate::ordered_set::OrderedSet;
use crate::search_engine::{
    collect_preferred_operators, print_initial_evaluator_values, EngineCore, SearchAlgorithm,
    SearchStatus,
};

#[derive(Debug, Clone, Default)]
pub struct EagerSearchOptions {
    /// Reopen closed states when a cheaper path to them is found.
    pub reopen_closed: bool,
    /// Evaluator whose value layers are reported as f-value progress.
    pub f_evaluator: Option<EvaluatorRef>,
    /// Sources of preferred operators for successor marking.
    pub preferred: Vec<EvaluatorRef>,
}

pub struct EagerSearch {
    open_list: Box<dyn OpenList<StateEntry>>,
    options: EagerSearchOptions,
    path_dependent_evaluators: Vec<EvaluatorRef>,
}

impl EagerSearch {
    #[must_use]
    pub fn new(open_list: Box<dyn OpenList<StateEntry>>, options: EagerSearchOptions) -> Self {
        Self {
            open_list,
            options,
            path_dependent_evaluators: Vec::new(),
        }
    }

    fn context(
        core: &EngineCore,
        state: &State,
        is_preferred: bool,
        calculate_preferred: bool,
    ) -> StateEvaluationContext {
        StateEvaluationContext::with_state(
            state.clone(),
            OperatorId::NO_OPERATOR,
            is_preferred,
            Some(Rc::clone(core.statistics())),
            calculate_preferred,
        )
    }

    fn update_f_value_statistics(&self, core: &EngineCore, context: &mut StateEvaluationContext) {
        if let Some(f_evaluator) = &self.options.f_evaluator {
            if !context.is_evaluator_value_infinite(f_evaluator) {
                let f = context.get_evaluator_value(f_evaluator);
                core.statistics().report_f_value_progress(f);
            }
        }
    }

    /// Pop states until one that is not closed yet; close it.
    fn fetch_next_node(&mut self, core: &mut EngineCore) -> Option<State> {
        while let Some(StateEntry(id)) = self.open_list.remove_min() {
            if core.search_space().node(id).is_closed() {
                continue;
            }
            let state = core.registry().lookup_state(id);
            let mut context = Self::context(core, &state, false, false);
            core.search_space_mut().close(&state);
            self.update_f_value_statistics(core, &mut context);
            core.statistics().inc_expanded();
            return Some(state);
        }
        None
    }

    fn expand(&mut self, core: &mut EngineCore, state: &State) {
        let node = core.search_space().node(state.id());
        let applicable_ops = core.successor_generator().generate_applicable_ops(state);
        core.statistics().inc_generated_ops(applicable_ops.len() as u64);

        // Evaluated again, this time asking for preferred operators.
        let mut context = Self::context(core, state, false, true);
        let mut preferred_operators = OrderedSet::new();
        for evaluator in &self.options.preferred {
            collect_preferred_operators(&mut context, evaluator, &mut preferred_operators);
        }

        for op in applicable_ops {
            if core.exceeds_bound(state, op) {
                continue;
            }
            let cost = core.get_adjusted_cost(op);
            let succ_state = core.registry_mut().get_successor_state(state, op);
            core.statistics().inc_generated();
            let is_preferred = preferred_operators.contains(&op);

            for evaluator in &self.path_dependent_evaluators {
                evaluator.notify_state_transition(state, op, &succ_state);
            }

            let succ_node = core.search_space().node(succ_state.id());
            if succ_node.is_dead_end() {
                continue;
            }

            let succ_g = node.g.saturating_add(cost);
            if succ_node.is_new() {
                let mut succ_context = Self::context(core, &succ_state, is_preferred, false);
                core.statistics().inc_evaluated_states(1);
                if self.open_list.is_dead_end(&mut succ_context) {
                    core.search_space_mut().mark_as_dead_end(&succ_state);
                    core.statistics().inc_dead_ends();
                    continue;
                }
                core.search_space_mut().open(&succ_state, state, op, cost);
                self.open_list.insert(&mut succ_context, StateEntry(succ_state.id()));
                if core.progress_mut().check_progress(&succ_context) {
                    core.statistics().print_checkpoint_line(succ_g);
                    self.open_list.boost_preferred();
                }
            } else if succ_node.g > succ_g {
                if self.options.reopen_closed {
                    if succ_node.is_closed() {
                        core.statistics().inc_reopened();
                    }
                    core.search_space_mut().reopen(&succ_state, state, op, cost);
                    let mut succ_context = Self::context(core, &succ_state, is_preferred, false);
                    self.open_list.insert(&mut succ_context, StateEntry(succ_state.id()));
                } else {
                    core.search_space_mut().update_parent(&succ_state, state, op, cost);
                }
            }
        }
    }
}

impl SearchAlgorithm for EagerSearch {
    fn initialize(&mut self, core: &mut EngineCore) {
        tracing::info!(
            "Conducting best first search {} reopening closed nodes, (real) bound = {}",
            if self.options.reopen_closed {
                "with"
            } else {
                "without"
            },
            core.bound()
        );

        let mut evals = EvaluatorSet::new();
        self.open_list.get_path_dependent_evaluators(&mut evals);
        for evaluator in self
            .options
            .preferred
            .iter()
            .chain(&self.options.f_evaluator)
            .chain(core.real_g_evaluator())
        {
            Rc::clone(evaluator).get_path_dependent_evaluators(&mut evals);
        }
        self.path_dependent_evaluators = evals.into_vec();

        let initial_state = core.registry_mut().initial_state();
        for evaluator in &self.path_dependent_evaluators {
            evaluator.notify_initial_state(&initial_state);
        }

        // The initial state counts as reached by a preferred operator.
        let mut context = Self::context(core, &initial_state, true, false);
        core.statistics().inc_evaluated_states(1);
        if self.open_list.is_dead_end(&mut context) {
            tracing::info!("Initial state is a dead end.");
        } else {
            if core.progress_mut().check_progress(&context) {
                core.statistics().print_checkpoint_line(0);
            }
            self.update_f_value_statistics(core, &mut context);
            core.search_space_mut().open_initial(&initial_state);
            self.open_list.insert(&mut context, StateEntry(initial_state.id()));
        }
        print_initial_evaluator_values(&context);
    }

    fn step(&mut self, core: &mut EngineCore) -> SearchStatus {
        let Some(state) = self.fetch_next_node(core) else {
            tracing::info!("Completely explored state space -- no solution!");
            return SearchStatus::Failed;
        };
        if core.check_goal_and_set_plan(&state) {
            return SearchStatus::Solved;
        }
        self.expand(core, &state);
        SearchStatus::InProgress
    }

    fn print_statistics(&self, core: &EngineCore) {
        core.statistics().print_detailed_statistics();
        tracing::info!("Number of registered states: {}", core.registry().len());
    }
}
