//! The search loop and its status machine.
//!
//! [`SearchEngine`] owns everything a search shares across steps in an
//! [`EngineCore`] and drives a [`SearchAlgorithm`]: `initialize` once, then
//! `step` until the status leaves [`SearchStatus::InProgress`]. The wall
//! clock is checked between steps only, so a single slow step can overrun
//! `max_time`.
//!
//! ```text
//! InProgress ──step──▶ Solved | Failed
//!      │
//!      └──timer expired after a step──▶ Timeout
//! ```
//!
//! All three terminal states are final; the plan is attached exactly once,
//! on the way into `Solved`.

use std::path::PathBuf;
use std::rc::Rc;

use waypoint_kernel::cost::OperatorCost;
use waypoint_kernel::registry::StateRegistry;
use waypoint_kernel::state::{OperatorId, State};
use waypoint_kernel::successor::SuccessorGenerator;
use waypoint_kernel::task::Task;

use crate::error::SearchError;
use crate::evaluation_context::{ContextEntry, EdgeEvaluationContext, EvaluationContext};
use crate::evaluator::EvaluatorRef;
use crate::evaluators::g_evaluator::{GEvaluator, GEvaluatorOptions};
use crate::options::{MaxTime, SearchEngineOptions, Verbosity};
use crate::ordered_set::OrderedSet;
use crate::plan::{Plan, PlanManager};
use crate::search_progress::SearchProgress;
use crate::search_space::SearchSpace;
use crate::statistics::SearchStatistics;
use crate::timer::CountdownTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchStatus {
    InProgress,
    Timeout,
    Failed,
    Solved,
}

impl SearchStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self != Self::InProgress
    }
}

/// A concrete search algorithm: the part of a search the engine loop does
/// not know about.
pub trait SearchAlgorithm {
    /// Set up open lists and evaluate the initial state.
    fn initialize(&mut self, core: &mut EngineCore);

    /// Do one unit of work, usually one expansion. Returning anything but
    /// [`SearchStatus::InProgress`] ends the search.
    fn step(&mut self, core: &mut EngineCore) -> SearchStatus;

    fn print_statistics(&self, core: &EngineCore) {
        core.statistics().print_detailed_statistics();
    }
}

/// State shared by the engine loop and the algorithm it drives.
#[derive(Debug)]
pub struct EngineCore {
    task: Rc<Task>,
    registry: StateRegistry,
    successor_generator: SuccessorGenerator,
    search_space: SearchSpace,
    progress: SearchProgress,
    statistics: Rc<SearchStatistics>,
    real_g_evaluator: Option<EvaluatorRef>,
    bound: i32,
    max_time: MaxTime,
    verbosity: Verbosity,
    cost_type: OperatorCost,
    plan: Option<Plan>,
    plan_manager: PlanManager,
}

impl EngineCore {
    /// # Errors
    ///
    /// Returns [`SearchError::NegativeBound`] or
    /// [`SearchError::NegativeMaxTime`] for invalid options, and
    /// [`SearchError::UncachedRealCostEvaluator`] if the real-cost evaluator
    /// built for a finite bound does not cache its estimates.
    pub fn new(task: Rc<Task>, options: SearchEngineOptions) -> Result<Self, SearchError> {
        let bound = options.bound.value();
        if bound < 0 {
            return Err(SearchError::NegativeBound {
                bound: i64::from(bound),
            });
        }
        if !options.max_time.is_valid() {
            return Err(SearchError::NegativeMaxTime {
                max_time: options.max_time.as_seconds().unwrap_or_default(),
            });
        }

        let real_g_evaluator: Option<EvaluatorRef> = if options.bound.is_infinite() {
            None
        } else {
            let real_g = GEvaluator::new(
                Rc::clone(&task),
                GEvaluatorOptions {
                    cost_type: OperatorCost::Normal,
                    cache_estimates: true,
                },
                "real_g",
            );
            Some(Rc::new(real_g))
        };
        if let Some(real_g) = &real_g_evaluator {
            if !real_g.does_cache_estimates() {
                return Err(SearchError::UncachedRealCostEvaluator {
                    description: real_g.description().to_string(),
                });
            }
        }

        tracing::info!(
            variables = task.variables().len(),
            operators = task.operators().len(),
            goals = task.goals().len(),
            unit_cost = task.is_unit_cost(),
            "task loaded"
        );

        Ok(Self {
            registry: StateRegistry::new(Rc::clone(&task)),
            successor_generator: SuccessorGenerator::new(Rc::clone(&task)),
            task,
            search_space: SearchSpace::new(),
            progress: SearchProgress::new(options.verbosity),
            statistics: Rc::new(SearchStatistics::new(options.verbosity)),
            real_g_evaluator,
            bound,
            max_time: options.max_time,
            verbosity: options.verbosity,
            cost_type: options.cost_type,
            plan: None,
            plan_manager: PlanManager::new(),
        })
    }

    #[must_use]
    pub fn task(&self) -> &Rc<Task> {
        &self.task
    }

    #[must_use]
    pub fn registry(&self) -> &StateRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut StateRegistry {
        &mut self.registry
    }

    #[must_use]
    pub fn successor_generator(&self) -> &SuccessorGenerator {
        &self.successor_generator
    }

    #[must_use]
    pub fn search_space(&self) -> &SearchSpace {
        &self.search_space
    }

    pub fn search_space_mut(&mut self) -> &mut SearchSpace {
        &mut self.search_space
    }

    pub fn progress_mut(&mut self) -> &mut SearchProgress {
        &mut self.progress
    }

    #[must_use]
    pub fn statistics(&self) -> &Rc<SearchStatistics> {
        &self.statistics
    }

    /// Path cost over the original operator costs; present iff the bound is
    /// finite.
    #[must_use]
    pub fn real_g_evaluator(&self) -> Option<&EvaluatorRef> {
        self.real_g_evaluator.as_ref()
    }

    /// Exclusive bound on real path cost.
    #[must_use]
    pub fn bound(&self) -> i32 {
        self.bound
    }

    #[must_use]
    pub fn max_time(&self) -> MaxTime {
        self.max_time
    }

    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    #[must_use]
    pub fn cost_type(&self) -> OperatorCost {
        self.cost_type
    }

    /// Cost of `operator_id` under the engine's cost type.
    #[must_use]
    pub fn get_adjusted_cost(&self, operator_id: OperatorId) -> i32 {
        self.task.operator_cost(operator_id, self.cost_type)
    }

    /// Whether applying `operator_id` in `state` reaches the exclusive
    /// bound. The candidate path is costed by the real-cost evaluator on the
    /// edge `(state, operator_id)`, before any transition is notified; with
    /// an infinite bound nothing is pruned.
    ///
    /// `state` must already be known to the path-dependent evaluators.
    #[must_use]
    pub fn exceeds_bound(&self, state: &State, operator_id: OperatorId) -> bool {
        let Some(real_g) = &self.real_g_evaluator else {
            return false;
        };
        let mut context = EdgeEvaluationContext::with_state(
            state.clone(),
            operator_id,
            false,
            Some(Rc::clone(&self.statistics)),
            false,
        );
        context.get_evaluator_value_or_infinity(real_g) >= self.bound
    }

    /// If `state` is a goal, trace the path to it and record it as the plan.
    ///
    /// # Panics
    ///
    /// Panics if a plan was already recorded.
    pub fn check_goal_and_set_plan(&mut self, state: &State) -> bool {
        if !self.task.is_goal_state(state) {
            return false;
        }
        tracing::info!("Solution found!");
        let plan = self.search_space.trace_path(state);
        assert!(self.plan.is_none(), "plan is set exactly once per search");
        self.plan = Some(plan);
        true
    }

    #[must_use]
    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    #[must_use]
    pub fn found_solution(&self) -> bool {
        self.plan.is_some()
    }

    pub fn plan_manager_mut(&mut self) -> &mut PlanManager {
        &mut self.plan_manager
    }
}

/// The step loop around an algorithm.
#[derive(Debug)]
pub struct SearchEngine<A> {
    core: EngineCore,
    algorithm: A,
    status: SearchStatus,
    steps: u64,
}

impl<A: SearchAlgorithm> SearchEngine<A> {
    /// # Errors
    ///
    /// Fails on invalid options; see [`EngineCore::new`].
    pub fn new(
        task: Rc<Task>,
        options: SearchEngineOptions,
        algorithm: A,
    ) -> Result<Self, SearchError> {
        Ok(Self {
            core: EngineCore::new(task, options)?,
            algorithm,
            status: SearchStatus::InProgress,
            steps: 0,
        })
    }

    /// Run the search to a terminal status.
    pub fn search(&mut self) -> SearchStatus {
        self.algorithm.initialize(&mut self.core);
        let timer = CountdownTimer::new(self.core.max_time.duration());
        while self.status == SearchStatus::InProgress {
            self.status = self.algorithm.step(&mut self.core);
            self.steps += 1;
            if self.status == SearchStatus::InProgress && timer.is_expired() {
                tracing::info!("Time limit reached. Abort search.");
                self.status = SearchStatus::Timeout;
            }
        }
        tracing::info!(
            "Actual search time: {:.6}s",
            timer.elapsed().as_secs_f64()
        );
        self.status
    }

    #[must_use]
    pub fn get_status(&self) -> SearchStatus {
        self.status
    }

    #[must_use]
    pub fn found_solution(&self) -> bool {
        self.core.found_solution()
    }

    /// The plan of a solved search.
    ///
    /// # Panics
    ///
    /// Panics if no solution was found.
    #[must_use]
    pub fn get_plan(&self) -> &Plan {
        let Some(plan) = self.core.plan() else {
            panic!("get_plan called on a search without solution");
        };
        plan
    }

    /// Number of completed `step` calls.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Write the plan if one was found; returns the file written.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::PlanWrite`] if the file cannot be written.
    pub fn save_plan_if_necessary(&mut self) -> Result<Option<PathBuf>, SearchError> {
        let core = &mut self.core;
        let Some(plan) = &core.plan else {
            return Ok(None);
        };
        core.plan_manager
            .save_plan(plan, &core.task, false)
            .map(Some)
    }

    pub fn print_statistics(&self) {
        self.algorithm.print_statistics(&self.core);
    }

    #[must_use]
    pub fn core(&self) -> &EngineCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut EngineCore {
        &mut self.core
    }

    #[must_use]
    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }
}

/// Log the initial value of every reporting evaluator already computed in
/// `context`.
pub fn print_initial_evaluator_values<E: ContextEntry>(context: &EvaluationContext<E>) {
    for (evaluator, result) in context.get_cache().iter() {
        if evaluator.is_used_for_reporting_minima() {
            evaluator.report_value_for_initial_state(result);
        }
    }
}

/// Add the preferred operators of `evaluator` to `preferred_operators`,
/// unless its value is infinite.
pub fn collect_preferred_operators<E: ContextEntry>(
    context: &mut EvaluationContext<E>,
    evaluator: &EvaluatorRef,
    preferred_operators: &mut OrderedSet<OperatorId>,
) {
    if !context.is_evaluator_value_infinite(evaluator) {
        preferred_operators.extend(context.get_preferred_operators(evaluator).iter().copied());
    }
}
