//! Evaluation contexts: what an evaluator sees of a node, plus the per-node
//! result cache.
//!
//! A context serves two purposes:
//!
//! 1. It packages the information evaluators and open lists need for one
//!    evaluation: the state, the incoming operator (for edge contexts) and
//!    whether the node was reached by a preferred operator.
//! 2. It memoizes evaluator results, so an evaluator queried by several open
//!    lists, tie-breakers, the progress tracker and preferred-operator
//!    collection is still computed once, and call sites need not know in
//!    advance which evaluators will be asked.
//!
//! Contexts come in two flavors, selected by the [`ContextEntry`] type
//! parameter: [`StateEvaluationContext`] (a state alone) and
//! [`EdgeEvaluationContext`] (a state plus the operator applied to it).

use std::marker::PhantomData;
use std::rc::Rc;

use waypoint_kernel::registry::StateLookup;
use waypoint_kernel::state::{OperatorId, State, StateId};

use crate::evaluation_result::EvaluationResult;
use crate::evaluator::{Evaluator, EvaluatorRef};
use crate::evaluator_cache::EvaluatorCache;
use crate::statistics::SearchStatistics;

/// How a context identifies its node, and which evaluator entry point it
/// dispatches to.
pub trait ContextEntry: Copy + std::fmt::Debug {
    /// Whether nodes of this flavor carry an incoming operator.
    const HAS_OPERATOR: bool;

    fn state_id(&self) -> StateId;

    /// The incoming operator, or [`OperatorId::NO_OPERATOR`].
    fn operator_id(&self) -> OperatorId;

    fn compute_result(
        evaluator: &dyn Evaluator,
        context: &mut EvaluationContext<Self>,
    ) -> EvaluationResult;
}

/// A node identified by its state alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateEntry(pub StateId);

/// A node identified by a state and the operator applied to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeEntry {
    pub state_id: StateId,
    pub operator_id: OperatorId,
}

impl EdgeEntry {
    #[must_use]
    pub const fn new(state_id: StateId, operator_id: OperatorId) -> Self {
        Self {
            state_id,
            operator_id,
        }
    }
}

impl ContextEntry for StateEntry {
    const HAS_OPERATOR: bool = false;

    fn state_id(&self) -> StateId {
        self.0
    }

    fn operator_id(&self) -> OperatorId {
        OperatorId::NO_OPERATOR
    }

    fn compute_result(
        evaluator: &dyn Evaluator,
        context: &mut StateEvaluationContext,
    ) -> EvaluationResult {
        evaluator.compute_state_result(context)
    }
}

impl ContextEntry for EdgeEntry {
    const HAS_OPERATOR: bool = true;

    fn state_id(&self) -> StateId {
        self.state_id
    }

    fn operator_id(&self) -> OperatorId {
        self.operator_id
    }

    fn compute_result(
        evaluator: &dyn Evaluator,
        context: &mut EdgeEvaluationContext,
    ) -> EvaluationResult {
        evaluator.compute_edge_result(context)
    }
}

pub type StateEvaluationContext = EvaluationContext<StateEntry>;
pub type EdgeEvaluationContext = EvaluationContext<EdgeEntry>;

/// A node under evaluation together with its result cache.
///
/// The context holds its own copy of the state, so it stays valid however
/// the registry changes. The cache is exclusively owned unless the context
/// was built with [`EvaluationContext::from_context`], which starts from a
/// shallow copy of another context's cache.
#[derive(Debug)]
pub struct EvaluationContext<E: ContextEntry> {
    cache: EvaluatorCache,
    state: State,
    operator_id: OperatorId,
    preferred: bool,
    statistics: Option<Rc<SearchStatistics>>,
    calculate_preferred: bool,
    entry: PhantomData<E>,
}

impl<E: ContextEntry> EvaluationContext<E> {
    /// Fresh cache for the node `entry`, materialising its state through
    /// `registry`. Used for example by eager search.
    pub fn new(
        entry: E,
        registry: &dyn StateLookup,
        is_preferred: bool,
        statistics: Option<Rc<SearchStatistics>>,
        calculate_preferred: bool,
    ) -> Self {
        Self::with_state(
            registry.lookup_state(entry.state_id()),
            entry.operator_id(),
            is_preferred,
            statistics,
            calculate_preferred,
        )
    }

    /// Like [`EvaluationContext::new`] for callers that do not care about
    /// preferredness, e.g. when sampling states.
    pub fn without_preference(
        entry: E,
        registry: &dyn StateLookup,
        statistics: Option<Rc<SearchStatistics>>,
        calculate_preferred: bool,
    ) -> Self {
        Self::new(entry, registry, false, statistics, calculate_preferred)
    }

    /// Fresh cache with explicitly supplied node data.
    ///
    /// # Panics
    ///
    /// Panics if a state context is given a real operator.
    #[must_use]
    pub fn with_state(
        state: State,
        operator_id: OperatorId,
        is_preferred: bool,
        statistics: Option<Rc<SearchStatistics>>,
        calculate_preferred: bool,
    ) -> Self {
        assert!(
            E::HAS_OPERATOR || operator_id.is_no_operator(),
            "state evaluation context cannot carry operator {operator_id}"
        );
        Self {
            cache: EvaluatorCache::new(),
            state,
            operator_id,
            preferred: is_preferred,
            statistics,
            calculate_preferred,
            entry: PhantomData,
        }
    }

    /// Same node as `other`, starting from a copy of its cache, with new
    /// preferredness and statistics. Used by lazy search to reuse values
    /// already computed for a node when it is examined again.
    #[must_use]
    pub fn from_context(
        other: &Self,
        is_preferred: bool,
        statistics: Option<Rc<SearchStatistics>>,
        calculate_preferred: bool,
    ) -> Self {
        Self {
            cache: other.cache.clone(),
            state: other.state.clone(),
            operator_id: other.operator_id,
            preferred: is_preferred,
            statistics,
            calculate_preferred,
            entry: PhantomData,
        }
    }

    /// The result of `evaluator` for this node, computing it on first use.
    ///
    /// Each evaluator is computed at most once per context. A fresh
    /// computation increments the shared evaluation counter when statistics
    /// are attached, the evaluator counts evaluations and the result asks
    /// to be counted.
    pub fn get_result(&mut self, evaluator: &EvaluatorRef) -> &EvaluationResult {
        let id = evaluator.id();
        if !self.cache.contains(id) {
            let result = E::compute_result(evaluator.as_ref(), self);
            if result.count_evaluation() && evaluator.is_used_for_counting_evaluations() {
                if let Some(statistics) = &self.statistics {
                    statistics.inc_evaluations();
                }
            }
            self.cache.insert(Rc::clone(evaluator), result);
        }
        &self.cache[id]
    }

    /// Results computed so far, for read-only iteration.
    #[must_use]
    pub fn get_cache(&self) -> &EvaluatorCache {
        &self.cache
    }

    #[must_use]
    pub fn get_state(&self) -> &State {
        &self.state
    }

    /// The incoming operator of an edge context; may be
    /// [`OperatorId::NO_OPERATOR`] for an edge context built for a root.
    ///
    /// # Panics
    ///
    /// Panics on a state context, which has no operator.
    #[must_use]
    pub fn get_operator_id(&self) -> OperatorId {
        assert!(
            E::HAS_OPERATOR,
            "state evaluation context does not have an operator id"
        );
        self.operator_id
    }

    #[must_use]
    pub fn is_preferred(&self) -> bool {
        self.preferred
    }

    /// Whether evaluators were asked to compute preferred operators.
    #[must_use]
    pub fn get_calculate_preferred(&self) -> bool {
        self.calculate_preferred
    }

    #[must_use]
    pub fn statistics(&self) -> Option<&Rc<SearchStatistics>> {
        self.statistics.as_ref()
    }

    pub fn is_evaluator_value_infinite(&mut self, evaluator: &EvaluatorRef) -> bool {
        self.get_result(evaluator).is_infinite()
    }

    /// The finite value of `evaluator`.
    ///
    /// Infinite values usually need special treatment, so asking for one
    /// here is a caller bug: branch on
    /// [`EvaluationContext::is_evaluator_value_infinite`] first, or use
    /// [`EvaluationContext::get_evaluator_value_or_infinity`].
    ///
    /// # Panics
    ///
    /// Panics if the value is infinite.
    pub fn get_evaluator_value(&mut self, evaluator: &EvaluatorRef) -> i32 {
        let value = self.get_result(evaluator).evaluator_value();
        assert!(
            value != EvaluationResult::INFTY,
            "evaluator {} has an infinite value for state {}",
            evaluator.description(),
            self.state.id()
        );
        value
    }

    /// The value of `evaluator`, [`EvaluationResult::INFTY`] if infinite.
    pub fn get_evaluator_value_or_infinity(&mut self, evaluator: &EvaluatorRef) -> i32 {
        self.get_result(evaluator).evaluator_value()
    }

    /// Preferred operators of `evaluator`; empty unless the context was
    /// built with `calculate_preferred`.
    pub fn get_preferred_operators(&mut self, evaluator: &EvaluatorRef) -> &[OperatorId] {
        self.get_result(evaluator).preferred_operators()
    }
}
