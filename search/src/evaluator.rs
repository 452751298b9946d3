//! The evaluator abstraction.
//!
//! Evaluators are shared through [`EvaluatorRef`] (`Rc<dyn Evaluator>`) and
//! compared by identity: every instance gets a fresh [`EvaluatorId`] from its
//! [`EvaluatorBase`], so two identically configured instances are still two
//! different cache keys.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use waypoint_kernel::state::{OperatorId, State};

use crate::evaluation_context::{EdgeEvaluationContext, StateEvaluationContext};
use crate::evaluation_result::EvaluationResult;

/// Shared handle to an evaluator.
pub type EvaluatorRef = Rc<dyn Evaluator>;

/// Stable per-instance identity of an evaluator.
///
/// Ids increase in construction order, which gives caches and progress maps
/// a deterministic iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EvaluatorId(u64);

static NEXT_EVALUATOR_ID: AtomicU64 = AtomicU64::new(0);

impl EvaluatorId {
    fn fresh() -> Self {
        Self(NEXT_EVALUATOR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Which search-wide services consume this evaluator's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvaluatorFlags {
    /// Report every new minimum value.
    pub use_for_reporting_minima: bool,
    /// A new minimum value boosts preferred-only open lists.
    pub use_for_boosting: bool,
    /// Count computations in the search statistics.
    pub use_for_counting_evaluations: bool,
}

impl EvaluatorFlags {
    /// Plain combinators and markers: no reporting, boosting or counting.
    pub const NONE: Self = Self {
        use_for_reporting_minima: false,
        use_for_boosting: false,
        use_for_counting_evaluations: false,
    };

    /// Heuristics: all three services enabled.
    pub const HEURISTIC: Self = Self {
        use_for_reporting_minima: true,
        use_for_boosting: true,
        use_for_counting_evaluations: true,
    };
}

/// Identity, description and flags shared by all evaluator variants.
///
/// Deliberately not `Clone`: a copy would share the identity of another
/// instance.
#[derive(Debug)]
pub struct EvaluatorBase {
    id: EvaluatorId,
    description: String,
    flags: EvaluatorFlags,
}

impl EvaluatorBase {
    #[must_use]
    pub fn new(description: impl Into<String>, flags: EvaluatorFlags) -> Self {
        Self {
            id: EvaluatorId::fresh(),
            description: description.into(),
            flags,
        }
    }

    #[must_use]
    pub fn id(&self) -> EvaluatorId {
        self.id
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn flags(&self) -> EvaluatorFlags {
        self.flags
    }
}

/// A pluggable estimator over search nodes.
///
/// Call sites never invoke `compute_*_result` directly; they go through an
/// [`crate::evaluation_context::EvaluationContext`], which memoizes results.
///
/// Path-dependent evaluators (whose value depends on how a state was
/// reached) add themselves in [`Evaluator::get_path_dependent_evaluators`]
/// and keep their history current through the two `notify_*` hooks, which
/// the search algorithm calls once for the initial state and once per
/// accepted transition.
pub trait Evaluator {
    fn base(&self) -> &EvaluatorBase;

    /// Evaluate a node identified by its state alone.
    fn compute_state_result(&self, context: &mut StateEvaluationContext) -> EvaluationResult;

    /// Evaluate a node identified by a state and the operator applied to it.
    fn compute_edge_result(&self, context: &mut EdgeEvaluationContext) -> EvaluationResult;

    /// Add this evaluator (if path-dependent) and every evaluator it
    /// depends on, transitively.
    fn get_path_dependent_evaluators(self: Rc<Self>, _evals: &mut EvaluatorSet) {}

    /// Whether an infinite estimate proves that the node is a dead end.
    fn dead_ends_are_reliable(&self) -> bool {
        true
    }

    /// Whether estimates are stored per state and reused until dirty.
    fn does_cache_estimates(&self) -> bool {
        false
    }

    fn notify_initial_state(&self, _initial_state: &State) {}

    fn notify_state_transition(
        &self,
        _parent_state: &State,
        _operator_id: OperatorId,
        _state: &State,
    ) {
    }

    fn id(&self) -> EvaluatorId {
        self.base().id()
    }

    fn description(&self) -> &str {
        self.base().description()
    }

    fn is_used_for_reporting_minima(&self) -> bool {
        self.base().flags().use_for_reporting_minima
    }

    fn is_used_for_boosting(&self) -> bool {
        self.base().flags().use_for_boosting
    }

    fn is_used_for_counting_evaluations(&self) -> bool {
        self.base().flags().use_for_counting_evaluations
    }

    fn report_value_for_initial_state(&self, result: &EvaluationResult) {
        tracing::info!(
            "Initial heuristic value for {}: {}",
            self.description(),
            format_value(result.evaluator_value())
        );
    }

    fn report_new_minimum_value(&self, result: &EvaluationResult) {
        tracing::info!(
            "New best heuristic value for {}: {}",
            self.description(),
            format_value(result.evaluator_value())
        );
    }
}

impl fmt::Debug for dyn Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("id", &self.id())
            .field("description", &self.description())
            .finish()
    }
}

/// Render an evaluator value, spelling out infinity.
#[must_use]
pub fn format_value(value: i32) -> String {
    if value == EvaluationResult::INFTY {
        "infinity".to_string()
    } else {
        value.to_string()
    }
}

/// Identity-keyed set of evaluators with deterministic iteration order.
#[derive(Debug, Clone, Default)]
pub struct EvaluatorSet {
    evaluators: BTreeMap<EvaluatorId, EvaluatorRef>,
}

impl EvaluatorSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the evaluator was already present.
    pub fn insert(&mut self, evaluator: EvaluatorRef) -> bool {
        self.evaluators.insert(evaluator.id(), evaluator).is_none()
    }

    #[must_use]
    pub fn contains(&self, id: EvaluatorId) -> bool {
        self.evaluators.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EvaluatorRef> {
        self.evaluators.values()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<EvaluatorRef> {
        self.evaluators.into_values().collect()
    }
}

/// Transitive closure of the path-dependent evaluators reachable from
/// `roots`.
pub fn collect_path_dependent_evaluators<'a>(
    roots: impl IntoIterator<Item = &'a EvaluatorRef>,
) -> EvaluatorSet {
    let mut evals = EvaluatorSet::new();
    for root in roots {
        Rc::clone(root).get_path_dependent_evaluators(&mut evals);
    }
    evals
}
