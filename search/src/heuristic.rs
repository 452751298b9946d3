//! Cache-aware base for state heuristics.
//!
//! A [`HeuristicFunction`] only knows how to estimate one state. Wrapping it
//! in [`Heuristic`] turns it into an [`Evaluator`] that keeps a per-state
//! [`HeuristicCache`] and maps dead ends onto [`EvaluationResult::INFTY`].

use std::cell::RefCell;

use waypoint_kernel::state::{OperatorId, State, StateId};

use crate::evaluation_context::{EdgeEvaluationContext, StateEvaluationContext};
use crate::evaluation_result::EvaluationResult;
use crate::evaluator::{Evaluator, EvaluatorBase, EvaluatorFlags};
use crate::ordered_set::OrderedSet;

/// Cached estimate for one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicCacheEntry {
    /// [`HeuristicCache::NO_VALUE`] until something is stored.
    pub h: i32,
    /// The stored value may be stale and must be recomputed before reuse.
    pub dirty: bool,
}

impl Default for HeuristicCacheEntry {
    fn default() -> Self {
        Self {
            h: HeuristicCache::NO_VALUE,
            dirty: true,
        }
    }
}

/// Per-state estimates, indexed by [`StateId`].
#[derive(Debug, Clone, Default)]
pub struct HeuristicCache {
    entries: Vec<HeuristicCacheEntry>,
}

impl HeuristicCache {
    pub const NO_VALUE: i32 = -2;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry for `state`; unseen states have no value and are dirty.
    #[must_use]
    pub fn get(&self, state: StateId) -> HeuristicCacheEntry {
        self.entries.get(state.index()).copied().unwrap_or_default()
    }

    pub fn entry_mut(&mut self, state: StateId) -> &mut HeuristicCacheEntry {
        let index = state.index();
        if index >= self.entries.len() {
            self.entries.resize_with(index + 1, HeuristicCacheEntry::default);
        }
        &mut self.entries[index]
    }
}

/// Estimate returned for states from which the goal is unreachable.
pub const DEAD_END: i32 = -1;

/// The state-level computation behind a [`Heuristic`].
pub trait HeuristicFunction {
    /// Estimate for `state`, or [`DEAD_END`]. When `preferred` is given,
    /// operators considered useful in `state` are added to it.
    fn compute_heuristic(
        &self,
        state: &State,
        preferred: Option<&mut OrderedSet<OperatorId>>,
    ) -> i32;

    fn dead_ends_are_reliable(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicOptions {
    /// Reuse non-dirty cached estimates instead of recomputing.
    pub cache_estimates: bool,
}

impl Default for HeuristicOptions {
    fn default() -> Self {
        Self {
            cache_estimates: true,
        }
    }
}

/// Evaluator over a [`HeuristicFunction`]. Both context flavors evaluate the
/// context's state.
pub struct Heuristic<H> {
    base: EvaluatorBase,
    function: H,
    cache_estimates: bool,
    cache: RefCell<HeuristicCache>,
}

impl<H: HeuristicFunction> Heuristic<H> {
    #[must_use]
    pub fn new(function: H, options: HeuristicOptions, description: impl Into<String>) -> Self {
        Self {
            base: EvaluatorBase::new(description, EvaluatorFlags::HEURISTIC),
            function,
            cache_estimates: options.cache_estimates,
            cache: RefCell::new(HeuristicCache::new()),
        }
    }

    #[must_use]
    pub fn function(&self) -> &H {
        &self.function
    }

    /// Cached entry for `state`, for inspection.
    #[must_use]
    pub fn cache_entry(&self, state: StateId) -> HeuristicCacheEntry {
        self.cache.borrow().get(state)
    }

    fn evaluate(&self, state: &State, calculate_preferred: bool) -> EvaluationResult {
        if self.cache_estimates && !calculate_preferred {
            let entry = self.cache.borrow().get(state.id());
            if entry.h != HeuristicCache::NO_VALUE && !entry.dirty {
                // Reused estimates are not new evaluation work.
                return EvaluationResult::with_value(to_evaluator_value(entry.h));
            }
        }

        let mut preferred = OrderedSet::new();
        let h = self
            .function
            .compute_heuristic(state, calculate_preferred.then_some(&mut preferred));
        assert!(
            h == DEAD_END || h >= 0,
            "heuristic {} returned invalid estimate {h}",
            self.base.description()
        );
        if self.cache_estimates {
            let mut cache = self.cache.borrow_mut();
            *cache.entry_mut(state.id()) = HeuristicCacheEntry { h, dirty: false };
        }

        let mut result = EvaluationResult::with_value(to_evaluator_value(h));
        result.set_preferred_operators(preferred.into_vec());
        result.set_count_evaluation(true);
        result
    }
}

fn to_evaluator_value(h: i32) -> i32 {
    if h == DEAD_END {
        EvaluationResult::INFTY
    } else {
        h.min(EvaluationResult::MAX_FINITE)
    }
}

impl<H: HeuristicFunction> Evaluator for Heuristic<H> {
    fn base(&self) -> &EvaluatorBase {
        &self.base
    }

    fn compute_state_result(&self, context: &mut StateEvaluationContext) -> EvaluationResult {
        self.evaluate(context.get_state(), context.get_calculate_preferred())
    }

    fn compute_edge_result(&self, context: &mut EdgeEvaluationContext) -> EvaluationResult {
        self.evaluate(context.get_state(), context.get_calculate_preferred())
    }

    fn dead_ends_are_reliable(&self) -> bool {
        self.function.dead_ends_are_reliable()
    }

    fn does_cache_estimates(&self) -> bool {
        self.cache_estimates
    }
}
