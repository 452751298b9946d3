//! Open lists: the frontier of best-first search, ordered by evaluator
//! values read from each node's evaluation context.
//!
//! Open lists are generic over the [`ContextEntry`] flavor so the same
//! implementations serve eager search (state entries) and lazy search
//! (edge entries).

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::rc::Rc;

use crate::error::SearchError;
use crate::evaluation_context::{ContextEntry, EvaluationContext};
use crate::evaluator::{EvaluatorRef, EvaluatorSet};

pub trait OpenList<E: ContextEntry> {
    /// Queue `entry`, reading its key from `context`. Dead ends and, for
    /// preferred-only lists, non-preferred entries are dropped.
    fn insert(&mut self, context: &mut EvaluationContext<E>, entry: E);

    /// Remove and return the best entry.
    fn remove_min(&mut self) -> Option<E>;

    fn is_empty(&self) -> bool;

    fn len(&self) -> usize;

    fn clear(&mut self);

    /// Called when a boosting evaluator reached a new minimum.
    fn boost_preferred(&mut self) {}

    fn get_path_dependent_evaluators(&self, evals: &mut EvaluatorSet);

    /// Whether the node in `context` should be pruned.
    fn is_dead_end(&self, context: &mut EvaluationContext<E>) -> bool;

    /// Whether some evaluator proves the node in `context` is a dead end.
    fn is_reliable_dead_end(&self, context: &mut EvaluationContext<E>) -> bool;

    fn only_contains_preferred_entries(&self) -> bool;
}

/// Heap entry: lexicographic key, then insertion order.
#[derive(Debug)]
struct OpenEntry<E> {
    key: Reverse<(Vec<i32>, u64)>,
    entry: E,
}

impl<E> PartialEq for OpenEntry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<E> Eq for OpenEntry<E> {}

impl<E> PartialOrd for OpenEntry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for OpenEntry<E> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

/// Orders entries by the first evaluator, breaking ties with the next ones
/// and finally first-in first-out. Infinite values sort last.
pub struct TieBreakingOpenList<E> {
    heap: BinaryHeap<OpenEntry<E>>,
    evaluators: Vec<EvaluatorRef>,
    pref_only: bool,
    allow_unsafe_pruning: bool,
    next_insertion: u64,
}

impl<E: ContextEntry> TieBreakingOpenList<E> {
    /// With `allow_unsafe_pruning`, an infinite value of the first
    /// evaluator prunes the node even when that evaluator is unreliable.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidConfiguration`] without evaluators.
    pub fn new(
        evaluators: Vec<EvaluatorRef>,
        pref_only: bool,
        allow_unsafe_pruning: bool,
    ) -> Result<Self, SearchError> {
        if evaluators.is_empty() {
            return Err(SearchError::InvalidConfiguration {
                detail: "tie-breaking open list needs at least one evaluator".into(),
            });
        }
        Ok(Self {
            heap: BinaryHeap::new(),
            evaluators,
            pref_only,
            allow_unsafe_pruning,
            next_insertion: 0,
        })
    }

    /// Single-evaluator list without pruning shortcuts.
    #[must_use]
    pub fn single(evaluator: EvaluatorRef) -> Self {
        Self {
            heap: BinaryHeap::new(),
            evaluators: vec![evaluator],
            pref_only: false,
            allow_unsafe_pruning: false,
            next_insertion: 0,
        }
    }

    /// Single-evaluator list that only admits preferred entries.
    #[must_use]
    pub fn preferred_only(evaluator: EvaluatorRef) -> Self {
        Self {
            pref_only: true,
            ..Self::single(evaluator)
        }
    }
}

impl<E: ContextEntry> OpenList<E> for TieBreakingOpenList<E> {
    fn insert(&mut self, context: &mut EvaluationContext<E>, entry: E) {
        if self.pref_only && !context.is_preferred() {
            return;
        }
        if self.is_dead_end(context) {
            return;
        }
        let key = self
            .evaluators
            .iter()
            .map(|evaluator| context.get_evaluator_value_or_infinity(evaluator))
            .collect();
        self.heap.push(OpenEntry {
            key: Reverse((key, self.next_insertion)),
            entry,
        });
        self.next_insertion += 1;
    }

    fn remove_min(&mut self) -> Option<E> {
        self.heap.pop().map(|open| open.entry)
    }

    fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn clear(&mut self) {
        self.heap.clear();
    }

    fn get_path_dependent_evaluators(&self, evals: &mut EvaluatorSet) {
        for evaluator in &self.evaluators {
            Rc::clone(evaluator).get_path_dependent_evaluators(evals);
        }
    }

    fn is_dead_end(&self, context: &mut EvaluationContext<E>) -> bool {
        if self.is_reliable_dead_end(context) {
            return true;
        }
        if self.allow_unsafe_pruning && context.is_evaluator_value_infinite(&self.evaluators[0]) {
            return true;
        }
        self.evaluators
            .iter()
            .all(|evaluator| context.is_evaluator_value_infinite(evaluator))
    }

    fn is_reliable_dead_end(&self, context: &mut EvaluationContext<E>) -> bool {
        self.evaluators.iter().any(|evaluator| {
            context.is_evaluator_value_infinite(evaluator) && evaluator.dead_ends_are_reliable()
        })
    }

    fn only_contains_preferred_entries(&self) -> bool {
        self.pref_only
    }
}

/// Round-robin over sublists: each removal takes from the non-empty
/// sublist with the lowest priority and then bumps that priority.
pub struct AlternationOpenList<E> {
    open_lists: Vec<Box<dyn OpenList<E>>>,
    priorities: Vec<i64>,
    boost_amount: i64,
}

impl<E: ContextEntry> AlternationOpenList<E> {
    pub const DEFAULT_BOOST: i64 = 1000;

    /// # Errors
    ///
    /// Returns [`SearchError::InvalidConfiguration`] without sublists.
    pub fn new(open_lists: Vec<Box<dyn OpenList<E>>>, boost_amount: i64) -> Result<Self, SearchError> {
        if open_lists.is_empty() {
            return Err(SearchError::InvalidConfiguration {
                detail: "alternation open list needs at least one sublist".into(),
            });
        }
        let priorities = vec![0; open_lists.len()];
        Ok(Self {
            open_lists,
            priorities,
            boost_amount,
        })
    }

    #[must_use]
    pub fn priorities(&self) -> &[i64] {
        &self.priorities
    }
}

impl<E: ContextEntry> OpenList<E> for AlternationOpenList<E> {
    fn insert(&mut self, context: &mut EvaluationContext<E>, entry: E) {
        if self.is_dead_end(context) {
            return;
        }
        for sublist in &mut self.open_lists {
            sublist.insert(context, entry);
        }
    }

    fn remove_min(&mut self) -> Option<E> {
        let best = (0..self.open_lists.len())
            .filter(|&i| !self.open_lists[i].is_empty())
            .min_by_key(|&i| self.priorities[i])?;
        self.priorities[best] += 1;
        self.open_lists[best].remove_min()
    }

    fn is_empty(&self) -> bool {
        self.open_lists.iter().all(|sublist| sublist.is_empty())
    }

    fn len(&self) -> usize {
        self.open_lists.iter().map(|sublist| sublist.len()).sum()
    }

    fn clear(&mut self) {
        for sublist in &mut self.open_lists {
            sublist.clear();
        }
    }

    fn boost_preferred(&mut self) {
        for (sublist, priority) in self.open_lists.iter().zip(&mut self.priorities) {
            if sublist.only_contains_preferred_entries() {
                *priority -= self.boost_amount;
            }
        }
    }

    fn get_path_dependent_evaluators(&self, evals: &mut EvaluatorSet) {
        for sublist in &self.open_lists {
            sublist.get_path_dependent_evaluators(evals);
        }
    }

    /// A dead end if one sublist proves it, or if all sublists agree.
    fn is_dead_end(&self, context: &mut EvaluationContext<E>) -> bool {
        if self.is_reliable_dead_end(context) {
            return true;
        }
        self.open_lists
            .iter()
            .all(|sublist| sublist.is_dead_end(context))
    }

    fn is_reliable_dead_end(&self, context: &mut EvaluationContext<E>) -> bool {
        self.open_lists
            .iter()
            .any(|sublist| sublist.is_reliable_dead_end(context))
    }

    fn only_contains_preferred_entries(&self) -> bool {
        self.open_lists
            .iter()
            .all(|sublist| sublist.only_contains_preferred_entries())
    }
}
