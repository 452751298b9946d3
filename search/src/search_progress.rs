//! Detection of new best evaluator values.
//!
//! Progress is read off whatever the current node's context has already
//! computed. Checking progress never evaluates anything itself.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::evaluation_context::{ContextEntry, EvaluationContext};
use crate::evaluator::{Evaluator, EvaluatorId};
use crate::options::Verbosity;

/// Lowest finite value seen so far per reporting or boosting evaluator.
#[derive(Debug, Default)]
pub struct SearchProgress {
    verbosity: Verbosity,
    min_values: BTreeMap<EvaluatorId, i32>,
}

impl SearchProgress {
    #[must_use]
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            min_values: BTreeMap::new(),
        }
    }

    /// Record `value`; true if it is the first value for `evaluator` or
    /// strictly below its previous minimum.
    fn process_evaluator_value(&mut self, evaluator: &dyn Evaluator, value: i32) -> bool {
        match self.min_values.entry(evaluator.id()) {
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
            Entry::Occupied(mut slot) if value < *slot.get() => {
                slot.insert(value);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Scan the results already cached in `context` for new minima.
    ///
    /// New minima of reporting evaluators are logged (at `normal` verbosity
    /// or above) through the evaluator's own hook. Returns true iff some
    /// boosting evaluator reached a new minimum, meaning preferred-only open
    /// lists should be boosted. Infinite values never count as progress.
    pub fn check_progress<E: ContextEntry>(&mut self, context: &EvaluationContext<E>) -> bool {
        let mut boost = false;
        for (evaluator, result) in context.get_cache().iter() {
            if result.is_infinite() {
                continue;
            }
            let reports = evaluator.is_used_for_reporting_minima();
            let boosts = evaluator.is_used_for_boosting();
            if !(reports || boosts) {
                continue;
            }
            if self.process_evaluator_value(evaluator.as_ref(), result.evaluator_value()) {
                if reports && self.verbosity >= Verbosity::Normal {
                    evaluator.report_new_minimum_value(result);
                }
                if boosts {
                    boost = true;
                }
            }
        }
        boost
    }

    /// The best value seen for `evaluator`, if any.
    #[must_use]
    pub fn min_value(&self, evaluator: EvaluatorId) -> Option<i32> {
        self.min_values.get(&evaluator).copied()
    }
}
