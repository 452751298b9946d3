//! Per-node map from evaluator identity to its result.

use std::collections::BTreeMap;
use std::ops::Index;
use std::rc::Rc;

use crate::evaluation_result::EvaluationResult;
use crate::evaluator::{EvaluatorId, EvaluatorRef};

static UNINITIALIZED: EvaluationResult = EvaluationResult::new();

#[derive(Debug, Clone)]
struct CacheSlot {
    evaluator: EvaluatorRef,
    result: Rc<EvaluationResult>,
}

/// Results computed so far for one node, keyed by evaluator identity.
///
/// Cloning is shallow: stored results are shared, immutable values, so a
/// cloned cache reuses everything already computed and then diverges
/// independently of the original.
#[derive(Debug, Clone, Default)]
pub struct EvaluatorCache {
    slots: BTreeMap<EvaluatorId, CacheSlot>,
}

impl EvaluatorCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored result, or an uninitialized placeholder if `id` has not
    /// been computed.
    #[must_use]
    pub fn get(&self, id: EvaluatorId) -> &EvaluationResult {
        self.slots.get(&id).map_or(&UNINITIALIZED, |slot| slot.result.as_ref())
    }

    #[must_use]
    pub fn contains(&self, id: EvaluatorId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Store the first result computed for `evaluator`.
    ///
    /// # Panics
    ///
    /// Panics if a result is already stored for this evaluator or if
    /// `result` is uninitialized: slots are written exactly once.
    pub fn insert(&mut self, evaluator: EvaluatorRef, result: EvaluationResult) {
        assert!(
            !result.is_uninitialized(),
            "evaluator {} returned an uninitialized result",
            evaluator.description()
        );
        let id = evaluator.id();
        let previous = self.slots.insert(
            id,
            CacheSlot {
                evaluator,
                result: Rc::new(result),
            },
        );
        assert!(previous.is_none(), "cache slot {id:?} written twice");
    }

    /// Already computed `(evaluator, result)` pairs in evaluator-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&EvaluatorRef, &EvaluationResult)> {
        self.slots
            .values()
            .map(|slot| (&slot.evaluator, slot.result.as_ref()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Index<EvaluatorId> for EvaluatorCache {
    type Output = EvaluationResult;

    fn index(&self, id: EvaluatorId) -> &EvaluationResult {
        self.get(id)
    }
}
