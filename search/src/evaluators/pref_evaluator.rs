//! Preferred-operator marker.

use crate::evaluation_context::{
    ContextEntry, EdgeEvaluationContext, EvaluationContext, StateEvaluationContext,
};
use crate::evaluation_result::EvaluationResult;
use crate::evaluator::{Evaluator, EvaluatorBase, EvaluatorFlags};

/// 0 for nodes reached by a preferred operator, 1 otherwise. Used as a
/// tie-breaker that orders preferred successors first.
#[derive(Debug)]
pub struct PrefEvaluator {
    base: EvaluatorBase,
}

impl PrefEvaluator {
    pub const PREFERRED: i32 = 0;
    pub const NOT_PREFERRED: i32 = 1;

    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            base: EvaluatorBase::new(description, EvaluatorFlags::NONE),
        }
    }

    fn mark<E: ContextEntry>(context: &EvaluationContext<E>) -> EvaluationResult {
        EvaluationResult::with_value(if context.is_preferred() {
            Self::PREFERRED
        } else {
            Self::NOT_PREFERRED
        })
    }
}

impl Default for PrefEvaluator {
    fn default() -> Self {
        Self::new("pref")
    }
}

impl Evaluator for PrefEvaluator {
    fn base(&self) -> &EvaluatorBase {
        &self.base
    }

    fn compute_state_result(&self, context: &mut StateEvaluationContext) -> EvaluationResult {
        Self::mark(context)
    }

    fn compute_edge_result(&self, context: &mut EdgeEvaluationContext) -> EvaluationResult {
        Self::mark(context)
    }
}
