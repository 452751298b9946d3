//! Constant evaluator.

use crate::evaluation_context::{EdgeEvaluationContext, StateEvaluationContext};
use crate::evaluation_result::EvaluationResult;
use crate::evaluator::{Evaluator, EvaluatorBase, EvaluatorFlags};

/// Returns the same value for every node.
#[derive(Debug)]
pub struct ConstEvaluator {
    base: EvaluatorBase,
    value: i32,
}

impl ConstEvaluator {
    #[must_use]
    pub fn new(value: i32, description: impl Into<String>) -> Self {
        Self {
            base: EvaluatorBase::new(description, EvaluatorFlags::NONE),
            value,
        }
    }

    #[must_use]
    pub fn value(&self) -> i32 {
        self.value
    }
}

impl Evaluator for ConstEvaluator {
    fn base(&self) -> &EvaluatorBase {
        &self.base
    }

    fn compute_state_result(&self, _context: &mut StateEvaluationContext) -> EvaluationResult {
        EvaluationResult::with_value(self.value)
    }

    fn compute_edge_result(&self, _context: &mut EdgeEvaluationContext) -> EvaluationResult {
        EvaluationResult::with_value(self.value)
    }
}
