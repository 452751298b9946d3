//! Weighted evaluator: an inner evaluator's value times an integer weight.

use std::rc::Rc;

use crate::error::SearchError;
use crate::evaluation_context::{
    ContextEntry, EdgeEvaluationContext, EvaluationContext, StateEvaluationContext,
};
use crate::evaluation_result::EvaluationResult;
use crate::evaluator::{Evaluator, EvaluatorBase, EvaluatorFlags, EvaluatorRef, EvaluatorSet};

#[derive(Debug)]
pub struct WeightedEvaluator {
    base: EvaluatorBase,
    evaluator: EvaluatorRef,
    weight: i32,
}

impl WeightedEvaluator {
    /// # Errors
    ///
    /// Returns [`SearchError::NegativeWeight`] for a negative `weight`.
    pub fn new(
        evaluator: EvaluatorRef,
        weight: i32,
        description: impl Into<String>,
    ) -> Result<Self, SearchError> {
        let description = description.into();
        if weight < 0 {
            return Err(SearchError::NegativeWeight {
                description,
                weight,
            });
        }
        Ok(Self {
            base: EvaluatorBase::new(description, EvaluatorFlags::NONE),
            evaluator,
            weight,
        })
    }

    #[must_use]
    pub fn weight(&self) -> i32 {
        self.weight
    }

    /// Multiply `value`, keeping infinity infinite and clamping finite
    /// products below the sentinel.
    fn scale(&self, value: i32) -> i32 {
        if value == EvaluationResult::INFTY {
            return EvaluationResult::INFTY;
        }
        let product = (i64::from(value) * i64::from(self.weight))
            .clamp(i64::from(i32::MIN), i64::from(EvaluationResult::MAX_FINITE));
        i32::try_from(product).unwrap_or(EvaluationResult::MAX_FINITE)
    }

    fn weigh<E: ContextEntry>(&self, context: &mut EvaluationContext<E>) -> EvaluationResult {
        let value = context.get_evaluator_value_or_infinity(&self.evaluator);
        let mut result = EvaluationResult::with_value(self.scale(value));
        result.set_preferred_operators(context.get_preferred_operators(&self.evaluator).to_vec());
        result
    }
}

impl Evaluator for WeightedEvaluator {
    fn base(&self) -> &EvaluatorBase {
        &self.base
    }

    fn compute_state_result(&self, context: &mut StateEvaluationContext) -> EvaluationResult {
        self.weigh(context)
    }

    fn compute_edge_result(&self, context: &mut EdgeEvaluationContext) -> EvaluationResult {
        self.weigh(context)
    }

    fn get_path_dependent_evaluators(self: Rc<Self>, evals: &mut EvaluatorSet) {
        Rc::clone(&self.evaluator).get_path_dependent_evaluators(evals);
    }

    fn dead_ends_are_reliable(&self) -> bool {
        self.evaluator.dead_ends_are_reliable()
    }
}
