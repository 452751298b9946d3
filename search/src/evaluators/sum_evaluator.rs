//! Sum of several evaluators.

use std::rc::Rc;

use crate::error::SearchError;
use crate::evaluation_context::{
    ContextEntry, EdgeEvaluationContext, EvaluationContext, StateEvaluationContext,
};
use crate::evaluation_result::EvaluationResult;
use crate::evaluator::{Evaluator, EvaluatorBase, EvaluatorFlags, EvaluatorRef, EvaluatorSet};

/// Adds up its parts, e.g. `g + h` for A*. Infinite as soon as one part is.
#[derive(Debug)]
pub struct SumEvaluator {
    base: EvaluatorBase,
    evaluators: Vec<EvaluatorRef>,
}

impl SumEvaluator {
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidConfiguration`] for an empty list.
    pub fn new(
        evaluators: Vec<EvaluatorRef>,
        description: impl Into<String>,
    ) -> Result<Self, SearchError> {
        let description = description.into();
        if evaluators.is_empty() {
            return Err(SearchError::InvalidConfiguration {
                detail: format!("sum evaluator {description} needs at least one evaluator"),
            });
        }
        Ok(Self {
            base: EvaluatorBase::new(description, EvaluatorFlags::NONE),
            evaluators,
        })
    }

    fn combine<E: ContextEntry>(&self, context: &mut EvaluationContext<E>) -> EvaluationResult {
        let mut total: i64 = 0;
        for evaluator in &self.evaluators {
            let value = context.get_evaluator_value_or_infinity(evaluator);
            if value == EvaluationResult::INFTY {
                return EvaluationResult::infinite();
            }
            total += i64::from(value);
        }
        let total = total.clamp(i64::from(i32::MIN), i64::from(EvaluationResult::MAX_FINITE));
        EvaluationResult::with_value(i32::try_from(total).unwrap_or(EvaluationResult::MAX_FINITE))
    }
}

impl Evaluator for SumEvaluator {
    fn base(&self) -> &EvaluatorBase {
        &self.base
    }

    fn compute_state_result(&self, context: &mut StateEvaluationContext) -> EvaluationResult {
        self.combine(context)
    }

    fn compute_edge_result(&self, context: &mut EdgeEvaluationContext) -> EvaluationResult {
        self.combine(context)
    }

    fn get_path_dependent_evaluators(self: Rc<Self>, evals: &mut EvaluatorSet) {
        for evaluator in &self.evaluators {
            Rc::clone(evaluator).get_path_dependent_evaluators(evals);
        }
    }

    fn dead_ends_are_reliable(&self) -> bool {
        self.evaluators
            .iter()
            .all(|evaluator| evaluator.dead_ends_are_reliable())
    }
}
