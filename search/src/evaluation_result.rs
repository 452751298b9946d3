//! The value object an evaluator produces for one node.

use waypoint_kernel::state::OperatorId;

/// Result of evaluating one node with one evaluator.
///
/// A freshly constructed result is *uninitialized*: it carries no value at
/// all, so every `i32` (including [`EvaluationResult::INFTY`]) remains a
/// valid estimate.
/// Evaluators set the value (and optionally preferred operators and the
/// counting flag) before returning it; once stored in a cache it is never
/// changed again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationResult {
    evaluator_value: Option<i32>,
    preferred_operators: Vec<OperatorId>,
    count_evaluation: bool,
}

impl EvaluationResult {
    /// Marks an infinite estimate (a dead end if the evaluator is reliable).
    pub const INFTY: i32 = i32::MAX;

    /// Largest value a finite estimate may take.
    pub const MAX_FINITE: i32 = i32::MAX - 1;

    #[must_use]
    pub const fn new() -> Self {
        Self {
            evaluator_value: None,
            preferred_operators: Vec::new(),
            count_evaluation: false,
        }
    }

    /// A result carrying `value` and nothing else.
    #[must_use]
    pub fn with_value(value: i32) -> Self {
        let mut result = Self::new();
        result.set_evaluator_value(value);
        result
    }

    #[must_use]
    pub fn infinite() -> Self {
        Self::with_value(Self::INFTY)
    }

    #[must_use]
    pub fn is_uninitialized(&self) -> bool {
        self.evaluator_value.is_none()
    }

    #[must_use]
    pub fn is_infinite(&self) -> bool {
        self.evaluator_value == Some(Self::INFTY)
    }

    /// The raw value; [`EvaluationResult::INFTY`] for infinite estimates.
    ///
    /// # Panics
    ///
    /// Panics if no value has been set.
    #[must_use]
    pub fn evaluator_value(&self) -> i32 {
        match self.evaluator_value {
            Some(value) => value,
            None => panic!("evaluation result read before a value was set"),
        }
    }

    #[must_use]
    pub fn preferred_operators(&self) -> &[OperatorId] {
        &self.preferred_operators
    }

    /// Whether computing this result should bump the evaluation counter.
    #[must_use]
    pub fn count_evaluation(&self) -> bool {
        self.count_evaluation
    }

    pub fn set_evaluator_value(&mut self, value: i32) {
        self.evaluator_value = Some(value);
    }

    pub fn set_preferred_operators(&mut self, preferred_operators: Vec<OperatorId>) {
        self.preferred_operators = preferred_operators;
    }

    pub fn set_count_evaluation(&mut self, count_evaluation: bool) {
        self.count_evaluation = count_evaluation;
    }
}

impl Default for EvaluationResult {
    fn default() -> Self {
        Self::new()
    }
}
