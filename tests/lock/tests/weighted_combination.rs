//! Lock tests: the weighted evaluator scales its inner evaluator in both
//! context flavors and keeps infinity infinite.

use std::rc::Rc;

use lock_tests::{detour_task, initial_edge_context, initial_state_context, ScriptedEvaluator};
use proptest::prelude::*;
use waypoint_search::error::SearchError;
use waypoint_search::evaluation_result::EvaluationResult;
use waypoint_search::evaluator::EvaluatorRef;
use waypoint_search::evaluators::const_evaluator::ConstEvaluator;
use waypoint_search::evaluators::weighted_evaluator::WeightedEvaluator;

fn weighted(inner: EvaluatorRef, weight: i32) -> EvaluatorRef {
    Rc::new(WeightedEvaluator::new(inner, weight, "weighted").unwrap())
}

#[test]
fn seven_times_three_in_both_flavors() {
    let task = detour_task();
    let evaluator = weighted(Rc::new(ConstEvaluator::new(7, "seven")), 3);

    let mut state_context = initial_state_context(&task);
    assert_eq!(state_context.get_evaluator_value(&evaluator), 21);

    let mut edge_context = initial_edge_context(&task, 1);
    assert_eq!(edge_context.get_evaluator_value(&evaluator), 21);
}

#[test]
fn infinity_survives_any_weight() {
    let task = detour_task();
    for weight in [0, 1, 2, 1000] {
        let evaluator = weighted(Rc::new(ConstEvaluator::new(EvaluationResult::INFTY, "inf")), weight);
        let mut context = initial_state_context(&task);
        assert_eq!(
            context.get_evaluator_value_or_infinity(&evaluator),
            EvaluationResult::INFTY,
            "weight {weight}"
        );
    }
}

#[test]
fn inner_evaluator_is_cached_in_the_same_context() {
    let task = detour_task();
    let inner = Rc::new(ScriptedEvaluator::new(5));
    let inner_ref: EvaluatorRef = inner.clone();
    let doubled = weighted(inner_ref.clone(), 2);

    let mut context = initial_state_context(&task);
    assert_eq!(context.get_evaluator_value(&doubled), 10);
    assert_eq!(context.get_evaluator_value(&inner_ref), 5);
    assert_eq!(inner.calls(), 1);
}

#[test]
fn negative_weight_is_a_configuration_error() {
    let err = WeightedEvaluator::new(Rc::new(ConstEvaluator::new(1, "one")), -2, "w").unwrap_err();
    assert!(matches!(err, SearchError::NegativeWeight { weight: -2, .. }));
    assert_eq!(err.exit_code().code(), 33);
}

proptest! {
    #[test]
    fn weighted_value_is_the_product(value in 0..100_000i32, weight in 0..1_000i32) {
        let task = detour_task();
        let evaluator = weighted(Rc::new(ConstEvaluator::new(value, "c")), weight);
        let mut state_context = initial_state_context(&task);
        let mut edge_context = initial_edge_context(&task, 0);
        let expected = i64::from(value) * i64::from(weight);
        prop_assert_eq!(i64::from(state_context.get_evaluator_value(&evaluator)), expected);
        prop_assert_eq!(i64::from(edge_context.get_evaluator_value(&evaluator)), expected);
    }
}
