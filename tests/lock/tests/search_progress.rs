//! Lock tests: search progress flags a new minimum exactly when a boosting
//! evaluator's value drops strictly below everything seen before.

use std::rc::Rc;

use lock_tests::{detour_task, initial_state_context, ScriptedEvaluator};
use proptest::prelude::*;
use waypoint_search::evaluation_result::EvaluationResult;
use waypoint_search::evaluator::EvaluatorRef;
use waypoint_search::evaluators::const_evaluator::ConstEvaluator;
use waypoint_search::options::Verbosity;
use waypoint_search::search_progress::SearchProgress;

/// Feed `values` one context at a time; returns the progress flags.
fn feed(values: &[i32]) -> Vec<bool> {
    let task = detour_task();
    let scripted = Rc::new(ScriptedEvaluator::new(0));
    let evaluator: EvaluatorRef = scripted.clone();
    let mut progress = SearchProgress::new(Verbosity::Silent);

    values
        .iter()
        .map(|&value| {
            scripted.set_value(value);
            let mut context = initial_state_context(&task);
            let _ = context.get_result(&evaluator);
            progress.check_progress(&context)
        })
        .collect()
}

#[test]
fn new_minima_at_first_sighting_and_strict_drops() {
    assert_eq!(
        feed(&[10, 7, 7, 9, 3]),
        [true, true, false, false, true]
    );
}

#[test]
fn infinite_values_are_never_progress() {
    assert_eq!(
        feed(&[EvaluationResult::INFTY, 4, EvaluationResult::INFTY]),
        [false, true, false]
    );
}

#[test]
fn evaluators_without_boosting_do_not_boost() {
    let task = detour_task();
    let constant: EvaluatorRef = Rc::new(ConstEvaluator::new(1, "c"));
    let mut progress = SearchProgress::new(Verbosity::Normal);
    let mut context = initial_state_context(&task);
    let _ = context.get_result(&constant);

    assert!(!progress.check_progress(&context));
    assert_eq!(progress.min_value(constant.id()), None);
}

#[test]
fn checking_progress_does_not_evaluate() {
    let task = detour_task();
    let scripted = Rc::new(ScriptedEvaluator::new(3));
    let mut progress = SearchProgress::new(Verbosity::Normal);
    let context = initial_state_context(&task);

    assert!(!progress.check_progress(&context));
    assert_eq!(scripted.calls(), 0);
}

proptest! {
    #[test]
    fn flags_match_running_minimum(values in proptest::collection::vec(0..50i32, 1..40)) {
        let flags = feed(&values);
        let mut best: Option<i32> = None;
        for (value, flag) in values.iter().zip(flags) {
            let expected = match best {
                None => true,
                Some(b) => *value < b,
            };
            prop_assert_eq!(flag, expected);
            if expected {
                best = Some(*value);
            }
        }
    }
}
