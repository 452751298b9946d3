//! Lock tests: the path-cost evaluator keeps the cheapest known g value
//! per state, whatever order transitions are reported in.

use std::rc::Rc;

use lock_tests::{detour_task, registry_with_initial_state};
use waypoint_kernel::cost::OperatorCost;
use waypoint_kernel::registry::StateRegistry;
use waypoint_kernel::state::{OperatorId, State};
use waypoint_search::evaluation_context::{
    EdgeEntry, EdgeEvaluationContext, StateEntry, StateEvaluationContext,
};
use waypoint_search::evaluator::{Evaluator, EvaluatorRef};
use waypoint_search::evaluators::g_evaluator::{GEvaluator, GEvaluatorOptions};

const S0_S1: OperatorId = OperatorId::new(0);
const S1_S2: OperatorId = OperatorId::new(1);
const S0_S2: OperatorId = OperatorId::new(2);

struct Detour {
    registry: StateRegistry,
    s0: State,
    s1: State,
    s2: State,
    g: Rc<GEvaluator>,
}

fn detour(cost_type: OperatorCost) -> Detour {
    let task = detour_task();
    let (mut registry, _) = registry_with_initial_state(&task);
    let s0 = registry.initial_state();
    let s1 = registry.get_successor_state(&s0, S0_S1);
    let s2 = registry.get_successor_state(&s1, S1_S2);
    assert_eq!(registry.get_successor_state(&s0, S0_S2), s2);

    let g = Rc::new(GEvaluator::new(
        task,
        GEvaluatorOptions {
            cost_type,
            cache_estimates: true,
        },
        "g",
    ));
    g.notify_initial_state(&s0);
    Detour {
        registry,
        s0,
        s1,
        s2,
        g,
    }
}

fn query_state(d: &Detour, state: &State) -> i32 {
    let evaluator: EvaluatorRef = d.g.clone();
    let mut context =
        StateEvaluationContext::new(StateEntry(state.id()), &d.registry, false, None, false);
    context.get_evaluator_value(&evaluator)
}

#[test]
fn long_path_first_then_shortcut() {
    let d = detour(OperatorCost::Normal);
    d.g.notify_state_transition(&d.s0, S0_S1, &d.s1);
    d.g.notify_state_transition(&d.s1, S1_S2, &d.s2);
    assert_eq!(d.g.cache_entry(&d.s2).h, 7);

    d.g.notify_state_transition(&d.s0, S0_S2, &d.s2);
    let entry = d.g.cache_entry(&d.s2);
    assert_eq!(entry.h, 5);
    assert!(entry.dirty);

    assert_eq!(query_state(&d, &d.s2), 5);
    assert!(!d.g.cache_entry(&d.s2).dirty);
}

#[test]
fn shortcut_first_then_long_path() {
    let d = detour(OperatorCost::Normal);
    d.g.notify_state_transition(&d.s0, S0_S1, &d.s1);
    d.g.notify_state_transition(&d.s0, S0_S2, &d.s2);
    d.g.notify_state_transition(&d.s1, S1_S2, &d.s2);

    let entry = d.g.cache_entry(&d.s2);
    assert_eq!(entry.h, 5, "a more expensive path must never overwrite g");
    assert!(entry.dirty);

    assert_eq!(query_state(&d, &d.s2), 5);
    assert!(!d.g.cache_entry(&d.s2).dirty);
}

#[test]
fn initial_state_has_zero_g() {
    let d = detour(OperatorCost::Normal);
    assert_eq!(query_state(&d, &d.s0), 0);
}

#[test]
fn edge_value_is_parent_g_plus_cost_without_committing() {
    let d = detour(OperatorCost::Normal);
    d.g.notify_state_transition(&d.s0, S0_S1, &d.s1);

    let evaluator: EvaluatorRef = d.g.clone();
    let mut context = EdgeEvaluationContext::new(
        EdgeEntry::new(d.s1.id(), S1_S2),
        &d.registry,
        false,
        None,
        false,
    );
    assert_eq!(context.get_evaluator_value(&evaluator), 7);
    assert_eq!(
        d.g.cache_entry(&d.s2).h,
        waypoint_search::heuristic::HeuristicCache::NO_VALUE
    );
}

#[test]
fn unit_cost_transformation_counts_steps() {
    let d = detour(OperatorCost::One);
    d.g.notify_state_transition(&d.s0, S0_S1, &d.s1);
    d.g.notify_state_transition(&d.s1, S1_S2, &d.s2);
    d.g.notify_state_transition(&d.s0, S0_S2, &d.s2);
    assert_eq!(query_state(&d, &d.s1), 1);
    assert_eq!(query_state(&d, &d.s2), 1);
}
