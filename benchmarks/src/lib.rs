//! Shared helpers for waypoint benchmark suites.

use std::rc::Rc;

use waypoint_harness::config::{Algorithm, SearchConfig};
use waypoint_harness::contract::PlanningWorld;
use waypoint_harness::worlds::line::LineWorld;
use waypoint_kernel::registry::StateRegistry;
use waypoint_kernel::task::Task;
use waypoint_search::evaluation_context::{StateEntry, StateEvaluationContext};

/// A* configuration: `f = g + goalcount`, ties broken on goalcount.
pub const ASTAR_JSON: &str = r#"{
    "engine": {"verbosity": "silent"},
    "evaluators": {
        "h": {"type": "goalcount"},
        "f": {"type": "sum", "evaluators": [{"type": "g"}, {"type": "ref", "name": "h"}]}
    },
    "open_list": {
        "type": "tiebreaking",
        "evaluators": [{"type": "ref", "name": "f"}, {"type": "ref", "name": "h"}]
    }
}"#;

/// # Panics
///
/// Panics if the built-in configuration no longer parses.
#[must_use]
pub fn astar_config(algorithm: Algorithm) -> SearchConfig {
    let mut config = SearchConfig::from_json(ASTAR_JSON).expect("benchmark config parses");
    config.algorithm = algorithm;
    config
}

/// # Panics
///
/// Panics if the line world is malformed.
#[must_use]
pub fn line_task(length: u32) -> Rc<Task> {
    Rc::new(LineWorld { length }.task().expect("line world is valid"))
}

/// Fresh context for the initial state of `task`, with statistics off.
#[must_use]
pub fn initial_context(task: &Rc<Task>) -> StateEvaluationContext {
    let mut registry = StateRegistry::new(Rc::clone(task));
    let initial = registry.initial_state();
    StateEvaluationContext::new(StateEntry(initial.id()), &registry, false, None, false)
}
