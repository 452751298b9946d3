//! Lock tests: the engine's status machine. Terminal states are one-way,
//! the time limit is checked between steps, and a goal found by a step
//! yields a plan.

use std::rc::Rc;

use waypoint_harness::contract::PlanningWorld;
use waypoint_harness::worlds::line::LineWorld;
use waypoint_kernel::task::Task;
use waypoint_search::options::{MaxTime, SearchEngineOptions, Verbosity};
use waypoint_search::search_engine::{EngineCore, SearchAlgorithm, SearchEngine, SearchStatus};

/// Never finishes on its own.
#[derive(Debug, Default)]
struct Spin {
    initialized: u32,
}

impl SearchAlgorithm for Spin {
    fn initialize(&mut self, _core: &mut EngineCore) {
        self.initialized += 1;
    }

    fn step(&mut self, _core: &mut EngineCore) -> SearchStatus {
        SearchStatus::InProgress
    }
}

/// Walks the whole line to the goal within its first step.
#[derive(Debug, Default)]
struct Dash;

impl SearchAlgorithm for Dash {
    fn initialize(&mut self, _core: &mut EngineCore) {}

    fn step(&mut self, core: &mut EngineCore) -> SearchStatus {
        let mut current = core.registry_mut().initial_state();
        core.search_space_mut().open_initial(&current);
        loop {
            if core.check_goal_and_set_plan(&current) {
                return SearchStatus::Solved;
            }
            let ops = core.successor_generator().generate_applicable_ops(&current);
            let Some(&op) = ops.iter().find(|&&op| {
                let next = core.task().operator(op).effects[0].value;
                next > current.value(0)
            }) else {
                return SearchStatus::Failed;
            };
            let cost = core.get_adjusted_cost(op);
            let next = core.registry_mut().get_successor_state(&current, op);
            core.search_space_mut().open(&next, &current, op, cost);
            current = next;
        }
    }
}

fn line(length: u32) -> Rc<Task> {
    Rc::new(LineWorld { length }.task().unwrap())
}

fn options(max_time: MaxTime) -> SearchEngineOptions {
    SearchEngineOptions {
        max_time,
        verbosity: Verbosity::Silent,
        ..SearchEngineOptions::default()
    }
}

#[test]
fn zero_time_limit_stops_a_spinning_search_after_one_step() {
    let mut engine =
        SearchEngine::new(line(3), options(MaxTime::seconds(0.0)), Spin::default()).unwrap();
    assert_eq!(engine.get_status(), SearchStatus::InProgress);

    assert_eq!(engine.search(), SearchStatus::Timeout);
    assert_eq!(engine.get_status(), SearchStatus::Timeout);
    assert!(engine.steps() <= 1);
    assert_eq!(engine.algorithm().initialized, 1);
    assert!(!engine.found_solution());
}

#[test]
fn goal_reached_in_a_step_solves_with_a_plan() {
    let mut engine =
        SearchEngine::new(line(4), options(MaxTime::INFINITE), Dash).unwrap();
    assert_eq!(engine.search(), SearchStatus::Solved);
    assert!(engine.found_solution());
    assert_eq!(engine.steps(), 1);

    let plan = engine.get_plan();
    assert_eq!(plan.len(), 4);
    let names: Vec<&str> = plan
        .iter()
        .map(|&op| engine.core().task().operator(op).name.as_str())
        .collect();
    assert_eq!(names, ["step-0", "step-1", "step-2", "step-3"]);
}

#[test]
fn expired_timer_does_not_override_solved() {
    let mut engine =
        SearchEngine::new(line(2), options(MaxTime::seconds(0.0)), Dash).unwrap();
    assert_eq!(engine.search(), SearchStatus::Solved);
    assert_eq!(engine.get_plan().len(), 2);
}

#[test]
fn failed_is_terminal_and_not_an_error() {
    struct GiveUp;
    impl SearchAlgorithm for GiveUp {
        fn initialize(&mut self, _core: &mut EngineCore) {}
        fn step(&mut self, _core: &mut EngineCore) -> SearchStatus {
            SearchStatus::Failed
        }
    }

    let mut engine = SearchEngine::new(line(1), options(MaxTime::INFINITE), GiveUp).unwrap();
    assert_eq!(engine.search(), SearchStatus::Failed);
    assert!(engine.get_status().is_terminal());
    assert_eq!(engine.steps(), 1);
    assert_eq!(engine.save_plan_if_necessary().unwrap(), None);
}

#[test]
#[should_panic(expected = "plan is set exactly once")]
fn setting_the_plan_twice_panics() {
    let mut engine = SearchEngine::new(line(0), options(MaxTime::INFINITE), Spin::default()).unwrap();
    let goal = engine.core_mut().registry_mut().initial_state();
    engine.core_mut().search_space_mut().open_initial(&goal);
    assert!(engine.core_mut().check_goal_and_set_plan(&goal));
    let _ = engine.core_mut().check_goal_and_set_plan(&goal);
}
