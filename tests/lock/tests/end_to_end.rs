//! End-to-end runs of both algorithms through the harness runner.

use waypoint_harness::config::{Algorithm, EvaluatorConfig, SearchConfig};
use waypoint_harness::runner::run_search;
use waypoint_harness::worlds::dead_end::DeadEndWorld;
use waypoint_harness::worlds::detour::DetourWorld;
use waypoint_harness::worlds::line::LineWorld;
use waypoint_harness::worlds::task_file::TaskFileWorld;
use waypoint_search::search_engine::SearchStatus;

const ASTAR: &str = r#"{
    "evaluators": {
        "h": {"type": "goalcount"},
        "f": {"type": "sum", "evaluators": [{"type": "g"}, {"type": "ref", "name": "h"}]}
    },
    "open_list": {
        "type": "tiebreaking",
        "evaluators": [{"type": "ref", "name": "f"}, {"type": "ref", "name": "h"}]
    },
    "f_evaluator": {"type": "ref", "name": "f"},
    "reopen_closed": true
}"#;

fn config(json: &str, algorithm: Algorithm) -> SearchConfig {
    let mut config = SearchConfig::from_json(json).unwrap();
    config.algorithm = algorithm;
    config
}

#[test]
fn astar_finds_the_cheapest_detour_plan() {
    let report = run_search(&DetourWorld, &config(ASTAR, Algorithm::Eager)).unwrap();
    assert_eq!(report.status, SearchStatus::Solved);
    assert_eq!(report.plan, ["s0-s2"]);
    assert_eq!(report.plan_cost, Some(5));
    assert!(report.statistics.evaluations > 0);
}

#[test]
fn weighted_lazy_search_solves_the_line() {
    let json = r#"{
        "algorithm": "lazy",
        "open_list": {"type": "tiebreaking", "evaluators": [
            {"type": "sum", "evaluators": [
                {"type": "g"},
                {"type": "weight", "weight": 5, "evaluator": {"type": "goalcount"}}
            ]}
        ]}
    }"#;
    let report = run_search(&LineWorld { length: 6 }, &SearchConfig::from_json(json).unwrap()).unwrap();
    assert_eq!(report.status, SearchStatus::Solved);
    assert_eq!(report.plan.len(), 6);
    assert_eq!(report.plan_cost, Some(6));
}

#[test]
fn both_algorithms_fail_on_the_dead_end_world() {
    for algorithm in [Algorithm::Eager, Algorithm::Lazy] {
        let report = run_search(&DeadEndWorld, &config(ASTAR, algorithm)).unwrap();
        assert_eq!(report.status, SearchStatus::Failed, "{algorithm:?}");
        assert!(report.plan.is_empty());
        assert_eq!(report.plan_cost, None);
    }
}

#[test]
fn bound_equal_to_the_optimum_prunes_it() {
    for algorithm in [Algorithm::Eager, Algorithm::Lazy] {
        let mut at_optimum = config(ASTAR, algorithm);
        at_optimum.engine.bound = waypoint_search::options::Bound::new(5);
        let report = run_search(&DetourWorld, &at_optimum).unwrap();
        assert_eq!(report.status, SearchStatus::Failed, "{algorithm:?}");

        let mut above = config(ASTAR, algorithm);
        above.engine.bound = waypoint_search::options::Bound::new(6);
        let report = run_search(&DetourWorld, &above).unwrap();
        assert_eq!(report.status, SearchStatus::Solved, "{algorithm:?}");
        assert_eq!(report.plan_cost, Some(5));
    }
}

#[test]
fn task_file_world_runs_like_a_builtin_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("switches.json");
    std::fs::write(
        &path,
        r#"{
            "variables": [{"name": "a", "domain_size": 2}, {"name": "b", "domain_size": 2}],
            "operators": [
                {"name": "on-a", "cost": 1, "effects": [{"var": 0, "value": 1}]},
                {"name": "on-b", "cost": 1, "preconditions": [{"var": 0, "value": 1}],
                 "effects": [{"var": 1, "value": 1}]}
            ],
            "initial_state": [0, 0],
            "goals": [{"var": 1, "value": 1}]
        }"#,
    )
    .unwrap();
    let world = TaskFileWorld::load(&path).unwrap();

    let report = run_search(
        &world,
        &SearchConfig::greedy(
            Algorithm::Lazy,
            EvaluatorConfig::GoalCount {
                cache_estimates: true,
                description: None,
            },
        ),
    )
    .unwrap();
    assert_eq!(report.world_id, "switches");
    assert_eq!(report.plan, ["on-a", "on-b"]);
}

#[test]
fn plan_files_are_written_by_both_algorithms() {
    let dir = tempfile::tempdir().unwrap();
    for (algorithm, name) in [(Algorithm::Eager, "eager_plan"), (Algorithm::Lazy, "lazy_plan")] {
        let mut with_file = config(ASTAR, algorithm);
        with_file.plan_file = Some(dir.path().join(name));
        let report = run_search(&DetourWorld, &with_file).unwrap();
        let written = std::fs::read_to_string(report.plan_file.unwrap()).unwrap();
        assert_eq!(written, "(s0-s2)\n; cost = 5 (general cost)\n");
    }
}
