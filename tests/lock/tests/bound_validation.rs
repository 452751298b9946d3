//! Lock tests: a negative cost bound is a fatal input error, reported
//! before any search step runs, in-process and as a process exit status.

use std::path::Path;
use std::process::{Command, Output};
use std::rc::Rc;

use lock_tests::detour_task;
use waypoint_kernel::task::Task;
use waypoint_search::eager_search::{EagerSearch, EagerSearchOptions};
use waypoint_search::error::{ExitCode, SearchError};
use waypoint_search::evaluation_context::StateEntry;
use waypoint_search::evaluator::EvaluatorRef;
use waypoint_search::evaluators::g_evaluator::GEvaluator;
use waypoint_search::open_list::TieBreakingOpenList;
use waypoint_search::options::{Bound, SearchEngineOptions};
use waypoint_search::search_engine::SearchEngine;

fn run_fixture(args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_search_fixture");
    Command::new(bin)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("failed to spawn {bin}: {e}"))
}

fn write_config(dir: &Path, json: &str) -> String {
    let path = dir.join("config.json");
    std::fs::write(&path, json).unwrap();
    path.to_string_lossy().into_owned()
}

fn uniform_cost_search(task: &Rc<Task>) -> EagerSearch {
    let g: EvaluatorRef = Rc::new(GEvaluator::with_defaults(Rc::clone(task)));
    EagerSearch::new(
        Box::new(TieBreakingOpenList::<StateEntry>::single(g)),
        EagerSearchOptions::default(),
    )
}

#[test]
fn engine_rejects_negative_bound() {
    let task = detour_task();
    let algorithm = uniform_cost_search(&task);
    let Err(err) = SearchEngine::new(
        task,
        SearchEngineOptions {
            bound: Bound::new(-1),
            ..SearchEngineOptions::default()
        },
        algorithm,
    ) else {
        panic!("negative bound was accepted");
    };
    assert!(matches!(err, SearchError::NegativeBound { bound: -1 }));
    assert_eq!(err.exit_code(), ExitCode::SearchInputError);
}

#[test]
fn zero_bound_is_accepted() {
    let task = detour_task();
    let algorithm = uniform_cost_search(&task);
    let engine = SearchEngine::new(
        task,
        SearchEngineOptions {
            bound: Bound::new(0),
            ..SearchEngineOptions::default()
        },
        algorithm,
    )
    .unwrap();
    assert_eq!(engine.steps(), 0);
}

#[test]
fn fixture_exits_with_input_error_and_no_search_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        r#"{"engine": {"bound": -1},
            "open_list": {"type": "tiebreaking", "evaluators": [{"type": "g"}]}}"#,
    );

    let output = run_fixture(&["detour", &config]);
    assert_eq!(output.status.code(), Some(ExitCode::SearchInputError.code()));
    assert!(
        output.stdout.is_empty(),
        "no report expected, got {}",
        String::from_utf8_lossy(&output.stdout)
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("negative cost bound -1"), "stderr: {stderr}");
    assert!(!stderr.contains("Conducting"), "a search started: {stderr}");
}

#[test]
fn fixture_rejects_negative_max_time() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        r#"{"engine": {"max_time": -1.0},
            "open_list": {"type": "tiebreaking", "evaluators": [{"type": "g"}]}}"#,
    );
    let output = run_fixture(&["line", &config]);
    assert_eq!(output.status.code(), Some(33));
    assert!(output.stdout.is_empty());
}

#[test]
fn fixture_exit_codes_follow_the_outcome() {
    assert_eq!(run_fixture(&["detour"]).status.code(), Some(0));
    assert_eq!(
        run_fixture(&["dead_end"]).status.code(),
        Some(ExitCode::SearchUnsolvedIncomplete.code())
    );

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        r#"{"engine": {"max_time": 0.0},
            "open_list": {"type": "tiebreaking", "evaluators": [{"type": "goalcount"}]}}"#,
    );
    let output = run_fixture(&["line", &config]);
    assert_eq!(output.status.code(), Some(ExitCode::SearchOutOfTime.code()));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("status=TIMEOUT\n"), "stdout: {stdout}");
    assert!(stdout.contains("steps=1\n"), "stdout: {stdout}");
}

#[test]
fn fixture_rejects_unknown_world() {
    let output = run_fixture(&["/nonexistent/world.json"]);
    assert_eq!(output.status.code(), Some(33));
}
