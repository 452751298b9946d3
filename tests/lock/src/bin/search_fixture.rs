//! Binary that runs one world through the harness runner and prints
//! deterministic output lines for cross-process verification.
//!
//! Usage: `search_fixture [<world> [<config.json>]]`
//!
//! `<world>` is a built-in world id or a path to a task JSON file
//! (default `detour`). Without a config file the search is eager
//! uniform-cost search.
//!
//! Output: key=value lines on stdout (see source for format); logs go to
//! stderr. The process exits with the outcome's exit code, or with the
//! error's exit code when the run is rejected before searching.

use std::path::Path;

use tracing_subscriber::EnvFilter;
use waypoint_harness::config::{Algorithm, EvaluatorConfig, SearchConfig};
use waypoint_harness::contract::PlanningWorld;
use waypoint_harness::runner::{run_search, SearchReportV1};
use waypoint_harness::worlds::builtin;
use waypoint_harness::worlds::task_file::TaskFileWorld;
use waypoint_kernel::cost::OperatorCost;
use waypoint_search::error::{exit_with, ExitCode};
use waypoint_search::options::Verbosity;

fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity.level_filter().into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn uniform_cost() -> SearchConfig {
    SearchConfig::greedy(
        Algorithm::Eager,
        EvaluatorConfig::G {
            cost_type: OperatorCost::Normal,
            cache_estimates: true,
            description: None,
        },
    )
}

fn load_world(arg: &str) -> Box<dyn PlanningWorld> {
    if let Some(world) = builtin(arg) {
        return world;
    }
    match TaskFileWorld::load(Path::new(arg)) {
        Ok(world) => Box::new(world),
        Err(err) => {
            tracing::error!("{err}");
            exit_with(ExitCode::SearchInputError)
        }
    }
}

fn print_report(report: &SearchReportV1) {
    let status = serde_json::to_value(report.status)
        .ok()
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_default();
    let stats = &report.statistics;

    println!("world_id={}", report.world_id);
    println!("status={status}");
    println!("plan={}", report.plan.join(","));
    println!(
        "plan_cost={}",
        report.plan_cost.map_or_else(|| "none".to_string(), |c| c.to_string())
    );
    println!(
        "plan_digest={}",
        report.plan_digest.as_deref().unwrap_or("none")
    );
    println!("steps={}", report.steps);
    println!("expanded={}", stats.expanded_states);
    println!("evaluated={}", stats.evaluated_states);
    println!("evaluations={}", stats.evaluations);
    println!("generated={}", stats.generated_states);
    println!("reopened={}", stats.reopened_states);
    println!("dead_ends={}", stats.dead_end_states);
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let world_arg = args.first().map_or("detour", String::as_str);
    let config = match args.get(1) {
        Some(path) => SearchConfig::from_file(Path::new(path)),
        None => Ok(uniform_cost()),
    };

    init_logging(
        config
            .as_ref()
            .map_or(Verbosity::Normal, |config| config.engine.verbosity),
    );

    let config = match config {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("{err}");
            exit_with(err.exit_code())
        }
    };
    let world = load_world(world_arg);

    match run_search(world.as_ref(), &config) {
        Ok(report) => {
            print_report(&report);
            exit_with(report.exit_code())
        }
        Err(err) => {
            tracing::error!("{err}");
            exit_with(err.exit_code())
        }
    }
}
