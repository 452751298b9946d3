//! Harness runner: builds a search from a [`SearchConfig`], runs it on a
//! world, and summarises the outcome.
//!
//! # Pipeline
//!
//! ```text
//! world.task() → build evaluators (shared by name) → build open list
//!   → SearchEngine::new (validates bound / max_time) → search()
//!   → print statistics → save plan (if configured) → SearchReportV1
//! ```
//!
//! Every configuration error surfaces before the first search step.

use std::path::PathBuf;
use std::rc::Rc;

use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use waypoint_kernel::task::{Task, TaskError};
use waypoint_search::eager_search::{EagerSearch, EagerSearchOptions};
use waypoint_search::error::{ExitCode, SearchError};
use waypoint_search::evaluation_context::{EdgeEntry, StateEntry};
use waypoint_search::lazy_search::{LazySearch, LazySearchOptions};
use waypoint_search::plan::{calculate_plan_cost, render_plan};
use waypoint_search::search_engine::{SearchAlgorithm, SearchEngine, SearchStatus};
use waypoint_search::statistics::StatisticsSnapshot;

use crate::config::{Algorithm, ConfigError, EvaluatorBuilder, SearchConfig};
use crate::contract::PlanningWorld;

/// Domain prefix of plan digests.
pub const DOMAIN_PLAN: &[u8] = b"WAYPOINT::PLAN::V1\0";

/// Error during a harness run. Expected outcomes (no plan, timeout) are
/// not errors; they are reported through [`SearchReportV1::status`].
#[derive(Debug, Error)]
pub enum RunError {
    #[error("world {world_id} has an invalid task: {source}")]
    InvalidTask {
        world_id: String,
        #[source]
        source: TaskError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

impl RunError {
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidTask { .. } => ExitCode::SearchInputError,
            Self::Config(err) => err.exit_code(),
            Self::Search(err) => err.exit_code(),
        }
    }
}

/// Outcome of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchReportV1 {
    pub world_id: String,
    pub algorithm: Algorithm,
    pub status: SearchStatus,
    /// Operator names, in order. Empty unless solved.
    pub plan: Vec<String>,
    pub plan_cost: Option<i32>,
    /// `sha256:<hex>` over the rendered plan, when solved.
    pub plan_digest: Option<String>,
    pub plan_file: Option<PathBuf>,
    pub steps: u64,
    pub statistics: StatisticsSnapshot,
}

impl SearchReportV1 {
    /// Exit code a search binary reports for this outcome.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self.status {
            SearchStatus::Solved => ExitCode::Success,
            SearchStatus::Timeout => ExitCode::SearchOutOfTime,
            SearchStatus::Failed | SearchStatus::InProgress => ExitCode::SearchUnsolvedIncomplete,
        }
    }
}

/// Domain-separated SHA-256 of `plan_text`, as `sha256:<hex>`.
#[must_use]
pub fn plan_digest(plan_text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(DOMAIN_PLAN);
    hasher.update(plan_text.as_bytes());
    format!("sha256:{}", hex::encode(hasher.finalize()))
}

/// Run `config` against `world`.
///
/// # Errors
///
/// Returns [`RunError`] if the world's task is invalid or the configuration
/// is rejected. No search step runs in that case.
pub fn run_search(
    world: &dyn PlanningWorld,
    config: &SearchConfig,
) -> Result<SearchReportV1, RunError> {
    let task = Rc::new(world.task().map_err(|source| RunError::InvalidTask {
        world_id: world.world_id().to_string(),
        source,
    })?);
    tracing::debug!(world_id = world.world_id(), algorithm = ?config.algorithm, "building search");

    let mut builder = EvaluatorBuilder::new(Rc::clone(&task), &config.evaluators);
    let preferred = builder.build_all(&config.preferred)?;

    match config.algorithm {
        Algorithm::Eager => {
            let open_list = config.open_list.build::<StateEntry>(&mut builder)?;
            let f_evaluator = config
                .f_evaluator
                .as_ref()
                .map(|f| builder.build(f))
                .transpose()?;
            if config.preferred_successors_first {
                tracing::warn!("preferred_successors_first only applies to lazy search");
            }
            let algorithm = EagerSearch::new(
                open_list,
                EagerSearchOptions {
                    reopen_closed: config.reopen_closed,
                    f_evaluator,
                    preferred,
                },
            );
            let engine = SearchEngine::new(Rc::clone(&task), config.engine, algorithm)?;
            run_engine(world, config, &task, engine)
        }
        Algorithm::Lazy => {
            let open_list = config.open_list.build::<EdgeEntry>(&mut builder)?;
            if config.f_evaluator.is_some() {
                tracing::warn!("f_evaluator only applies to eager search");
            }
            let algorithm = LazySearch::new(
                open_list,
                LazySearchOptions {
                    reopen_closed: config.reopen_closed,
                    preferred,
                    preferred_successors_first: config.preferred_successors_first,
                },
            );
            let engine = SearchEngine::new(Rc::clone(&task), config.engine, algorithm)?;
            run_engine(world, config, &task, engine)
        }
    }
}

fn run_engine<A: SearchAlgorithm>(
    world: &dyn PlanningWorld,
    config: &SearchConfig,
    task: &Task,
    mut engine: SearchEngine<A>,
) -> Result<SearchReportV1, RunError> {
    if let Some(path) = &config.plan_file {
        engine
            .core_mut()
            .plan_manager_mut()
            .set_plan_filename(path.clone());
    }

    let status = engine.search();
    engine.print_statistics();

    let plan_file = if config.plan_file.is_some() {
        engine.save_plan_if_necessary()?
    } else {
        None
    };

    let (plan, plan_cost, digest) = match engine.core().plan() {
        Some(plan) => (
            plan.iter()
                .map(|&op| task.operator(op).name.clone())
                .collect(),
            Some(calculate_plan_cost(plan, task)),
            Some(plan_digest(&render_plan(plan, task))),
        ),
        None => (Vec::new(), None, None),
    };

    Ok(SearchReportV1 {
        world_id: world.world_id().to_string(),
        algorithm: config.algorithm,
        status,
        plan,
        plan_cost,
        plan_digest: digest,
        plan_file,
        steps: engine.steps(),
        statistics: engine.core().statistics().snapshot(),
    })
}
