//! Typed search errors and process exit codes.
//!
//! `SearchError` represents fatal configuration and I/O failures only. They
//! are raised before the first search step (or when persisting a plan after
//! the search). Expected outcomes such as an exhausted search space or a
//! timeout are not errors; they are terminal
//! [`crate::search_engine::SearchStatus`] values.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal failure surfaced to the caller before (or after) search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The engine was configured with a negative cost bound.
    #[error("negative cost bound {bound}")]
    NegativeBound { bound: i64 },

    /// The engine was configured with a negative time limit.
    #[error("negative max_time {max_time}")]
    NegativeMaxTime { max_time: f64 },

    /// The real-cost evaluator built for bound pruning does not cache its
    /// estimates, so its dirty-flag bookkeeping would be meaningless.
    #[error("real-cost evaluator {description} must cache its estimates")]
    UncachedRealCostEvaluator { description: String },

    /// A weighted evaluator was configured with a negative weight.
    #[error("weighted evaluator {description} has negative weight {weight}")]
    NegativeWeight { description: String, weight: i32 },

    /// An evaluator or open list was configured inconsistently.
    #[error("invalid configuration: {detail}")]
    InvalidConfiguration { detail: String },

    /// The plan file could not be written.
    #[error("cannot write plan file {}: {source}", path.display())]
    PlanWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SearchError {
    /// Exit code a binary should terminate with for this error.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::NegativeBound { .. }
            | Self::NegativeMaxTime { .. }
            | Self::UncachedRealCostEvaluator { .. }
            | Self::NegativeWeight { .. }
            | Self::InvalidConfiguration { .. } => ExitCode::SearchInputError,
            Self::PlanWrite { .. } => ExitCode::SearchCriticalError,
        }
    }
}

/// Process exit statuses of search binaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    /// The task was proven unsolvable.
    SearchUnsolvable,
    /// The search finished without a plan and without a proof.
    SearchUnsolvedIncomplete,
    SearchOutOfTime,
    SearchCriticalError,
    /// Invalid configuration or task input.
    SearchInputError,
    SearchUnsupported,
}

impl ExitCode {
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::SearchUnsolvable => 11,
            Self::SearchUnsolvedIncomplete => 12,
            Self::SearchOutOfTime => 23,
            Self::SearchCriticalError => 32,
            Self::SearchInputError => 33,
            Self::SearchUnsupported => 34,
        }
    }

    #[must_use]
    pub fn is_unrecoverable(self) -> bool {
        matches!(
            self,
            Self::SearchCriticalError | Self::SearchInputError | Self::SearchUnsupported
        )
    }
}

/// Log `code` and terminate the process with it.
pub fn exit_with(code: ExitCode) -> ! {
    if code.is_unrecoverable() {
        tracing::error!(exit_code = code.code(), "search terminated: {code:?}");
    } else {
        tracing::info!(exit_code = code.code(), "search exit: {code:?}");
    }
    std::process::exit(code.code())
}
