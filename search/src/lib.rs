//! Waypoint Search: evaluation caching and search control for heuristic
//! state-space search.
//!
//! This crate depends only on `waypoint_kernel`; it does NOT depend on
//! `waypoint_harness`.
//!
//! # Crate dependency graph
//!
//! ```text
//! waypoint_kernel  ←  waypoint_search  ←  waypoint_harness
//! (task, registry)    (evaluators, engine)  (config, worlds, runner)
//! ```
//!
//! # Key types
//!
//! - [`evaluation_context::EvaluationContext`]: per-node memoized evaluator
//!   results; each evaluator is computed at most once per context
//! - [`evaluator::Evaluator`]: pluggable estimator, compared by identity
//! - [`search_progress::SearchProgress`]: new-minimum detection for
//!   reporting and open-list boosting
//! - [`search_engine::SearchEngine`]: the step loop and its status machine
//! - [`eager_search::EagerSearch`], [`lazy_search::LazySearch`]: best-first
//!   algorithms implementing [`search_engine::SearchAlgorithm`]

#![forbid(unsafe_code)]

pub mod eager_search;
pub mod error;
pub mod evaluation_context;
pub mod evaluation_result;
pub mod evaluator;
pub mod evaluator_cache;
pub mod evaluators;
pub mod heuristic;
pub mod lazy_search;
pub mod open_list;
pub mod options;
pub mod ordered_set;
pub mod plan;
pub mod search_engine;
pub mod search_progress;
pub mod search_space;
pub mod statistics;
pub mod timer;

#[cfg(test)]
pub(crate) mod test_support;
