//! Waypoint Harness: configuration, demonstration worlds and the runner.
//!
//! The harness turns a JSON [`config::SearchConfig`] into evaluators, an
//! open list and a search algorithm, runs it against a
//! [`contract::PlanningWorld`], and summarises the outcome as a
//! [`runner::SearchReportV1`].
//!
//! The harness does NOT implement search logic. It delegates to
//! `waypoint_search`; worlds provide tasks only.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod contract;
pub mod runner;
pub mod worlds;
