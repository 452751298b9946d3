//! Waypoint Kernel: the planning task model the search core runs against.
//!
//! # API Surface
//!
//! - [`task::Task`] -- variables, operators, costs, initial state and goal
//! - [`registry::StateRegistry`] -- deduplicating state storage with
//!   [`registry::StateLookup`] for materialising states from ids
//! - [`successor::SuccessorGenerator`] -- applicable-operator enumeration
//!
//! # Module Dependency Direction
//!
//! `state` ← `task` ← `registry` / `successor`
//!
//! One-way only. `cost` and `state` depend on nothing internal.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cost;
pub mod registry;
pub mod state;
pub mod successor;
pub mod task;
