//! Search-wide counters.
//!
//! One `SearchStatistics` is shared (through `Rc`) by the engine, the
//! algorithm and every evaluation context that should count evaluations.
//! Counters use `Cell` so that shared holders can bump them.

use std::cell::Cell;

use serde::Serialize;

use crate::options::Verbosity;

/// Counter values at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatisticsSnapshot {
    pub expanded_states: u64,
    pub evaluated_states: u64,
    pub evaluations: u64,
    pub generated_states: u64,
    pub reopened_states: u64,
    pub dead_end_states: u64,
    pub generated_ops: u64,
}

#[derive(Debug, Clone, Copy, Default)]
struct LastJump {
    f_value: Option<i32>,
    counters: StatisticsSnapshot,
}

/// Expansion, evaluation and generation counters plus f-layer tracking.
#[derive(Debug, Default)]
pub struct SearchStatistics {
    verbosity: Verbosity,
    expanded_states: Cell<u64>,
    evaluated_states: Cell<u64>,
    evaluations: Cell<u64>,
    generated_states: Cell<u64>,
    reopened_states: Cell<u64>,
    dead_end_states: Cell<u64>,
    generated_ops: Cell<u64>,
    last_jump: Cell<LastJump>,
}

fn bump(counter: &Cell<u64>, by: u64) {
    counter.set(counter.get() + by);
}

impl SearchStatistics {
    #[must_use]
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            ..Self::default()
        }
    }

    pub fn inc_expanded(&self) {
        bump(&self.expanded_states, 1);
    }

    pub fn inc_evaluated_states(&self, by: u64) {
        bump(&self.evaluated_states, by);
    }

    pub fn inc_evaluations(&self) {
        bump(&self.evaluations, 1);
    }

    pub fn inc_generated(&self) {
        bump(&self.generated_states, 1);
    }

    pub fn inc_reopened(&self) {
        bump(&self.reopened_states, 1);
    }

    pub fn inc_dead_ends(&self) {
        bump(&self.dead_end_states, 1);
    }

    pub fn inc_generated_ops(&self, by: u64) {
        bump(&self.generated_ops, by);
    }

    #[must_use]
    pub fn expanded(&self) -> u64 {
        self.expanded_states.get()
    }

    #[must_use]
    pub fn evaluated_states(&self) -> u64 {
        self.evaluated_states.get()
    }

    #[must_use]
    pub fn evaluations(&self) -> u64 {
        self.evaluations.get()
    }

    #[must_use]
    pub fn generated(&self) -> u64 {
        self.generated_states.get()
    }

    #[must_use]
    pub fn reopened(&self) -> u64 {
        self.reopened_states.get()
    }

    #[must_use]
    pub fn dead_ends(&self) -> u64 {
        self.dead_end_states.get()
    }

    #[must_use]
    pub fn generated_ops(&self) -> u64 {
        self.generated_ops.get()
    }

    #[must_use]
    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            expanded_states: self.expanded(),
            evaluated_states: self.evaluated_states(),
            evaluations: self.evaluations(),
            generated_states: self.generated(),
            reopened_states: self.reopened(),
            dead_end_states: self.dead_ends(),
            generated_ops: self.generated_ops(),
        }
    }

    /// Record that the search reached f-layer `f`. A layer above every
    /// previous one is a jump: the counters are remembered and an f line is
    /// logged.
    pub fn report_f_value_progress(&self, f: i32) {
        let last = self.last_jump.get();
        if last.f_value.is_some_and(|previous| f <= previous) {
            return;
        }
        self.last_jump.set(LastJump {
            f_value: Some(f),
            counters: self.snapshot(),
        });
        self.print_f_line(f);
    }

    /// Highest f-layer reported so far.
    #[must_use]
    pub fn last_jump_f_value(&self) -> Option<i32> {
        self.last_jump.get().f_value
    }

    fn print_f_line(&self, f: i32) {
        if self.verbosity >= Verbosity::Normal {
            tracing::info!(
                "f = {f}, {} evaluated, {} expanded",
                self.evaluated_states(),
                self.expanded()
            );
        }
    }

    pub fn print_checkpoint_line(&self, g: i32) {
        if self.verbosity >= Verbosity::Normal {
            tracing::info!(
                "g={g}, {} evaluated, {} expanded",
                self.evaluated_states(),
                self.expanded()
            );
        }
    }

    pub fn print_basic_statistics(&self) {
        tracing::info!("Expanded {} state(s).", self.expanded());
        tracing::info!("Reopened {} state(s).", self.reopened());
        tracing::info!("Evaluated {} state(s).", self.evaluated_states());
        tracing::info!("Evaluations: {}", self.evaluations());
        tracing::info!("Generated {} state(s).", self.generated());
        tracing::info!("Dead ends: {} state(s).", self.dead_ends());
    }

    /// Basic statistics plus, once an f jump happened, the counters as they
    /// stood at the last jump.
    pub fn print_detailed_statistics(&self) {
        self.print_basic_statistics();
        let last = self.last_jump.get();
        if last.f_value.is_some() {
            let at_jump = last.counters;
            tracing::info!(
                "Expanded until last jump: {} state(s).",
                at_jump.expanded_states
            );
            tracing::info!(
                "Reopened until last jump: {} state(s).",
                at_jump.reopened_states
            );
            tracing::info!(
                "Evaluated until last jump: {} state(s).",
                at_jump.evaluated_states
            );
            tracing::info!(
                "Generated until last jump: {} state(s).",
                at_jump.generated_states
            );
        }
    }
}
