//! Planning task: finite-domain variables, operators with costs, goal.
//!
//! A task is validated once at construction. Everything downstream (the
//! registry, the successor generator, evaluators) relies on that and indexes
//! without re-checking.

use std::collections::BTreeSet;

use serde::Deserialize;
use thiserror::Error;

use crate::cost::OperatorCost;
use crate::state::{OperatorId, State};

/// A finite-domain state variable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Variable {
    pub name: String,
    pub domain_size: u32,
}

/// Assignment `var = value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub struct Fact {
    pub var: usize,
    pub value: u32,
}

impl Fact {
    #[must_use]
    pub const fn new(var: usize, value: u32) -> Self {
        Self { var, value }
    }

    #[must_use]
    pub fn holds_in(&self, state: &State) -> bool {
        state.value(self.var) == self.value
    }
}

/// A ground action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Operator {
    pub name: String,
    pub cost: i32,
    #[serde(default)]
    pub preconditions: Vec<Fact>,
    pub effects: Vec<Fact>,
}

/// Why a task description was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("initial state has {actual} values but the task has {expected} variables")]
    InitialStateLength { expected: usize, actual: usize },
    #[error("{context} refers to variable {var}, but the task has {count} variables")]
    UnknownVariable {
        context: String,
        var: usize,
        count: usize,
    },
    #[error("{context} assigns value {value} to variable {var} with domain size {domain_size}")]
    ValueOutOfDomain {
        context: String,
        var: usize,
        value: u32,
        domain_size: u32,
    },
    #[error("operator {name} has negative cost {cost}")]
    NegativeCost { name: String, cost: i32 },
    #[error("operator {name} has two effects on variable {var}")]
    ConflictingEffects { name: String, var: usize },
}

/// Serialized form of a [`Task`], validated through `TryFrom`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskDescription {
    pub variables: Vec<Variable>,
    pub operators: Vec<Operator>,
    pub initial_state: Vec<u32>,
    pub goals: Vec<Fact>,
}

/// A validated planning task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "TaskDescription")]
pub struct Task {
    variables: Vec<Variable>,
    operators: Vec<Operator>,
    initial_state: Vec<u32>,
    goals: Vec<Fact>,
    is_unit_cost: bool,
}

impl Task {
    /// Build and validate a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError`] if any fact refers to an unknown variable or a
    /// value outside its domain, the initial state has the wrong length, an
    /// operator has negative cost, or an operator assigns one variable twice.
    pub fn new(
        variables: Vec<Variable>,
        operators: Vec<Operator>,
        initial_state: Vec<u32>,
        goals: Vec<Fact>,
    ) -> Result<Self, TaskError> {
        if initial_state.len() != variables.len() {
            return Err(TaskError::InitialStateLength {
                expected: variables.len(),
                actual: initial_state.len(),
            });
        }
        for (var, &value) in initial_state.iter().enumerate() {
            check_fact(&variables, Fact::new(var, value), "initial state")?;
        }
        for &goal in &goals {
            check_fact(&variables, goal, "goal")?;
        }
        for op in &operators {
            if op.cost < 0 {
                return Err(TaskError::NegativeCost {
                    name: op.name.clone(),
                    cost: op.cost,
                });
            }
            let context = format!("operator {}", op.name);
            for &pre in &op.preconditions {
                check_fact(&variables, pre, &context)?;
            }
            let mut seen = BTreeSet::new();
            for &eff in &op.effects {
                check_fact(&variables, eff, &context)?;
                if !seen.insert(eff.var) {
                    return Err(TaskError::ConflictingEffects {
                        name: op.name.clone(),
                        var: eff.var,
                    });
                }
            }
        }
        let is_unit_cost = operators.iter().all(|op| op.cost == 1);
        Ok(Self {
            variables,
            operators,
            initial_state,
            goals,
            is_unit_cost,
        })
    }

    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    #[must_use]
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    /// # Panics
    ///
    /// Panics if `id` is [`OperatorId::NO_OPERATOR`] or out of range.
    #[must_use]
    pub fn operator(&self, id: OperatorId) -> &Operator {
        &self.operators[id.index()]
    }

    #[must_use]
    pub fn initial_state_values(&self) -> &[u32] {
        &self.initial_state
    }

    #[must_use]
    pub fn goals(&self) -> &[Fact] {
        &self.goals
    }

    /// True iff every operator costs exactly 1.
    #[must_use]
    pub fn is_unit_cost(&self) -> bool {
        self.is_unit_cost
    }

    /// Cost of `id` under the given transformation.
    #[must_use]
    pub fn operator_cost(&self, id: OperatorId, cost_type: OperatorCost) -> i32 {
        cost_type.adjust(self.operator(id).cost, self.is_unit_cost)
    }

    #[must_use]
    pub fn is_goal_state(&self, state: &State) -> bool {
        self.goals.iter().all(|goal| goal.holds_in(state))
    }

    #[must_use]
    pub fn is_applicable(&self, id: OperatorId, state: &State) -> bool {
        self.operator(id)
            .preconditions
            .iter()
            .all(|pre| pre.holds_in(state))
    }
}

impl TryFrom<TaskDescription> for Task {
    type Error = TaskError;

    fn try_from(desc: TaskDescription) -> Result<Self, Self::Error> {
        Self::new(desc.variables, desc.operators, desc.initial_state, desc.goals)
    }
}

fn check_fact(variables: &[Variable], fact: Fact, context: &str) -> Result<(), TaskError> {
    let Some(variable) = variables.get(fact.var) else {
        return Err(TaskError::UnknownVariable {
            context: context.to_string(),
            var: fact.var,
            count: variables.len(),
        });
    };
    if fact.value >= variable.domain_size {
        return Err(TaskError::ValueOutOfDomain {
            context: context.to_string(),
            var: fact.var,
            value: fact.value,
            domain_size: variable.domain_size,
        });
    }
    Ok(())
}
