//! Applicable-operator enumeration.

use std::rc::Rc;

use crate::state::{OperatorId, State};
use crate::task::Task;

/// Enumerates the operators applicable in a state.
///
/// Enumeration is deterministic: operators come back in task order.
#[derive(Debug, Clone)]
pub struct SuccessorGenerator {
    task: Rc<Task>,
}

impl SuccessorGenerator {
    #[must_use]
    pub fn new(task: Rc<Task>) -> Self {
        Self { task }
    }

    #[must_use]
    pub fn generate_applicable_ops(&self, state: &State) -> Vec<OperatorId> {
        (0..self.task.operators().len())
            .map(OperatorId::new)
            .filter(|&op| self.task.is_applicable(op, state))
            .collect()
    }
}
