//! State registry: the bijective value-vector ↔ [`StateId`] mapping for one
//! search.
//!
//! States are registered on first sight and never removed; ids are dense and
//! handed out in registration order, so the same task explored in the same
//! order always yields the same ids.

use std::collections::HashMap;
use std::rc::Rc;

use crate::state::{OperatorId, State, StateId};
use crate::task::Task;

/// Materialise a state from its id.
pub trait StateLookup {
    /// # Panics
    ///
    /// Implementations panic if `id` was not handed out by this lookup.
    fn lookup_state(&self, id: StateId) -> State;
}

/// Deduplicating store of every state generated during a search.
#[derive(Debug)]
pub struct StateRegistry {
    task: Rc<Task>,
    states: Vec<Rc<[u32]>>,
    ids: HashMap<Rc<[u32]>, StateId>,
}

impl StateRegistry {
    #[must_use]
    pub fn new(task: Rc<Task>) -> Self {
        Self {
            task,
            states: Vec::new(),
            ids: HashMap::new(),
        }
    }

    #[must_use]
    pub fn task(&self) -> &Rc<Task> {
        &self.task
    }

    /// Register (if needed) and return the task's initial state.
    pub fn initial_state(&mut self) -> State {
        let values: Rc<[u32]> = Rc::from(self.task.initial_state_values());
        self.insert(values)
    }

    /// Apply `op` to `predecessor` and register the result.
    ///
    /// # Panics
    ///
    /// Panics if `op` is not applicable in `predecessor`; callers only pass
    /// operators produced by the successor generator.
    pub fn get_successor_state(&mut self, predecessor: &State, op: OperatorId) -> State {
        assert!(
            self.task.is_applicable(op, predecessor),
            "operator {op} is not applicable in state {}",
            predecessor.id()
        );
        let mut values = predecessor.values().to_vec();
        for effect in &self.task.operator(op).effects {
            values[effect.var] = effect.value;
        }
        self.insert(Rc::from(values))
    }

    /// Number of registered states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn insert(&mut self, values: Rc<[u32]>) -> State {
        if let Some(&id) = self.ids.get(&values) {
            return State::new(id, Rc::clone(&self.states[id.index()]));
        }
        let Ok(index) = u32::try_from(self.states.len()) else {
            panic!("state registry exceeded {} states", u32::MAX);
        };
        let id = StateId::new(index);
        self.states.push(Rc::clone(&values));
        self.ids.insert(Rc::clone(&values), id);
        State::new(id, values)
    }
}

impl StateLookup for StateRegistry {
    fn lookup_state(&self, id: StateId) -> State {
        State::new(id, Rc::clone(&self.states[id.index()]))
    }
}
