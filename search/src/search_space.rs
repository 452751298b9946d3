//! Per-state search bookkeeping: status, costs and back pointers.
//!
//! The search space is the path-reconstruction collaborator of the engine:
//! every opened state remembers its parent and creating operator, so the
//! plan to a goal is traced backwards once the goal is found.

use waypoint_kernel::state::{OperatorId, State, StateId};

use crate::plan::Plan;

/// Lifecycle of a state in one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeStatus {
    #[default]
    New,
    Open,
    Closed,
    DeadEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchNodeInfo {
    pub status: NodeStatus,
    /// Path cost under the search's cost type.
    pub g: i32,
    pub parent: Option<StateId>,
    pub creating_operator: OperatorId,
}

impl Default for SearchNodeInfo {
    fn default() -> Self {
        Self {
            status: NodeStatus::New,
            g: -1,
            parent: None,
            creating_operator: OperatorId::NO_OPERATOR,
        }
    }
}

impl SearchNodeInfo {
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.status == NodeStatus::New
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == NodeStatus::Open
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status == NodeStatus::Closed
    }

    #[must_use]
    pub fn is_dead_end(&self) -> bool {
        self.status == NodeStatus::DeadEnd
    }
}

#[derive(Debug, Default)]
pub struct SearchSpace {
    nodes: Vec<SearchNodeInfo>,
}

impl SearchSpace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bookkeeping for `state`; unseen states are `New`.
    #[must_use]
    pub fn node(&self, state: StateId) -> SearchNodeInfo {
        self.nodes.get(state.index()).copied().unwrap_or_default()
    }

    fn node_mut(&mut self, state: StateId) -> &mut SearchNodeInfo {
        let index = state.index();
        if index >= self.nodes.len() {
            self.nodes.resize_with(index + 1, SearchNodeInfo::default);
        }
        &mut self.nodes[index]
    }

    /// # Panics
    ///
    /// Panics unless `state` is new.
    pub fn open_initial(&mut self, state: &State) {
        let node = self.node_mut(state.id());
        assert!(node.is_new(), "initial state {} opened twice", state.id());
        *node = SearchNodeInfo {
            status: NodeStatus::Open,
            g: 0,
            parent: None,
            creating_operator: OperatorId::NO_OPERATOR,
        };
    }

    /// Open a new state reached from `parent` through `operator_id`, whose
    /// cost under the search's cost type is `cost`.
    ///
    /// # Panics
    ///
    /// Panics unless `state` is new.
    pub fn open(&mut self, state: &State, parent: &State, operator_id: OperatorId, cost: i32) {
        assert!(
            self.node(state.id()).is_new(),
            "state {} opened twice",
            state.id()
        );
        self.set_path(state, parent, operator_id, cost);
        self.node_mut(state.id()).status = NodeStatus::Open;
    }

    /// Reopen an open or closed state after a cheaper path was found.
    ///
    /// # Panics
    ///
    /// Panics if `state` is new or a dead end.
    pub fn reopen(&mut self, state: &State, parent: &State, operator_id: OperatorId, cost: i32) {
        let node = self.node(state.id());
        assert!(
            node.is_open() || node.is_closed(),
            "cannot reopen state {} with status {:?}",
            state.id(),
            node.status
        );
        self.set_path(state, parent, operator_id, cost);
        self.node_mut(state.id()).status = NodeStatus::Open;
    }

    /// Redirect the back pointer of an open or closed state without
    /// changing its status.
    pub fn update_parent(
        &mut self,
        state: &State,
        parent: &State,
        operator_id: OperatorId,
        cost: i32,
    ) {
        self.set_path(state, parent, operator_id, cost);
    }

    fn set_path(&mut self, state: &State, parent: &State, operator_id: OperatorId, cost: i32) {
        let parent_node = self.node(parent.id());
        let node = self.node_mut(state.id());
        node.g = parent_node.g.saturating_add(cost);
        node.parent = Some(parent.id());
        node.creating_operator = operator_id;
    }

    /// # Panics
    ///
    /// Panics unless `state` is open.
    pub fn close(&mut self, state: &State) {
        let node = self.node_mut(state.id());
        assert!(node.is_open(), "closing state {} with status {:?}", state.id(), node.status);
        node.status = NodeStatus::Closed;
    }

    pub fn mark_as_dead_end(&mut self, state: &State) {
        self.node_mut(state.id()).status = NodeStatus::DeadEnd;
    }

    /// Operators leading from the initial state to `goal`, following back
    /// pointers.
    #[must_use]
    pub fn trace_path(&self, goal: &State) -> Plan {
        let mut plan = Vec::new();
        let mut current = goal.id();
        loop {
            let node = self.node(current);
            let Some(parent) = node.parent else {
                break;
            };
            plan.push(node.creating_operator);
            current = parent;
        }
        plan.reverse();
        plan
    }

    /// Number of states that left the `New` status.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|node| !node.is_new()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
