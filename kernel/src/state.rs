//! State and operator identifiers plus the materialised state value.

use std::fmt;
use std::rc::Rc;

/// Dense identifier handed out by the state registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);

impl StateId {
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of an operator in its task.
///
/// [`OperatorId::NO_OPERATOR`] marks "no incoming action", e.g. for the
/// initial state of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperatorId(usize);

impl OperatorId {
    /// Sentinel for contexts and search nodes without an incoming operator.
    pub const NO_OPERATOR: Self = Self(usize::MAX);

    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position in [`crate::task::Task::operators`].
    ///
    /// # Panics
    ///
    /// Panics when called on [`OperatorId::NO_OPERATOR`].
    #[must_use]
    pub fn index(self) -> usize {
        assert!(!self.is_no_operator(), "NO_OPERATOR has no index");
        self.0
    }

    #[must_use]
    pub fn is_no_operator(self) -> bool {
        self == Self::NO_OPERATOR
    }
}

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_no_operator() {
            f.write_str("no_operator")
        } else {
            write!(f, "op{}", self.0)
        }
    }
}

/// A materialised state: its registry id plus one value per task variable.
///
/// The value vector is shared and immutable, so clones are cheap and stay
/// valid no matter what happens to the registry afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    id: StateId,
    values: Rc<[u32]>,
}

impl State {
    #[must_use]
    pub fn new(id: StateId, values: Rc<[u32]>) -> Self {
        Self { id, values }
    }

    #[must_use]
    pub fn id(&self) -> StateId {
        self.id
    }

    #[must_use]
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Value of variable `var`.
    ///
    /// # Panics
    ///
    /// Panics if `var` is out of range for this state.
    #[must_use]
    pub fn value(&self, var: usize) -> u32 {
        self.values[var]
    }
}
