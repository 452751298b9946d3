//! Operator cost transformations.

use serde::{Deserialize, Serialize};

/// How operator costs are seen by an evaluator or a search algorithm.
///
/// The bound is always checked against [`OperatorCost::Normal`] costs,
/// whatever transformation the heuristics use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorCost {
    /// Costs as given by the task.
    #[default]
    Normal,
    /// Every operator costs 1.
    One,
    /// Cost + 1, so that zero-cost operators are not free. On unit-cost
    /// tasks this is the same as `One`.
    PlusOne,
}

impl OperatorCost {
    /// Apply this transformation to an original operator cost.
    #[must_use]
    pub fn adjust(self, cost: i32, is_unit_cost: bool) -> i32 {
        match self {
            Self::Normal => cost,
            Self::One => 1,
            Self::PlusOne => {
                if is_unit_cost {
                    1
                } else {
                    cost.saturating_add(1)
                }
            }
        }
    }
}
