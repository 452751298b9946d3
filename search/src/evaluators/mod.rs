//! Evaluator variants.
//!
//! | Variant | Path-dependent | Flags |
//! |---|---|---|
//! | [`const_evaluator::ConstEvaluator`] | no | none |
//! | [`g_evaluator::GEvaluator`] | yes | heuristic |
//! | [`weighted_evaluator::WeightedEvaluator`] | if its inner evaluator is | none |
//! | [`sum_evaluator::SumEvaluator`] | if any part is | none |
//! | [`pref_evaluator::PrefEvaluator`] | no | none |
//! | [`goal_count::GoalCountHeuristic`] | no | heuristic |

pub mod const_evaluator;
pub mod g_evaluator;
pub mod goal_count;
pub mod pref_evaluator;
pub mod sum_evaluator;
pub mod weighted_evaluator;
