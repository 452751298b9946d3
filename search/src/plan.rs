//! Plans and plan files.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use waypoint_kernel::cost::OperatorCost;
use waypoint_kernel::state::OperatorId;
use waypoint_kernel::task::Task;

use crate::error::SearchError;

/// Operators applied in order from the initial state.
pub type Plan = Vec<OperatorId>;

/// Sum of the original operator costs along `plan`.
#[must_use]
pub fn calculate_plan_cost(plan: &[OperatorId], task: &Task) -> i32 {
    plan.iter().fold(0_i32, |cost, &op| {
        cost.saturating_add(task.operator_cost(op, OperatorCost::Normal))
    })
}

/// Plan file contents: one `(operator name)` line per step, then a cost
/// comment.
#[must_use]
pub fn render_plan(plan: &[OperatorId], task: &Task) -> String {
    let mut out = String::new();
    for &op in plan {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "({})", task.operator(op).name);
    }
    let cost_kind = if task.is_unit_cost() {
        "unit cost"
    } else {
        "general cost"
    };
    let _ = writeln!(
        out,
        "; cost = {} ({cost_kind})",
        calculate_plan_cost(plan, task)
    );
    out
}

/// Writes found plans to disk.
///
/// With `generates_multiple_plan_files`, successive plans go to
/// `<filename>.1`, `<filename>.2`, and so on.
#[derive(Debug, Clone)]
pub struct PlanManager {
    plan_filename: PathBuf,
    num_previously_generated_plans: usize,
}

impl Default for PlanManager {
    fn default() -> Self {
        Self {
            plan_filename: PathBuf::from("sas_plan"),
            num_previously_generated_plans: 0,
        }
    }
}

impl PlanManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_plan_filename(&mut self, plan_filename: impl Into<PathBuf>) {
        self.plan_filename = plan_filename.into();
    }

    #[must_use]
    pub fn plan_filename(&self) -> &Path {
        &self.plan_filename
    }

    #[must_use]
    pub fn num_previously_generated_plans(&self) -> usize {
        self.num_previously_generated_plans
    }

    /// Write `plan` and return the path it was written to.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::PlanWrite`] if the file cannot be written.
    pub fn save_plan(
        &mut self,
        plan: &[OperatorId],
        task: &Task,
        generates_multiple_plan_files: bool,
    ) -> Result<PathBuf, SearchError> {
        let path = if generates_multiple_plan_files {
            let mut name = self.plan_filename.clone().into_os_string();
            name.push(format!(".{}", self.num_previously_generated_plans + 1));
            PathBuf::from(name)
        } else {
            self.plan_filename.clone()
        };

        std::fs::write(&path, render_plan(plan, task)).map_err(|source| SearchError::PlanWrite {
            path: path.clone(),
            source,
        })?;

        tracing::info!(
            "Plan length: {} step(s). Plan cost: {}",
            plan.len(),
            calculate_plan_cost(plan, task)
        );
        self.num_previously_generated_plans += 1;
        Ok(path)
    }
}
