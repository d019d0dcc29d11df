//! Solver interface, solve options and solutions.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::expr::VarId;
use super::model::{ConstraintId, LpModel};
use crate::error::SolverError;

/// Values at or below this are treated as zero when reporting activity.
///
/// Absorbs numeric noise from the continuous relaxation.
pub const ACTIVITY_EPSILON: f64 = 0.01;

/// Outcome status of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverStatus {
    /// Proven optimal solution found.
    Optimal,
    /// Feasible solution found, optimality not proven.
    Suboptimal,
    /// No feasible point exists.
    Infeasible,
    /// Time limit reached.
    TimeLimit,
    /// Objective is unbounded.
    Unbounded,
    /// Stopped through the interrupt flag.
    Interrupted,
    /// Numerical trouble inside the optimizer.
    Numeric,
    /// Anything else.
    Unknown,
}

impl SolverStatus {
    /// Lowercase status label.
    pub fn as_str(self) -> &'static str {
        match self {
            SolverStatus::Optimal => "optimal",
            SolverStatus::Suboptimal => "suboptimal",
            SolverStatus::Infeasible => "infeasible",
            SolverStatus::TimeLimit => "time_limit",
            SolverStatus::Unbounded => "unbounded",
            SolverStatus::Interrupted => "interrupted",
            SolverStatus::Numeric => "numeric",
            SolverStatus::Unknown => "unknown",
        }
    }

    /// Whether a solve ending in this status may carry a feasible
    /// assignment (an incumbent, for limit-based stops).
    pub fn admits_assignment(self) -> bool {
        matches!(
            self,
            SolverStatus::Optimal
                | SolverStatus::Suboptimal
                | SolverStatus::TimeLimit
                | SolverStatus::Interrupted
        )
    }
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-solve options.
///
/// The interrupt flag is shared with the caller: setting it asks the
/// optimizer to stop at its next opportunity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// Wall-clock limit for a single optimize call.
    pub time_limit: Option<Duration>,
    /// Let the optimizer print its own progress.
    pub verbose: bool,
    #[serde(skip)]
    pub interrupt: Option<Arc<AtomicBool>>,
}

impl SolveOptions {
    /// Default options: no time limit, quiet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Enables optimizer output.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Attaches an interrupt flag.
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// Whether the interrupt flag is raised.
    pub fn is_interrupted(&self) -> bool {
        self.interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// What an optimizer reports back for one optimize call.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOutcome {
    pub status: SolverStatus,
    /// Values indexed by variable; empty when there is no assignment.
    pub values: Vec<f64>,
    pub objective_value: Option<f64>,
}

impl RawOutcome {
    /// Outcome without an assignment.
    pub fn status_only(status: SolverStatus) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective_value: None,
        }
    }
}

/// The optimization engine.
///
/// Implementations wrap an external optimizer. They receive a finished
/// model and must not retain it between calls.
pub trait Solver {
    /// Backend name, for logging.
    fn name(&self) -> &str;

    /// Optimizes the model.
    ///
    /// Non-optimal outcomes are statuses, not errors. `Err` means the
    /// backend itself failed.
    fn optimize(&self, model: &LpModel, options: &SolveOptions) -> Result<RawOutcome, SolverError>;

    /// Computes an irreducible infeasible subset of the constraints.
    ///
    /// Only meaningful for infeasible models; may be unsupported or fail.
    fn compute_infeasible_subset(
        &self,
        _model: &LpModel,
        _options: &SolveOptions,
    ) -> Result<Vec<ConstraintId>, SolverError> {
        Err(SolverError::Unsupported)
    }
}

/// Result of one solve. Produced once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub status: SolverStatus,
    /// Values indexed by variable; empty unless the status admits an assignment.
    pub values: Vec<f64>,
    pub objective_value: Option<f64>,
    /// Infeasible-constraint witness; empty unless the status is infeasible
    /// and the subset could be computed.
    pub infeasible_subset: Vec<ConstraintId>,
    pub solve_time: Duration,
}

impl Solution {
    /// Whether variable values can be read.
    pub fn has_assignment(&self) -> bool {
        self.status.admits_assignment() && !self.values.is_empty()
    }

    /// Value of a variable (0 when there is no assignment).
    pub fn value(&self, var: VarId) -> f64 {
        self.values.get(var.index()).copied().unwrap_or(0.0)
    }

    /// Value above [`ACTIVITY_EPSILON`].
    pub fn is_active(&self, var: VarId) -> bool {
        self.value(var) > ACTIVITY_EPSILON
    }

    /// Binary reading of an indicator variable.
    pub fn is_set(&self, var: VarId) -> bool {
        self.value(var) > 0.5
    }
}

/// Runs one solve of `model` and packages the outcome.
///
/// When the model is infeasible the solver is asked for an infeasible
/// subset; a failure there is logged and leaves the witness empty.
pub fn solve<S: Solver + ?Sized>(model: &LpModel, solver: &S, options: &SolveOptions) -> Solution {
    let stats = model.statistics();
    debug!(
        "{}: solving `{}` ({} vars, {} binary, {} constraints)",
        solver.name(),
        model.name(),
        stats.num_variables,
        stats.num_binary_vars,
        stats.num_constraints
    );

    let start = Instant::now();
    let outcome = match solver.optimize(model, options) {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!("{}: optimize failed on `{}`: {err}", solver.name(), model.name());
            RawOutcome::status_only(SolverStatus::Unknown)
        }
    };
    let solve_time = start.elapsed();

    let infeasible_subset = if outcome.status == SolverStatus::Infeasible {
        match solver.compute_infeasible_subset(model, options) {
            Ok(subset) => subset,
            Err(err) => {
                warn!("{}: no infeasible subset for `{}`: {err}", solver.name(), model.name());
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    let values = if outcome.status.admits_assignment() {
        outcome.values
    } else {
        Vec::new()
    };

    info!(
        "{}: `{}` finished {} in {:?}",
        solver.name(),
        model.name(),
        outcome.status,
        solve_time
    );

    Solution {
        status: outcome.status,
        values,
        objective_value: outcome.objective_value,
        infeasible_subset,
        solve_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(RawOutcome);

    impl Solver for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn optimize(&self, _: &LpModel, _: &SolveOptions) -> Result<RawOutcome, SolverError> {
            Ok(self.0.clone())
        }
    }

    struct Broken;

    impl Solver for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn optimize(&self, _: &LpModel, _: &SolveOptions) -> Result<RawOutcome, SolverError> {
            Err(SolverError::Backend("license expired".into()))
        }
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(SolverStatus::TimeLimit.to_string(), "time_limit");
        assert!(SolverStatus::Suboptimal.admits_assignment());
        assert!(!SolverStatus::Infeasible.admits_assignment());
    }

    #[test]
    fn test_infeasible_with_unsupported_subset_degrades() {
        let model = LpModel::new("m");
        let solution = solve(&model, &Fixed(RawOutcome::status_only(SolverStatus::Infeasible)), &SolveOptions::new());
        assert_eq!(solution.status, SolverStatus::Infeasible);
        assert!(solution.infeasible_subset.is_empty());
        assert!(!solution.has_assignment());
    }

    #[test]
    fn test_backend_failure_becomes_status() {
        let model = LpModel::new("m");
        let solution = solve(&model, &Broken, &SolveOptions::new());
        assert_eq!(solution.status, SolverStatus::Unknown);
        assert!(solution.values.is_empty());
    }

    #[test]
    fn test_values_dropped_without_feasible_point() {
        let model = LpModel::new("m");
        let outcome = RawOutcome {
            status: SolverStatus::Unbounded,
            values: vec![1.0],
            objective_value: None,
        };
        let solution = solve(&model, &Fixed(outcome), &SolveOptions::new());
        assert!(solution.values.is_empty());
        assert_eq!(solution.value(VarId(0)), 0.0);
    }

    #[test]
    fn test_activity_threshold() {
        let solution = Solution {
            status: SolverStatus::TimeLimit,
            values: vec![0.005, 0.5, 1.0],
            objective_value: Some(1.0),
            infeasible_subset: Vec::new(),
            solve_time: Duration::ZERO,
        };
        assert!(solution.has_assignment());
        assert!(!solution.is_active(VarId(0)));
        assert!(solution.is_active(VarId(1)));
        assert!(!solution.is_set(VarId(1)));
        assert!(solution.is_set(VarId(2)));
    }

    #[test]
    fn test_interrupt_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let options = SolveOptions::new().with_interrupt(Arc::clone(&flag));
        assert!(!options.is_interrupted());
        flag.store(true, Ordering::Relaxed);
        assert!(options.is_interrupted());
    }
}
