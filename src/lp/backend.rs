//! Reference backend on the pure-Rust `microlp` simplex / branch-and-bound.
//!
//! `microlp` has no time limit, no interrupt hook and no infeasibility
//! analysis. This adapter adds them from the outside:
//!
//! - each optimize call runs on a worker thread; the caller waits with a
//!   deadline and polls the interrupt flag, answering `TimeLimit` or
//!   `Interrupted` (without incumbent) when either fires. The abandoned
//!   worker finishes in the background and its result is dropped.
//! - infeasible subsets come from QuickXplain (Junker 2004): the
//!   constraint list is bisected, and each half is kept only when the
//!   other half plus what was already kept is still feasible. A conflict
//!   of `k` rows among `n` costs about `2k·log2(n/k)` re-solves instead of
//!   the `n` of a one-by-one deletion filter. Every re-solve counts
//!   against `max_iis_solves`.
//! - when the LP relaxation is already infeasible the search runs on the
//!   relaxation, which needs no branch-and-bound. The subset is then
//!   irreducible for the relaxation; for the integer model it is an
//!   infeasible witness that may contain a redundant row.
//!
//! The worker thread cannot be cancelled: `microlp` exposes no hook
//! between branch-and-bound steps. After `TimeLimit` or `Interrupted` the
//! abandoned solve keeps one core busy until it finishes on its own.
//!
//! # Reference
//! Junker (2004), "QuickXplain: Preferred Explanations and Relaxations for
//! Over-Constrained Problems", AAAI

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use super::model::{ConstraintId, Direction, LpModel, Relation, VarKind};
use super::solver::{RawOutcome, SolveOptions, Solver, SolverStatus};
use crate::error::SolverError;

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const FEASIBILITY_TOLERANCE: f64 = 1e-9;

/// `microlp`-backed solver.
///
/// A solve stopped by the time limit or the interrupt flag returns at once,
/// but its worker thread runs to completion in the background.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct MicroLpSolver {
    /// Upper bound on re-solves spent computing one infeasible subset.
    pub max_iis_solves: usize,
}

impl Default for MicroLpSolver {
    fn default() -> Self {
        Self {
            max_iis_solves: 500,
        }
    }
}

/// A model lowered to `microlp`, or the verdict that it is trivially
/// infeasible (a term-less constraint such as `0 >= 1`).
enum Lowered {
    Problem(microlp::Problem, Vec<microlp::Variable>),
    Infeasible,
}

type RunResult = Result<(Vec<f64>, f64), microlp::Error>;

impl MicroLpSolver {
    /// Creates a solver with the default re-solve budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the infeasible-subset re-solve budget.
    pub fn with_max_iis_solves(mut self, max: usize) -> Self {
        self.max_iis_solves = max;
        self
    }

    /// Lowers the enabled rows; `relaxed` drops integrality.
    fn lower(model: &LpModel, enabled: &[bool], relaxed: bool) -> Lowered {
        let direction = match model.objective().direction {
            Direction::Minimize => microlp::OptimizationDirection::Minimize,
            Direction::Maximize => microlp::OptimizationDirection::Maximize,
        };
        let mut problem = microlp::Problem::new(direction);

        let mut obj_coeffs = vec![0.0; model.variables().len()];
        for (var, coeff) in model.objective().expr.compact() {
            obj_coeffs[var.index()] = coeff;
        }

        let vars: Vec<microlp::Variable> = model
            .variables()
            .iter()
            .zip(&obj_coeffs)
            .map(|(decl, &coeff)| match decl.kind {
                VarKind::Continuous => problem.add_var(coeff, (decl.lower, decl.upper)),
                _ if relaxed => problem.add_var(coeff, (decl.lower, decl.upper)),
                VarKind::Binary if decl.lower == 0.0 && decl.upper == 1.0 => problem.add_binary_var(coeff),
                VarKind::Binary | VarKind::Integer => {
                    // `as` saturates, so infinite bounds land on i32::MIN/MAX.
                    problem.add_integer_var(coeff, (decl.lower.ceil() as i32, decl.upper.floor() as i32))
                }
            })
            .collect();

        for (constraint, _) in model
            .constraints()
            .iter()
            .zip(enabled)
            .filter(|(_, &on)| on)
        {
            let terms = constraint.expr.compact();
            if terms.is_empty() {
                if constraint.relation.holds(0.0, constraint.rhs, FEASIBILITY_TOLERANCE) {
                    continue;
                }
                trace!("`{}` is violated with no terms", constraint.name());
                return Lowered::Infeasible;
            }
            let op = match constraint.relation {
                Relation::Le => microlp::ComparisonOp::Le,
                Relation::Ge => microlp::ComparisonOp::Ge,
                Relation::Eq => microlp::ComparisonOp::Eq,
            };
            let lhs: Vec<(microlp::Variable, f64)> = terms
                .into_iter()
                .map(|(var, coeff)| (vars[var.index()], coeff))
                .collect();
            problem.add_constraint(lhs, op, constraint.rhs);
        }

        Lowered::Problem(problem, vars)
    }

    /// Solves on a worker thread, waiting until `deadline` at most.
    fn run(
        model: &LpModel,
        enabled: &[bool],
        relaxed: bool,
        deadline: Option<Instant>,
        options: &SolveOptions,
    ) -> Result<RawOutcome, SolverError> {
        let (problem, vars) = match Self::lower(model, enabled, relaxed) {
            Lowered::Problem(problem, vars) => (problem, vars),
            Lowered::Infeasible => return Ok(RawOutcome::status_only(SolverStatus::Infeasible)),
        };

        let (tx, rx) = mpsc::channel::<RunResult>();
        thread::Builder::new()
            .name("microlp-solve".into())
            .spawn(move || {
                let result = problem
                    .solve()
                    .map(|solution| (vars.iter().map(|&v| solution[v]).collect(), solution.objective()));
                // The receiver is gone when the caller stopped waiting.
                let _ = tx.send(result);
            })
            .map_err(|e| SolverError::Backend(format!("cannot spawn solver thread: {e}")))?;

        loop {
            let wait = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()).min(POLL_INTERVAL),
                None => POLL_INTERVAL,
            };
            match rx.recv_timeout(wait) {
                Ok(result) => return Ok(Self::classify(model, result)),
                Err(RecvTimeoutError::Timeout) => {
                    if options.is_interrupted() {
                        return Ok(RawOutcome::status_only(SolverStatus::Interrupted));
                    }
                    if deadline.is_some_and(|d| Instant::now() >= d) {
                        return Ok(RawOutcome::status_only(SolverStatus::TimeLimit));
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(SolverError::Backend("solver thread terminated without a result".into()));
                }
            }
        }
    }

    fn classify(model: &LpModel, result: RunResult) -> RawOutcome {
        match result {
            Ok((values, objective)) => {
                let values = values
                    .into_iter()
                    .zip(model.variables())
                    .map(|(value, decl)| match decl.kind {
                        VarKind::Continuous => value,
                        VarKind::Binary | VarKind::Integer => value.round(),
                    })
                    .collect();
                RawOutcome {
                    status: SolverStatus::Optimal,
                    values,
                    objective_value: Some(objective),
                }
            }
            Err(microlp::Error::Infeasible) => RawOutcome::status_only(SolverStatus::Infeasible),
            Err(microlp::Error::Unbounded) => RawOutcome::status_only(SolverStatus::Unbounded),
            Err(microlp::Error::InternalError(msg)) => {
                warn!("microlp internal error on `{}`: {msg}", model.name());
                RawOutcome::status_only(SolverStatus::Numeric)
            }
        }
    }

    fn deadline(options: &SolveOptions) -> Option<Instant> {
        options.time_limit.map(|limit| Instant::now() + limit)
    }
}

impl Solver for MicroLpSolver {
    fn name(&self) -> &str {
        "microlp"
    }

    fn optimize(&self, model: &LpModel, options: &SolveOptions) -> Result<RawOutcome, SolverError> {
        if options.verbose {
            warn!("microlp has no progress output; `verbose` is ignored");
        }
        let enabled = vec![true; model.constraints().len()];
        Self::run(model, &enabled, false, Self::deadline(options), options)
    }

    fn compute_infeasible_subset(
        &self,
        model: &LpModel,
        options: &SolveOptions,
    ) -> Result<Vec<ConstraintId>, SolverError> {
        let mut oracle = Oracle {
            model,
            options,
            deadline: Self::deadline(options),
            budget: self.max_iis_solves,
            solves: 0,
            relaxed: true,
        };

        let all: Vec<usize> = (0..model.constraints().len()).collect();
        if !oracle.infeasible(&all)? {
            let integral = model.variables().iter().any(|v| v.kind != VarKind::Continuous);
            if !integral {
                return Err(SolverError::NotInfeasible);
            }
            oracle.relaxed = false;
            if !oracle.infeasible(&all)? {
                return Err(SolverError::NotInfeasible);
            }
        }

        let subset = if all.is_empty() {
            Vec::new()
        } else {
            oracle.explain(&mut Vec::new(), false, &all)?
        };
        debug!(
            "infeasible subset of `{}`: {} of {} constraints, {} re-solves ({})",
            model.name(),
            subset.len(),
            all.len(),
            oracle.solves,
            if oracle.relaxed { "relaxation" } else { "integer model" }
        );
        Ok(subset.into_iter().map(ConstraintId).collect())
    }
}

/// Feasibility checks over row subsets, sharing one deadline and budget.
struct Oracle<'a> {
    model: &'a LpModel,
    options: &'a SolveOptions,
    deadline: Option<Instant>,
    budget: usize,
    solves: usize,
    relaxed: bool,
}

impl Oracle<'_> {
    /// Whether the rows in `active` alone admit no solution.
    fn infeasible(&mut self, active: &[usize]) -> Result<bool, SolverError> {
        self.solves += 1;
        if self.solves > self.budget {
            return Err(SolverError::BudgetExceeded(self.budget));
        }
        let mut enabled = vec![false; self.model.constraints().len()];
        for &i in active {
            enabled[i] = true;
        }
        let outcome = MicroLpSolver::run(self.model, &enabled, self.relaxed, self.deadline, self.options)?;
        trace!("{} of {} rows: {}", active.len(), enabled.len(), outcome.status);
        match outcome.status {
            SolverStatus::Infeasible => Ok(true),
            SolverStatus::Optimal | SolverStatus::Suboptimal | SolverStatus::Unbounded => Ok(false),
            SolverStatus::TimeLimit => Err(SolverError::Aborted("time limit reached")),
            SolverStatus::Interrupted => Err(SolverError::Aborted("interrupted")),
            SolverStatus::Numeric | SolverStatus::Unknown => {
                Err(SolverError::Backend("re-solve ended without a verdict".into()))
            }
        }
    }

    /// Minimal subset of `candidates` that is infeasible together with
    /// `background`, in ascending order.
    ///
    /// `added` tells whether `background` grew since the caller last
    /// checked it. `background` is restored before returning.
    fn explain(&mut self, background: &mut Vec<usize>, added: bool, candidates: &[usize]) -> Result<Vec<usize>, SolverError> {
        if added && self.infeasible(background)? {
            return Ok(Vec::new());
        }
        if candidates.len() == 1 {
            return Ok(candidates.to_vec());
        }

        let (left, right) = candidates.split_at(candidates.len() / 2);
        let base = background.len();

        background.extend_from_slice(left);
        let right_part = self.explain(background, true, right)?;
        background.truncate(base);

        background.extend_from_slice(&right_part);
        let left_part = self.explain(background, !right_part.is_empty(), left)?;
        background.truncate(base);

        let mut found = left_part;
        found.extend(right_part);
        Ok(found)
    }
}
