//! Linear / mixed-integer modelling layer.
//!
//! Model builders declare variables and tagged linear constraints on an
//! [`LpModel`], set an objective, and hand the finished model to a
//! [`Solver`]. [`solve`] drives a single solve and packages the result as
//! a [`Solution`] (status, values, objective, infeasible witness).
//!
//! # Design
//!
//! The optimizer is an external collaborator behind the [`Solver`] trait.
//! [`MicroLpSolver`] is a pure-Rust reference backend; wrappers for
//! commercial optimizers implement the same trait.

mod backend;
mod expr;
mod model;
mod solver;

pub use backend::MicroLpSolver;
pub use expr::{LinearExpr, VarId};
pub use model::{
    ConstraintId, Direction, LinearConstraint, LpModel, ModelStatistics, Objective, Relation,
    VarDecl, VarKind,
};
pub use solver::{
    solve, RawOutcome, Solution, SolveOptions, Solver, SolverStatus, ACTIVITY_EPSILON,
};
