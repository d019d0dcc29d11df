//! Model builders.
//!
//! Each builder translates domain data into an [`LpModel`]: typed
//! variables, tagged linear constraints and an objective. The builder is
//! used in three steps:
//!
//! 1. `build()` validates the input and returns the model together with
//!    handles to its variables. Malformed input fails here, before any
//!    solver call.
//! 2. [`solve`](crate::lp::solve) runs the model on a [`Solver`](crate::lp::Solver).
//! 3. `interpret()` turns the solution into a domain plan. A plan always
//!    carries a status; assignment-derived fields are empty or `None`
//!    when the status admits no feasible point.
//!
//! `solve()` on each builder chains the three.
//!
//! | Builder | Variables | Objective |
//! |---------|-----------|-----------|
//! | [`RoutingBuilder`] | flow (continuous), used (binary) per edge | min cost / latency / weighted |
//! | [`EvacuationBuilder`] | flow (integer), used (binary) per edge; t per sink; t_max | max flow vs. time |
//! | [`MissionBuilder`] | start indicator per (mission, instant) | max priority |
//! | [`StaffingBuilder`] | hire per candidate; assign per (candidate, day, shift) | min hire cost |
//! | [`ProductionBuilder`] | quantity (continuous) per product | max profit |
//!
//! [`LpModel`]: crate::lp::LpModel

mod evacuation;
mod mission;
mod production;
mod routing;
mod staffing;

pub use evacuation::{EvacuationBuilder, EvacuationModel, EvacuationOptions, EvacuationPlan};
pub use mission::{MissionBuilder, MissionModel, MissionPlan};
pub use production::{ProductionBuilder, ProductionModel, ProductionPlan};
pub use routing::{ObjectiveKind, RoutingBuilder, RoutingModel, RoutingOptions, RoutingPlan};
pub use staffing::{StaffingBuilder, StaffingModel, StaffingPlan, StaffingRules};

use crate::lp::{LinearExpr, SolverStatus, VarId};
use crate::models::FlowNetwork;

/// `outflow - inflow` at `node`, over per-edge flow variables.
fn net_outflow(network: &FlowNetwork, flow: &[VarId], node: &str) -> LinearExpr {
    let mut expr = LinearExpr::new();
    for i in network.outgoing(node) {
        expr.add_term(flow[i], 1.0);
    }
    for i in network.incoming(node) {
        expr.add_term(flow[i], -1.0);
    }
    expr
}

/// Message for a plan without an assignment.
fn no_solution_message(status: SolverStatus, hint: &str) -> Option<String> {
    if status.admits_assignment() {
        return None;
    }
    Some(match status {
        SolverStatus::Infeasible => format!("No feasible solution: {hint}"),
        other => format!("No solution available (solver status: {other})."),
    })
}
