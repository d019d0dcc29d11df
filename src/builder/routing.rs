//! Single-commodity network routing.
//!
//! Routes `demand` units from the unique source to the unique sink at
//! minimum cost, latency, or a weighted blend of both.
//!
//! # Formulation
//!
//! ```text
//! flow[e] ∈ [0, cap[e]],  used[e] ∈ {0, 1}
//! source:        Σ out − Σ in = demand
//! sink:          Σ in − Σ out = demand
//! intermediate:  Σ in = Σ out
//! flow[e] ≤ cap[e] · used[e]
//! flow[e] ≤ ρ · demand        (reliability, optional)
//! flow[e] ≤ β · cap[e]        (load balance, optional)
//! ```
//!
//! The reliability cap is a heuristic that pushes flow onto more than one
//! route. It does not guarantee disjoint paths.
//!
//! # Reference
//! Ahuja, Magnanti & Orlin (1993), "Network Flows", Ch. 9 (Minimum Cost Flows)

use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{net_outflow, no_solution_message};
use crate::error::ModelError;
use crate::interpret::{diagnose, reconstruct_paths, FlowKpi, FlowPath, PathStrategy, DEFAULT_PATH_LIMIT};
use crate::lp::{self, Direction, LinearExpr, LpModel, ModelStatistics, Relation, Solution, SolveOptions, Solver, SolverStatus, VarId, VarKind};
use crate::models::{ConstraintCategory, ConstraintTag, EdgeFlow, FlowNetwork, NodeRole};
use crate::objective::{linear_sum, WeightedObjective};
use crate::validation::{validate_network, NetworkShape};

/// Fraction of total demand a single edge may carry under the reliability policy.
pub const DEFAULT_RELIABILITY_FRACTION: f64 = 0.8;
/// Fraction of capacity an edge may use under the load-balancing policy.
pub const DEFAULT_BALANCE_FRACTION: f64 = 0.7;

/// What the routing minimizes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    /// Σ cost · flow.
    #[default]
    Cost,
    /// Σ latency · flow.
    Latency,
    /// Cost plus normalized latency.
    Weighted(WeightedObjective),
}

/// Routing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingOptions {
    pub objective: ObjectiveKind,
    /// Per-edge cap as a fraction of demand. `None` disables the policy.
    pub reliability: Option<f64>,
    /// Per-edge cap as a fraction of capacity. `None` disables the policy.
    pub balance: Option<f64>,
    pub path_strategy: PathStrategy,
    /// Maximum number of reported paths.
    pub path_limit: usize,
}

impl Default for RoutingOptions {
    fn default() -> Self {
        Self {
            objective: ObjectiveKind::Cost,
            reliability: None,
            balance: None,
            path_strategy: PathStrategy::DepthFirst,
            path_limit: DEFAULT_PATH_LIMIT,
        }
    }
}

impl RoutingOptions {
    /// Sets the objective.
    pub fn with_objective(mut self, objective: ObjectiveKind) -> Self {
        self.objective = objective;
        self
    }

    /// Enables the reliability cap at `fraction` of demand.
    pub fn with_reliability(mut self, fraction: f64) -> Self {
        self.reliability = Some(fraction);
        self
    }

    /// Enables the load-balancing cap at `fraction` of capacity.
    pub fn with_balance(mut self, fraction: f64) -> Self {
        self.balance = Some(fraction);
        self
    }

    /// Sets the path reconstruction strategy.
    pub fn with_path_strategy(mut self, strategy: PathStrategy) -> Self {
        self.path_strategy = strategy;
        self
    }

    /// Sets the number of reported paths.
    pub fn with_path_limit(mut self, limit: usize) -> Self {
        self.path_limit = limit;
        self
    }
}

fn check_fraction(name: &'static str, value: Option<f64>) -> Result<(), ModelError> {
    match value {
        Some(f) if !(f > 0.0 && f <= 1.0) => Err(ModelError::InvalidParameter {
            name,
            reason: format!("must lie in (0, 1], got {f}"),
        }),
        _ => Ok(()),
    }
}

/// Routing result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingPlan {
    pub status: SolverStatus,
    /// Set when there is no assignment.
    pub message: Option<String>,
    pub objective_value: Option<f64>,
    /// Per-edge flows in edge order; empty without an assignment.
    pub flows: Vec<EdgeFlow>,
    pub metrics: Option<FlowKpi>,
    /// Main paths, at most `path_limit`.
    pub paths: Vec<FlowPath>,
    pub statistics: ModelStatistics,
    pub solve_time: Duration,
    /// Explanations of an infeasible witness.
    pub diagnostics: Vec<String>,
}

/// A built routing model and its variable handles.
#[derive(Debug, Clone)]
pub struct RoutingModel {
    pub model: LpModel,
    /// Flow variable per edge.
    pub flow: Vec<VarId>,
    /// "Used" indicator per edge.
    pub used: Vec<VarId>,
    source: String,
    sink: String,
    demand: f64,
}

impl RoutingModel {
    /// Reads a solution of this model back into a plan.
    pub fn interpret(&self, network: &FlowNetwork, solution: &Solution, options: &RoutingOptions) -> RoutingPlan {
        let mut plan = RoutingPlan {
            status: solution.status,
            message: no_solution_message(solution.status, "check capacities and demand."),
            objective_value: solution.objective_value,
            flows: Vec::new(),
            metrics: None,
            paths: Vec::new(),
            statistics: self.model.statistics(),
            solve_time: solution.solve_time,
            diagnostics: diagnose::explain(&self.model, solution),
        };
        if !solution.has_assignment() {
            return plan;
        }

        let values: Vec<f64> = self.flow.iter().map(|&v| solution.value(v)).collect();
        plan.flows = network
            .edges
            .iter()
            .zip(&values)
            .zip(&self.used)
            .map(|((edge, &flow), &used)| EdgeFlow {
                from: edge.from.clone(),
                to: edge.to.clone(),
                flow,
                used: solution.is_set(used),
            })
            .collect();
        plan.metrics = Some(FlowKpi::calculate(network, &values, self.demand));
        plan.paths = reconstruct_paths(
            network,
            &values,
            &self.source,
            &self.sink,
            self.demand,
            options.path_strategy,
            options.path_limit,
        );
        plan
    }
}

/// Builds routing models.
///
/// # Example
/// ```
/// use u_milp::builder::RoutingBuilder;
/// use u_milp::lp::{MicroLpSolver, SolveOptions, SolverStatus};
/// use u_milp::models::FlowNetwork;
///
/// let network = FlowNetwork::numbered(3, &[(0, 1, 10.0, 2.0, 1.0), (1, 2, 5.0, 3.0, 1.0)]);
/// let plan = RoutingBuilder::new(&network, 5.0)
///     .solve(&MicroLpSolver::new(), &SolveOptions::new())
///     .unwrap();
/// assert_eq!(plan.status, SolverStatus::Optimal);
/// assert_eq!(plan.paths[0].to_string(), "0 → 1 → 2 | flow 5.00");
/// ```
pub struct RoutingBuilder<'a> {
    network: &'a FlowNetwork,
    demand: f64,
    options: RoutingOptions,
}

impl<'a> RoutingBuilder<'a> {
    /// Creates a builder routing `demand` units.
    pub fn new(network: &'a FlowNetwork, demand: f64) -> Self {
        Self {
            network,
            demand,
            options: RoutingOptions::default(),
        }
    }

    /// Sets the options.
    pub fn with_options(mut self, options: RoutingOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the model.
    pub fn build(&self) -> Result<RoutingModel, ModelError> {
        validate_network(self.network, NetworkShape::SingleCommodity).map_err(ModelError::InvalidInput)?;
        if !self.demand.is_finite() || self.demand < 0.0 {
            return Err(ModelError::InvalidParameter {
                name: "demand",
                reason: format!("must be finite and non-negative, got {}", self.demand),
            });
        }
        check_fraction("reliability", self.options.reliability)?;
        check_fraction("balance", self.options.balance)?;

        let network = self.network;
        let terminal = |role: NodeRole| {
            network
                .nodes_with_role(role)
                .next()
                .map(|n| n.id.clone())
                .unwrap_or_default()
        };
        let source = terminal(NodeRole::Source);
        let sink = terminal(NodeRole::Sink);

        let mut model = LpModel::new("network_routing");
        let flow = network
            .edges
            .iter()
            .map(|e| model.declare_variable(VarKind::Continuous, 0.0, e.capacity, format!("flow_{}_{}", e.from, e.to)))
            .collect::<Result<Vec<_>, _>>()?;
        let used = network
            .edges
            .iter()
            .map(|e| model.declare_variable(VarKind::Binary, 0.0, 1.0, format!("used_{}_{}", e.from, e.to)))
            .collect::<Result<Vec<_>, _>>()?;

        for node in &network.nodes {
            let net = net_outflow(network, &flow, &node.id);
            match node.role {
                NodeRole::Source => model.add_linear_constraint(
                    net,
                    Relation::Eq,
                    self.demand,
                    ConstraintTag::single(ConstraintCategory::SourceBalance, &node.id),
                )?,
                NodeRole::Sink => model.add_linear_constraint(
                    -net,
                    Relation::Eq,
                    self.demand,
                    ConstraintTag::single(ConstraintCategory::SinkBalance, &node.id),
                )?,
                NodeRole::Intermediate => model.add_linear_constraint(
                    net,
                    Relation::Eq,
                    0.0,
                    ConstraintTag::single(ConstraintCategory::FlowBalance, &node.id),
                )?,
            };
        }

        for (i, e) in network.edges.iter().enumerate() {
            model.add_linear_constraint(
                LinearExpr::from(flow[i]).with_term(used[i], -e.capacity),
                Relation::Le,
                0.0,
                ConstraintTag::edge(ConstraintCategory::LinkActivation, &e.from, &e.to),
            )?;
        }

        if let Some(fraction) = self.options.reliability {
            for (i, e) in network.edges.iter().enumerate() {
                model.add_linear_constraint(
                    LinearExpr::from(flow[i]),
                    Relation::Le,
                    fraction * self.demand,
                    ConstraintTag::edge(ConstraintCategory::Reliability, &e.from, &e.to),
                )?;
            }
        }

        if let Some(fraction) = self.options.balance {
            for (i, e) in network.edges.iter().enumerate() {
                model.add_linear_constraint(
                    LinearExpr::from(flow[i]),
                    Relation::Le,
                    fraction * e.capacity,
                    ConstraintTag::edge(ConstraintCategory::LoadBalance, &e.from, &e.to),
                )?;
            }
        }

        let cost = linear_sum(flow.iter().zip(&network.edges).map(|(&v, e)| (v, e.cost)));
        let latency = linear_sum(flow.iter().zip(&network.edges).map(|(&v, e)| (v, e.time)));
        let objective = match self.options.objective {
            ObjectiveKind::Cost => cost,
            ObjectiveKind::Latency => latency,
            ObjectiveKind::Weighted(weights) => weights.compose(cost, latency)?,
        };
        model.set_objective(objective, Direction::Minimize)?;

        let stats = model.statistics();
        debug!(
            "routing model: {} nodes, {} edges -> {} vars, {} constraints",
            network.nodes.len(),
            network.edges.len(),
            stats.num_variables,
            stats.num_constraints
        );

        Ok(RoutingModel {
            model,
            flow,
            used,
            source,
            sink,
            demand: self.demand,
        })
    }

    /// Builds, solves and interprets.
    pub fn solve<S: Solver + ?Sized>(&self, solver: &S, options: &SolveOptions) -> Result<RoutingPlan, ModelError> {
        let built = self.build()?;
        let solution = lp::solve(&built.model, solver, options);
        Ok(built.interpret(self.network, &solution, &self.options))
    }
}
