//! Multi-source, multi-exit evacuation.
//!
//! Moves people from source zones to exits, trading the number evacuated
//! against the time the last exit is reached.
//!
//! # Formulation
//!
//! ```text
//! flow[e] ∈ ℤ, 0 ≤ flow[e] ≤ ⌊cap[e]⌋,  used[e] ∈ {0, 1}
//! t[k] ∈ ℤ≥0 per exit k,  t_max ∈ ℤ≥0
//!
//! source s:        Σ out − Σ in ≤ supply[s],  Σ out ≥ 1
//! intermediate:    Σ in = Σ out
//! flow[e] ≤ cap[e] · used[e]
//! t[k] ≥ time[e] · used[e]      for every edge e upstream of k
//! t_max ≥ t[k]
//! t_max ≤ max_time
//!
//! maximize  α · Σ flow into exits / Σ supply − (1 − α) · t_max
//! ```
//!
//! Exits carry no balance constraint. `t[k]` bounds the slowest single
//! opened edge upstream of `k`, not the length of a path.

use log::debug;
use petgraph::visit::{Bfs, Reversed};
use petgraph::Direction as EdgeDirection;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use super::{net_outflow, no_solution_message};
use crate::error::ModelError;
use crate::interpret::{diagnose, EvacuationKpi};
use crate::lp::{self, Direction, LinearExpr, LpModel, ModelStatistics, Relation, Solution, SolveOptions, Solver, SolverStatus, VarId, VarKind};
use crate::models::{ConstraintCategory, ConstraintTag, EdgeFlow, FlowNetwork, NodeRole};
use crate::objective::flow_versus_time;
use crate::validation::{validate_network, NetworkShape};

/// Evacuation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvacuationOptions {
    /// Upper bound on `t_max`.
    pub max_time: i64,
    /// Weight of evacuated flow against total time, in `[0, 1]`.
    pub alpha: f64,
}

impl Default for EvacuationOptions {
    fn default() -> Self {
        Self {
            max_time: 60,
            alpha: 0.7,
        }
    }
}

impl EvacuationOptions {
    /// Sets the time horizon.
    pub fn with_max_time(mut self, max_time: i64) -> Self {
        self.max_time = max_time;
        self
    }

    /// Sets the flow weight.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
}

/// Evacuation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvacuationPlan {
    pub status: SolverStatus,
    pub message: Option<String>,
    pub objective_value: Option<f64>,
    /// Per-edge flows in edge order.
    pub edges: Vec<EdgeFlow>,
    /// People reaching exits.
    pub total_flow: f64,
    /// Value of `t_max`.
    pub total_time: f64,
    /// Value of `t[k]` per exit.
    pub time_per_sink: BTreeMap<String, f64>,
    pub kpi: Option<EvacuationKpi>,
    pub statistics: ModelStatistics,
    pub solve_time: Duration,
    pub diagnostics: Vec<String>,
}

/// A built evacuation model and its variable handles.
#[derive(Debug, Clone)]
pub struct EvacuationModel {
    pub model: LpModel,
    pub flow: Vec<VarId>,
    pub used: Vec<VarId>,
    /// Arrival time per exit, in node order.
    pub arrival: Vec<(String, VarId)>,
    pub t_max: VarId,
}

impl EvacuationModel {
    /// Reads a solution of this model back into a plan.
    pub fn interpret(&self, network: &FlowNetwork, solution: &Solution) -> EvacuationPlan {
        let mut plan = EvacuationPlan {
            status: solution.status,
            message: no_solution_message(solution.status, "check exit capacities and the time horizon."),
            objective_value: solution.objective_value,
            edges: Vec::new(),
            total_flow: 0.0,
            total_time: 0.0,
            time_per_sink: BTreeMap::new(),
            kpi: None,
            statistics: self.model.statistics(),
            solve_time: solution.solve_time,
            diagnostics: diagnose::explain(&self.model, solution),
        };
        if !solution.has_assignment() {
            return plan;
        }

        let values: Vec<f64> = self.flow.iter().map(|&v| solution.value(v)).collect();
        plan.edges = network
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
        plan.time_per_sink = self
            .arrival
            .iter()
            .map(|(sink, var)| (sink.clone(), solution.value(*var)))
            .collect();
        plan.total_time = solution.value(self.t_max);

        let kpi = EvacuationKpi::calculate(network, &values);
        plan.total_flow = kpi.total_flow;
        plan.kpi = Some(kpi);
        plan
    }
}

/// Builds evacuation models.
pub struct EvacuationBuilder<'a> {
    network: &'a FlowNetwork,
    options: EvacuationOptions,
}

impl<'a> EvacuationBuilder<'a> {
    /// Creates a builder with default options.
    pub fn new(network: &'a FlowNetwork) -> Self {
        Self {
            network,
            options: EvacuationOptions::default(),
        }
    }

    /// Sets the options.
    pub fn with_options(mut self, options: EvacuationOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the model.
    pub fn build(&self) -> Result<EvacuationModel, ModelError> {
        validate_network(self.network, NetworkShape::MultiTerminal).map_err(ModelError::InvalidInput)?;
        if self.options.max_time < 0 {
            return Err(ModelError::InvalidParameter {
                name: "max_time",
                reason: format!("must be non-negative, got {}", self.options.max_time),
            });
        }

        let network = self.network;
        let mut model = LpModel::new("evacuation");

        let flow = network
            .edges
            .iter()
            .map(|e| model.declare_variable(VarKind::Integer, 0.0, e.capacity.floor(), format!("x_{}_{}", e.from, e.to)))
            .collect::<Result<Vec<_>, _>>()?;
        let used = network
            .edges
            .iter()
            .map(|e| model.declare_variable(VarKind::Binary, 0.0, 1.0, format!("y_{}_{}", e.from, e.to)))
            .collect::<Result<Vec<_>, _>>()?;
        let arrival = network
            .nodes_with_role(NodeRole::Sink)
            .map(|n| {
                model
                    .declare_variable(VarKind::Integer, 0.0, f64::INFINITY, format!("t_{}", n.id))
                    .map(|var| (n.id.clone(), var))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let t_max = model.declare_variable(VarKind::Integer, 0.0, f64::INFINITY, "t_max")?;

        for node in &network.nodes {
            match node.role {
                NodeRole::Source => {
                    model.add_linear_constraint(
                        net_outflow(network, &flow, &node.id),
                        Relation::Le,
                        node.supply,
                        ConstraintTag::single(ConstraintCategory::SourceSupply, &node.id),
                    )?;
                    model.add_linear_constraint(
                        LinearExpr::sum(network.outgoing(&node.id).into_iter().map(|i| flow[i])),
                        Relation::Ge,
                        1.0,
                        ConstraintTag::single(ConstraintCategory::SourceMinimum, &node.id),
                    )?;
                }
                NodeRole::Intermediate => {
                    model.add_linear_constraint(
                        net_outflow(network, &flow, &node.id),
                        Relation::Eq,
                        0.0,
                        ConstraintTag::single(ConstraintCategory::Conservation, &node.id),
                    )?;
                }
                NodeRole::Sink => {}
            }
        }

        for (i, e) in network.edges.iter().enumerate() {
            model.add_linear_constraint(
                LinearExpr::from(flow[i]).with_term(used[i], -e.capacity),
                Relation::Le,
                0.0,
                ConstraintTag::edge(ConstraintCategory::EdgeLink, &e.from, &e.to),
            )?;
        }

        for (sink, t_sink) in &arrival {
            for i in upstream_edges(network, sink) {
                let e = &network.edges[i];
                model.add_linear_constraint(
                    LinearExpr::from(*t_sink).with_term(used[i], -e.time),
                    Relation::Ge,
                    0.0,
                    ConstraintTag::new(
                        ConstraintCategory::ArrivalTime,
                        vec![sink.clone(), e.from.clone(), e.to.clone()],
                    ),
                )?;
            }
            model.add_linear_constraint(
                LinearExpr::from(t_max).with_term(*t_sink, -1.0),
                Relation::Ge,
                0.0,
                ConstraintTag::single(ConstraintCategory::HorizonLink, sink),
            )?;
        }

        model.add_linear_constraint(
            LinearExpr::from(t_max),
            Relation::Le,
            self.options.max_time as f64,
            ConstraintTag::bare(ConstraintCategory::Horizon),
        )?;

        let into_sinks = LinearExpr::sum(
            arrival
                .iter()
                .flat_map(|(sink, _)| network.incoming(sink))
                .map(|i| flow[i]),
        );
        let objective = flow_versus_time(into_sinks, network.total_supply(), t_max, self.options.alpha)?;
        model.set_objective(objective, Direction::Maximize)?;

        let stats = model.statistics();
        debug!(
            "evacuation model: {} exits, {} edges -> {} vars, {} constraints",
            arrival.len(),
            network.edges.len(),
            stats.num_variables,
            stats.num_constraints
        );

        Ok(EvacuationModel {
            model,
            flow,
            used,
            arrival,
            t_max,
        })
    }

    /// Builds, solves and interprets.
    pub fn solve<S: Solver + ?Sized>(&self, solver: &S, options: &SolveOptions) -> Result<EvacuationPlan, ModelError> {
        let built = self.build()?;
        let solution = lp::solve(&built.model, solver, options);
        Ok(built.interpret(self.network, &solution))
    }
}

/// Indices of edges from which `sink` is reachable, ascending.
///
/// Walks the reversed graph from the sink; every edge entering a visited
/// node lies upstream.
fn upstream_edges(network: &FlowNetwork, sink: &str) -> Vec<usize> {
    let (graph, index) = network.graph();
    let Some(&start) = index.get(sink) else {
        return Vec::new();
    };

    let reversed = Reversed(&graph);
    let mut bfs = Bfs::new(reversed, start);
    let mut edges = BTreeSet::new();
    while let Some(node) = bfs.next(reversed) {
        edges.extend(graph.edges_directed(node, EdgeDirection::Incoming).map(|e| *e.weight()));
    }
    edges.into_iter().collect()
}
