//! MILP formulation and solution interpretation.
//!
//! Builds linear and mixed-integer models for five planning problems,
//! hands them to an optimizer behind the [`lp::Solver`] trait, and reads
//! the result back in domain terms: flows, timetables, rosters, KPIs,
//! flow paths, and plain-language explanations of infeasibility.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `FlowNetwork`, `Mission`, `MissionResource`,
//!   `StaffingCalendar`, `StaffingDemand`, `Candidate`, `Product`,
//!   `ProductionResource`, `ConstraintTag`,
//!   and the solution records `EdgeFlow`, `MissionSchedule`, `ShiftRoster`
//! - **`validation`**: Input integrity checks (duplicate IDs, unknown
//!   references, self-loops, negative quantities)
//! - **`lp`**: Modelling layer (`LpModel`, `LinearExpr`), solve driver and
//!   the `microlp` reference backend
//! - **`objective`**: Single- and multi-criterion objective composition
//! - **`builder`**: Routing, evacuation, mission, staffing and production-mix
//!   formulations
//! - **`interpret`**: KPIs, path reconstruction, infeasibility diagnosis
//!
//! # Quick start
//!
//! ```
//! use u_milp::builder::RoutingBuilder;
//! use u_milp::lp::{MicroLpSolver, SolveOptions};
//! use u_milp::models::{Edge, FlowNetwork, Node};
//!
//! let network = FlowNetwork::new()
//!     .with_node(Node::source("source", 0.0))
//!     .with_node(Node::intermediate("mid"))
//!     .with_node(Node::sink("sink"))
//!     .with_edge(Edge::new("source", "mid", 10.0).with_cost(2.0))
//!     .with_edge(Edge::new("mid", "sink", 5.0).with_cost(3.0));
//!
//! let plan = RoutingBuilder::new(&network, 5.0)
//!     .solve(&MicroLpSolver::new(), &SolveOptions::new())
//!     .unwrap();
//! assert_eq!(plan.paths[0].to_string(), "source → mid → sink | flow 5.00");
//! ```
//!
//! # References
//!
//! - Ahuja, Magnanti & Orlin (1993), "Network Flows: Theory, Algorithms, and Applications"
//! - Wolsey (1998), "Integer Programming"
//! - Chinneck (2008), "Feasibility and Infeasibility in Optimization"

pub mod builder;
pub mod error;
pub mod interpret;
pub mod lp;
pub mod models;
pub mod objective;
pub mod validation;

pub use error::{ModelError, SolverError};
pub use lp::{MicroLpSolver, Solution, SolveOptions, Solver, SolverStatus};
