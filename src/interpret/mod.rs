//! Solution interpretation.
//!
//! Reads a [`Solution`](crate::lp::Solution) back into domain terms:
//!
//! - [`kpi`]: derived metrics (cost, latency, utilization, headcount).
//! - [`paths`]: source-to-sink paths over the flow-carrying subgraph.
//! - [`diagnose`]: sentences explaining an infeasible witness.

pub mod diagnose;
pub mod kpi;
pub mod paths;

pub use diagnose::{describe, explain, explain_names, explain_tags};
pub use kpi::{EvacuationKpi, FlowKpi, MissionKpi, ProductionKpi, StaffingKpi};
pub use paths::{reconstruct_paths, FlowPath, PathStrategy, DEFAULT_PATH_LIMIT};
