//! Solution metrics (KPIs).
//!
//! Computes performance indicators from a feasible assignment. Every
//! calculation also accepts a non-optimal incumbent. Ratios whose
//! denominator is zero are defined as 0.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total cost | Σ flow · cost |
//! | Avg latency | Σ flow · latency / Σ flow, over active edges |
//! | Active links | Edges with flow above the activity epsilon |
//! | Avg utilization | Σ flow / Σ capacity |
//! | Demand satisfied | Net inflow at the sink / demand |
//! | Evacuated | Flow into sinks / total occupants |
//! | Resource utilization | Σ usage / Σ availability over the horizon |
//! | Headcount by skill | Hired candidates per qualification |
//! | Resource usage | Σ need · quantity per production resource |
//!
//! # Reference
//! Ahuja, Magnanti & Orlin (1993), "Network Flows", Ch. 1.2

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::lp::ACTIVITY_EPSILON;
use crate::models::{
    Candidate, FlowNetwork, Mission, MissionResource, MissionSchedule, NodeRole, Product, ProductionResource,
    ShiftRoster, StaffingCalendar, StaffingDemand,
};

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

/// Routing indicators.
///
/// `flows` is indexed like [`FlowNetwork::edges`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowKpi {
    /// Σ flow · cost.
    pub total_cost: f64,
    /// Flow-weighted latency over active edges.
    pub avg_latency: f64,
    /// Number of edges carrying flow.
    pub active_links: usize,
    /// Σ flow over all edges.
    pub total_flow: f64,
    /// Total flow over total capacity (0.0..1.0).
    pub avg_utilization: f64,
    /// Σ capacity.
    pub total_capacity: f64,
    /// Σ flow, i.e. capacity in use.
    pub total_capacity_used: f64,
    /// Net inflow at sinks as a percentage of demand.
    pub demand_satisfied_pct: f64,
}

impl FlowKpi {
    /// Computes routing KPIs.
    pub fn calculate(network: &FlowNetwork, flows: &[f64], demand: f64) -> Self {
        let mut total_cost = 0.0;
        let mut weighted_latency = 0.0;
        let mut active_flow = 0.0;
        let mut active_links = 0;

        for (edge, &flow) in network.edges.iter().zip(flows) {
            total_cost += flow * edge.cost;
            if flow > ACTIVITY_EPSILON {
                active_links += 1;
                active_flow += flow;
                weighted_latency += flow * edge.time;
            }
        }

        let total_flow: f64 = flows.iter().sum();
        let total_capacity = network.total_capacity();

        let delivered: f64 = network
            .edges
            .iter()
            .zip(flows)
            .map(|(edge, &flow)| {
                let into = network.node(&edge.to).is_some_and(|n| n.role == NodeRole::Sink);
                let out_of = network.node(&edge.from).is_some_and(|n| n.role == NodeRole::Sink);
                match (into, out_of) {
                    (true, false) => flow,
                    (false, true) => -flow,
                    _ => 0.0,
                }
            })
            .sum();

        Self {
            total_cost,
            avg_latency: ratio(weighted_latency, active_flow),
            active_links,
            total_flow,
            avg_utilization: ratio(total_flow, total_capacity),
            total_capacity,
            total_capacity_used: total_flow,
            demand_satisfied_pct: ratio(delivered, demand) * 100.0,
        }
    }
}

/// Evacuation indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvacuationKpi {
    /// Flow into sinks.
    pub total_flow: f64,
    /// Outflow per source.
    pub evacuated_per_source: BTreeMap<String, f64>,
    /// Inflow per sink.
    pub received_per_sink: BTreeMap<String, f64>,
    /// Σ source supply.
    pub total_people: f64,
    /// Flow into sinks as a percentage of total people.
    pub percentage: f64,
}

impl EvacuationKpi {
    /// Computes evacuation KPIs.
    pub fn calculate(network: &FlowNetwork, flows: &[f64]) -> Self {
        let sum_over = |indices: Vec<usize>| -> f64 {
            indices
                .into_iter()
                .map(|i| flows.get(i).copied().unwrap_or(0.0))
                .sum()
        };

        let evacuated_per_source: BTreeMap<String, f64> = network
            .nodes_with_role(NodeRole::Source)
            .map(|n| (n.id.clone(), sum_over(network.outgoing(&n.id))))
            .collect();
        let received_per_sink: BTreeMap<String, f64> = network
            .nodes_with_role(NodeRole::Sink)
            .map(|n| (n.id.clone(), sum_over(network.incoming(&n.id))))
            .collect();

        let total_flow: f64 = received_per_sink.values().sum();
        let total_people = network.total_supply();

        Self {
            total_flow,
            evacuated_per_source,
            received_per_sink,
            total_people,
            percentage: ratio(total_flow, total_people) * 100.0,
        }
    }
}

/// Mission timetable indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionKpi {
    /// Missions that received a start.
    pub scheduled: usize,
    /// Number of missions.
    pub total: usize,
    /// Σ priority of scheduled missions.
    pub total_priority: f64,
    /// Highest per-instant draw, per resource.
    pub peak_usage: BTreeMap<String, i64>,
    /// Σ usage / Σ availability over the horizon, per resource.
    pub utilization_by_resource: BTreeMap<String, f64>,
    /// Mean of the per-resource utilizations.
    pub avg_utilization: f64,
}

impl MissionKpi {
    /// Computes timetable KPIs.
    pub fn calculate(schedule: &MissionSchedule, missions: &[Mission], resources: &[MissionResource]) -> Self {
        let total_priority: f64 = missions
            .iter()
            .filter(|m| schedule.start_of(&m.id).is_some())
            .map(|m| m.priority)
            .sum();

        let mut peak_usage = BTreeMap::new();
        let mut utilization_by_resource = BTreeMap::new();
        for resource in resources {
            let mut used = 0i64;
            let mut available = 0i64;
            let mut peak = 0i64;
            for t in 0..schedule.horizon {
                let u = schedule.usage_at(&resource.id, t);
                used += u;
                peak = peak.max(u);
                available += resource.available_at(t).max(0);
            }
            peak_usage.insert(resource.id.clone(), peak);
            utilization_by_resource.insert(resource.id.clone(), ratio(used as f64, available as f64));
        }

        let avg_utilization = ratio(
            utilization_by_resource.values().sum(),
            utilization_by_resource.len() as f64,
        );

        Self {
            scheduled: schedule.scheduled_count(),
            total: missions.len(),
            total_priority,
            peak_usage,
            utilization_by_resource,
            avg_utilization,
        }
    }
}

/// Staffing indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingKpi {
    /// Number of hired candidates.
    pub hired: usize,
    /// Σ hire cost of hired candidates.
    pub hire_cost: f64,
    /// Σ per-shift cost of worked shifts.
    pub shift_cost: f64,
    /// Hired candidates per qualification.
    pub headcount_by_skill: BTreeMap<String, usize>,
    /// Worked shifts per hired candidate.
    pub shifts_by_candidate: BTreeMap<String, usize>,
    /// Share of positive-demand slots whose demand is met, as a percentage.
    pub demand_met_pct: f64,
}

impl StaffingKpi {
    /// Computes staffing KPIs.
    pub fn calculate(
        calendar: &StaffingCalendar,
        demand: &StaffingDemand,
        candidates: &[Candidate],
        hired: &[String],
        roster: &ShiftRoster,
    ) -> Self {
        let hired_candidates: Vec<&Candidate> = candidates
            .iter()
            .filter(|c| hired.contains(&c.id))
            .collect();

        let mut headcount_by_skill: BTreeMap<String, usize> =
            calendar.skills.iter().map(|k| (k.clone(), 0)).collect();
        for c in &hired_candidates {
            for skill in &c.qualifications {
                *headcount_by_skill.entry(skill.clone()).or_insert(0) += 1;
            }
        }

        let shift_cost: f64 = roster
            .assignments
            .iter()
            .filter_map(|a| {
                candidates
                    .iter()
                    .find(|c| c.id == a.candidate_id)
                    .map(|c| c.shift_cost(&a.shift))
            })
            .sum();

        let positive: Vec<_> = demand.entries.iter().filter(|e| e.required > 0).collect();
        let met = positive
            .iter()
            .filter(|e| {
                let staffed = roster
                    .staffed(&e.day, &e.shift)
                    .into_iter()
                    .filter(|id| {
                        candidates
                            .iter()
                            .any(|c| c.id == *id && c.is_qualified(&e.skill))
                    })
                    .count();
                staffed >= e.required as usize
            })
            .count();

        Self {
            hired: hired_candidates.len(),
            hire_cost: hired_candidates.iter().map(|c| c.hire_cost).sum(),
            shift_cost,
            headcount_by_skill,
            shifts_by_candidate: hired_candidates
                .iter()
                .map(|c| (c.id.clone(), roster.shift_count(&c.id)))
                .collect(),
            demand_met_pct: if positive.is_empty() {
                100.0
            } else {
                met as f64 / positive.len() as f64 * 100.0
            },
        }
    }
}

/// Production mix indicators.
///
/// `quantities` is indexed like the product slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionKpi {
    /// Σ profit · quantity.
    pub total_profit: f64,
    /// Products made in a quantity above the activity epsilon.
    pub products_made: usize,
    /// Σ need · quantity, per resource.
    pub usage_by_resource: BTreeMap<String, f64>,
    /// Usage over availability, per resource.
    pub utilization_by_resource: BTreeMap<String, f64>,
    /// Resources used up to within the activity epsilon, in input order.
    pub binding_resources: Vec<String>,
}

impl ProductionKpi {
    /// Computes production KPIs.
    pub fn calculate(products: &[Product], resources: &[ProductionResource], quantities: &[f64]) -> Self {
        let mut usage_by_resource = BTreeMap::new();
        let mut utilization_by_resource = BTreeMap::new();
        let mut binding_resources = Vec::new();
        for r in resources {
            let used: f64 = products
                .iter()
                .zip(quantities)
                .map(|(p, &q)| p.need(&r.id) * q)
                .sum();
            if used > 0.0 && r.available - used <= ACTIVITY_EPSILON {
                binding_resources.push(r.id.clone());
            }
            usage_by_resource.insert(r.id.clone(), used);
            utilization_by_resource.insert(r.id.clone(), ratio(used, r.available));
        }

        Self {
            total_profit: products.iter().zip(quantities).map(|(p, &q)| p.profit * q).sum(),
            products_made: quantities.iter().filter(|&&q| q > ACTIVITY_EPSILON).count(),
            usage_by_resource,
            utilization_by_resource,
            binding_resources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Edge, Node};

    fn line() -> FlowNetwork {
        FlowNetwork::new()
            .with_node(Node::source("source", 0.0))
            .with_node(Node::intermediate("mid"))
            .with_node(Node::sink("sink"))
            .with_edge(Edge::new("source", "mid", 10.0).with_cost(2.0).with_time(4.0))
            .with_edge(Edge::new("mid", "sink", 5.0).with_cost(3.0).with_time(6.0))
    }

    #[test]
    fn test_flow_kpi() {
        let kpi = FlowKpi::calculate(&line(), &[5.0, 5.0], 5.0);
        assert!((kpi.total_cost - 25.0).abs() < 1e-9);
        assert!((kpi.avg_latency - 5.0).abs() < 1e-9);
        assert_eq!(kpi.active_links, 2);
        assert!((kpi.total_flow - 10.0).abs() < 1e-9);
        assert!((kpi.avg_utilization - 10.0 / 15.0).abs() < 1e-9);
        assert!((kpi.demand_satisfied_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_flow_and_capacity_are_zero_not_nan() {
        let kpi = FlowKpi::calculate(&line(), &[0.0, 0.0], 0.0);
        assert_eq!(kpi.avg_latency, 0.0);
        assert_eq!(kpi.active_links, 0);
        assert_eq!(kpi.demand_satisfied_pct, 0.0);

        let empty = FlowKpi::calculate(&FlowNetwork::new(), &[], 5.0);
        assert_eq!(empty.avg_utilization, 0.0);
    }

    #[test]
    fn test_noise_below_epsilon_is_inactive() {
        let kpi = FlowKpi::calculate(&line(), &[0.005, 0.0], 5.0);
        assert_eq!(kpi.active_links, 0);
        assert_eq!(kpi.avg_latency, 0.0);
    }

    #[test]
    fn test_evacuation_kpi() {
        let net = FlowNetwork::new()
            .with_node(Node::source("A", 30.0))
            .with_node(Node::source("B", 10.0))
            .with_node(Node::intermediate("hall"))
            .with_node(Node::sink("exit"))
            .with_edge(Edge::new("A", "hall", 20.0))
            .with_edge(Edge::new("B", "hall", 20.0))
            .with_edge(Edge::new("hall", "exit", 40.0));
        let kpi = EvacuationKpi::calculate(&net, &[20.0, 10.0, 30.0]);
        assert_eq!(kpi.evacuated_per_source["A"], 20.0);
        assert_eq!(kpi.received_per_sink["exit"], 30.0);
        assert_eq!(kpi.total_people, 40.0);
        assert!((kpi.percentage - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_mission_kpi() {
        let missions = vec![
            Mission::new("M1", 2).with_priority(3.0).with_requirement("drones", 2),
            Mission::new("M2", 1).with_priority(1.0),
        ];
        let resources = vec![MissionResource::new("drones", 4)];
        let mut schedule = MissionSchedule::new(4);
        schedule.record("M1", Some(1), 2);
        schedule.record("M2", None, 1);
        schedule.usage.insert("drones".into(), vec![0, 2, 2, 0]);

        let kpi = MissionKpi::calculate(&schedule, &missions, &resources);
        assert_eq!((kpi.scheduled, kpi.total), (1, 2));
        assert_eq!(kpi.total_priority, 3.0);
        assert_eq!(kpi.peak_usage["drones"], 2);
        assert!((kpi.utilization_by_resource["drones"] - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_production_kpi() {
        let products = vec![
            Product::new("doors", 3.0).with_need("plant1", 1.0).with_need("plant3", 3.0),
            Product::new("windows", 5.0).with_need("plant2", 2.0).with_need("plant3", 2.0),
        ];
        let resources = vec![
            ProductionResource::new("plant1", 4.0),
            ProductionResource::new("plant2", 12.0),
            ProductionResource::new("plant3", 18.0),
            ProductionResource::new("spare", 0.0),
        ];
        let kpi = ProductionKpi::calculate(&products, &resources, &[2.0, 6.0]);
        assert!((kpi.total_profit - 36.0).abs() < 1e-9);
        assert_eq!(kpi.products_made, 2);
        assert_eq!(kpi.usage_by_resource["plant3"], 18.0);
        assert!((kpi.utilization_by_resource["plant1"] - 0.5).abs() < 1e-9);
        assert_eq!(kpi.utilization_by_resource["spare"], 0.0);
        assert_eq!(kpi.binding_resources, vec!["plant2", "plant3"]);
    }

    #[test]
    fn test_staffing_kpi() {
        let calendar = StaffingCalendar::weekly();
        let demand = StaffingDemand::new()
            .with("Mon", "Morning", "nurse", 1)
            .with("Mon", "Guard", "doctor", 1);
        let candidates = vec![
            Candidate::new("N1", 1000.0).with_skill("nurse").with_shift_cost("Morning", 80.0),
            Candidate::new("D1", 2000.0).with_skill("doctor"),
        ];
        let mut roster = ShiftRoster::new();
        roster.assign("N1", "Mon", "Morning");

        let kpi = StaffingKpi::calculate(&calendar, &demand, &candidates, &["N1".to_string()], &roster);
        assert_eq!(kpi.hired, 1);
        assert_eq!(kpi.hire_cost, 1000.0);
        assert_eq!(kpi.shift_cost, 80.0);
        assert_eq!(kpi.headcount_by_skill["nurse"], 1);
        assert_eq!(kpi.headcount_by_skill["doctor"], 0);
        assert_eq!(kpi.shifts_by_candidate["N1"], 1);
        assert!((kpi.demand_met_pct - 50.0).abs() < 1e-9);
    }
}
