//! Input validation for the optimization domains.
//!
//! Checks structural integrity of domain data before any model is built.
//! Every issue is collected in one pass and carries the offending field.
//! Detects:
//! - Duplicate IDs and duplicate edges
//! - References to undeclared nodes, resources, days, shifts or skills
//! - Self-loops
//! - Negative or non-finite capacities, costs, times and supplies
//! - Wrong number of sources / sinks for the problem shape

use crate::models::{
    Candidate, FlowNetwork, Mission, MissionResource, NodeRole, Product, ProductionResource, StaffingCalendar,
    StaffingDemand,
};
use std::collections::HashSet;
use std::fmt;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Path of the offending field, e.g. `edges[3].capacity`.
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// Two edges share the same (from, to) pair.
    DuplicateEdge,
    /// An edge starts and ends at the same node.
    SelfLoop,
    /// An edge references a node that doesn't exist.
    UnknownNode,
    /// A mission or product references a resource that doesn't exist.
    UnknownResource,
    /// A demand entry or candidate references an undeclared day, shift or skill.
    UnknownCalendarEntry,
    /// A quantity that must be non-negative and finite is not.
    NegativeValue,
    /// Too few or too many sources / sinks.
    RoleCount,
    /// A mission duration is not positive.
    InvalidDuration,
    /// A lower bound exceeds its upper bound.
    InvalidBounds,
    /// The staffing calendar has no days or no shifts.
    EmptyCalendar,
}

impl ValidationError {
    /// Creates an error.
    pub fn new(kind: ValidationErrorKind, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// How many terminals a flow instance may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkShape {
    /// Exactly one source and one sink (routing).
    SingleCommodity,
    /// At least one source and one sink (evacuation).
    MultiTerminal,
}

fn non_negative(errors: &mut Vec<ValidationError>, field: String, what: &str, value: f64) {
    if !value.is_finite() || value < 0.0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NegativeValue,
            field,
            format!("{what} must be finite and non-negative, got {value}"),
        ));
    }
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a flow network.
///
/// Checks:
/// 1. No duplicate node IDs
/// 2. Source / sink counts match `shape`
/// 3. Non-negative supplies
/// 4. Edge endpoints are declared nodes
/// 5. No self-loops
/// 6. No duplicate (from, to) pairs
/// 7. Non-negative, finite capacity, cost and time
pub fn validate_network(network: &FlowNetwork, shape: NetworkShape) -> ValidationResult {
    let mut errors = Vec::new();

    let mut node_ids = HashSet::new();
    for (i, node) in network.nodes.iter().enumerate() {
        if !node_ids.insert(node.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("nodes[{i}].id"),
                format!("duplicate node ID: {}", node.id),
            ));
        }
        non_negative(&mut errors, format!("nodes[{i}].supply"), "supply", node.supply);
    }

    for (role, label) in [(NodeRole::Source, "source"), (NodeRole::Sink, "sink")] {
        let count = network.nodes_with_role(role).count();
        let ok = match shape {
            NetworkShape::SingleCommodity => count == 1,
            NetworkShape::MultiTerminal => count >= 1,
        };
        if !ok {
            let expected = match shape {
                NetworkShape::SingleCommodity => "exactly one",
                NetworkShape::MultiTerminal => "at least one",
            };
            errors.push(ValidationError::new(
                ValidationErrorKind::RoleCount,
                "nodes",
                format!("expected {expected} {label}, found {count}"),
            ));
        }
    }

    let mut pairs = HashSet::new();
    for (i, edge) in network.edges.iter().enumerate() {
        for (end, id) in [("from", &edge.from), ("to", &edge.to)] {
            if !node_ids.contains(id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownNode,
                    format!("edges[{i}].{end}"),
                    format!("edge references undeclared node '{id}'"),
                ));
            }
        }
        if edge.from == edge.to {
            errors.push(ValidationError::new(
                ValidationErrorKind::SelfLoop,
                format!("edges[{i}]"),
                format!("self-loop on '{}'", edge.from),
            ));
        }
        if !pairs.insert((edge.from.as_str(), edge.to.as_str())) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateEdge,
                format!("edges[{i}]"),
                format!("duplicate edge {} -> {}", edge.from, edge.to),
            ));
        }
        non_negative(&mut errors, format!("edges[{i}].capacity"), "capacity", edge.capacity);
        non_negative(&mut errors, format!("edges[{i}].cost"), "cost", edge.cost);
        non_negative(&mut errors, format!("edges[{i}].time"), "time", edge.time);
    }

    finish(errors)
}

/// Validates missions and their resources.
pub fn validate_missions(missions: &[Mission], resources: &[MissionResource]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut resource_ids = HashSet::new();
    for (i, r) in resources.iter().enumerate() {
        if !resource_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("resources[{i}].id"),
                format!("duplicate resource ID: {}", r.id),
            ));
        }
        if r.capacity < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeValue,
                format!("resources[{i}].capacity"),
                format!("capacity is {}", r.capacity),
            ));
        }
        if let Some(t) = r.profile.iter().flatten().position(|&units| units < 0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeValue,
                format!("resources[{i}].profile[{t}]"),
                "availability must be non-negative",
            ));
        }
    }

    let mut mission_ids = HashSet::new();
    for (i, m) in missions.iter().enumerate() {
        if !mission_ids.insert(m.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("missions[{i}].id"),
                format!("duplicate mission ID: {}", m.id),
            ));
        }
        if m.duration <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!("missions[{i}].duration"),
                format!("mission '{}' has duration {}", m.id, m.duration),
            ));
        }
        non_negative(&mut errors, format!("missions[{i}].priority"), "priority", m.priority);

        // Sorted for a stable error order.
        let mut requirements: Vec<_> = m.requirements.iter().collect();
        requirements.sort();
        for (res, &quantity) in requirements {
            if !resource_ids.contains(res.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownResource,
                    format!("missions[{i}].requirements.{res}"),
                    format!("mission '{}' references unknown resource '{res}'", m.id),
                ));
            }
            if quantity < 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NegativeValue,
                    format!("missions[{i}].requirements.{res}"),
                    format!("requirement is {quantity}"),
                ));
            }
        }
    }

    finish(errors)
}

/// Validates a staffing instance.
///
/// Checks calendar uniqueness, that demand and candidates only reference
/// declared days, shifts and skills, hire costs, and per-candidate shift
/// bound overrides.
pub fn validate_staffing(
    calendar: &StaffingCalendar,
    demand: &StaffingDemand,
    candidates: &[Candidate],
) -> ValidationResult {
    let mut errors = Vec::new();

    if calendar.days.is_empty() || calendar.shifts.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyCalendar,
            "calendar",
            "calendar needs at least one day and one shift",
        ));
    }

    let unique = |field: &str, ids: Vec<&str>, errors: &mut Vec<ValidationError>| -> HashSet<String> {
        let mut seen = HashSet::new();
        for (i, id) in ids.into_iter().enumerate() {
            if !seen.insert(id.to_string()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("{field}[{i}]"),
                    format!("duplicate entry '{id}'"),
                ));
            }
        }
        seen
    };
    let days = unique("calendar.days", calendar.days.iter().map(String::as_str).collect(), &mut errors);
    let shifts = unique(
        "calendar.shifts",
        calendar.shifts.iter().map(|s| s.name.as_str()).collect(),
        &mut errors,
    );
    let skills = unique("calendar.skills", calendar.skills.iter().map(String::as_str).collect(), &mut errors);
    unique("candidates", candidates.iter().map(|c| c.id.as_str()).collect(), &mut errors);

    let unknown = |errors: &mut Vec<ValidationError>, set: &HashSet<String>, field: String, what: &str, value: &str| {
        if !set.contains(value) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownCalendarEntry,
                field,
                format!("unknown {what} '{value}'"),
            ));
        }
    };

    for (i, entry) in demand.entries.iter().enumerate() {
        unknown(&mut errors, &days, format!("demand[{i}].day"), "day", &entry.day);
        unknown(&mut errors, &shifts, format!("demand[{i}].shift"), "shift", &entry.shift);
        unknown(&mut errors, &skills, format!("demand[{i}].skill"), "skill", &entry.skill);
    }

    for (i, c) in candidates.iter().enumerate() {
        non_negative(&mut errors, format!("candidates[{i}].hire_cost"), "hire cost", c.hire_cost);
        for (j, skill) in c.qualifications.iter().enumerate() {
            unknown(&mut errors, &skills, format!("candidates[{i}].qualifications[{j}]"), "skill", skill);
        }
        let mut listed: Vec<&String> = c.availability.keys().collect();
        listed.sort();
        for day in listed {
            unknown(&mut errors, &days, format!("candidates[{i}].availability.{day}"), "day", day);
        }
        if let (Some(min), Some(max)) = (c.min_shifts, c.max_shifts) {
            if min > max {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidBounds,
                    format!("candidates[{i}].min_shifts"),
                    format!("min_shifts {min} exceeds max_shifts {max}"),
                ));
            }
        }
    }

    finish(errors)
}

/// Validates a production mix.
///
/// Checks:
/// 1. No duplicate product or resource IDs
/// 2. Finite profits
/// 3. Non-negative, finite availabilities, needs and minimum outputs
/// 4. Needs reference declared resources
pub fn validate_production(products: &[Product], resources: &[ProductionResource]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut resource_ids = HashSet::new();
    for (i, r) in resources.iter().enumerate() {
        if !resource_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("resources[{i}].id"),
                format!("duplicate resource ID: {}", r.id),
            ));
        }
        non_negative(&mut errors, format!("resources[{i}].available"), "availability", r.available);
    }

    let mut product_ids = HashSet::new();
    for (i, p) in products.iter().enumerate() {
        if !product_ids.insert(p.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("products[{i}].id"),
                format!("duplicate product ID: {}", p.id),
            ));
        }
        if !p.profit.is_finite() {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeValue,
                format!("products[{i}].profit"),
                format!("profit must be finite, got {}", p.profit),
            ));
        }
        non_negative(&mut errors, format!("products[{i}].min_output"), "minimum output", p.min_output);

        let mut needs: Vec<_> = p.needs.iter().collect();
        needs.sort_by(|a, b| a.0.cmp(b.0));
        for (res, &amount) in needs {
            if !resource_ids.contains(res.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownResource,
                    format!("products[{i}].needs.{res}"),
                    format!("product '{}' references unknown resource '{res}'", p.id),
                ));
            }
            non_negative(&mut errors, format!("products[{i}].needs.{res}"), "need", amount);
        }
    }

    finish(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Edge, Node, Shift, ShiftKind};

    fn line() -> FlowNetwork {
        FlowNetwork::new()
            .with_node(Node::source("s", 5.0))
            .with_node(Node::intermediate("m"))
            .with_node(Node::sink("t"))
            .with_edge(Edge::new("s", "m", 10.0).with_cost(2.0))
            .with_edge(Edge::new("m", "t", 5.0).with_cost(3.0))
    }

    fn kinds(result: ValidationResult) -> Vec<ValidationErrorKind> {
        result.unwrap_err().into_iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_valid_network() {
        assert!(validate_network(&line(), NetworkShape::SingleCommodity).is_ok());
        assert!(validate_network(&line(), NetworkShape::MultiTerminal).is_ok());
    }

    #[test]
    fn test_edge_problems_name_their_field() {
        let net = line()
            .with_edge(Edge::new("s", "m", 1.0))
            .with_edge(Edge::new("m", "m", 1.0))
            .with_edge(Edge::new("m", "ghost", -3.0));

        let errors = validate_network(&net, NetworkShape::SingleCommodity).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"edges[2]"));
        assert!(fields.contains(&"edges[3]"));
        assert!(fields.contains(&"edges[4].to"));
        assert!(fields.contains(&"edges[4].capacity"));

        let kinds: Vec<_> = errors.iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&ValidationErrorKind::DuplicateEdge));
        assert!(kinds.contains(&ValidationErrorKind::SelfLoop));
        assert!(kinds.contains(&ValidationErrorKind::UnknownNode));
        assert!(kinds.contains(&ValidationErrorKind::NegativeValue));
    }

    #[test]
    fn test_role_counts_by_shape() {
        let two_sources = line().with_node(Node::source("s2", 1.0)).with_edge(Edge::new("s2", "t", 1.0));
        assert_eq!(
            kinds(validate_network(&two_sources, NetworkShape::SingleCommodity)),
            vec![ValidationErrorKind::RoleCount]
        );
        assert!(validate_network(&two_sources, NetworkShape::MultiTerminal).is_ok());

        let no_sink = FlowNetwork::new().with_node(Node::source("s", 1.0));
        assert!(kinds(validate_network(&no_sink, NetworkShape::MultiTerminal))
            .contains(&ValidationErrorKind::RoleCount));
    }

    #[test]
    fn test_nan_is_rejected() {
        let net = line().with_edge(Edge::new("s", "t", 1.0).with_time(f64::NAN));
        let errors = validate_network(&net, NetworkShape::SingleCommodity).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "edges[2].time");
    }

    #[test]
    fn test_missions() {
        let resources = vec![MissionResource::new("drones", 2), MissionResource::new("drones", 1)];
        let missions = vec![
            Mission::new("M1", 0).with_requirement("drones", 1),
            Mission::new("M2", 3).with_requirement("tanks", 1),
        ];
        let errors = validate_missions(&missions, &resources).unwrap_err();
        let kinds: Vec<_> = errors.iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&ValidationErrorKind::DuplicateId));
        assert!(kinds.contains(&ValidationErrorKind::InvalidDuration));
        assert!(kinds.contains(&ValidationErrorKind::UnknownResource));
        assert_eq!(errors.len(), 3);

        let ok = validate_missions(&[Mission::new("M1", 2).with_requirement("drones", 1)], &resources[..1]);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_staffing_references() {
        let calendar = StaffingCalendar::new(
            vec!["Mon".into(), "Tue".into()],
            vec![Shift::new("Morning", ShiftKind::Morning)],
            vec!["nurse".into()],
        );
        let demand = StaffingDemand::new()
            .with("Mon", "Morning", "nurse", 1)
            .with("Wed", "Night", "nurse", 1);
        let candidates = vec![
            Candidate::new("A", 10.0).with_skill("surgeon").unavailable_on("Fri"),
            Candidate::new("A", -1.0).with_shift_bounds(3, 1),
        ];

        let errors = validate_staffing(&calendar, &demand, &candidates).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"demand[1].day"));
        assert!(fields.contains(&"demand[1].shift"));
        assert!(fields.contains(&"candidates[0].qualifications[0]"));
        assert!(fields.contains(&"candidates[0].availability.Fri"));
        assert!(fields.contains(&"candidates[1]"));
        assert!(fields.contains(&"candidates[1].hire_cost"));
        assert!(fields.contains(&"candidates[1].min_shifts"));
    }

    #[test]
    fn test_production() {
        let resources = vec![ProductionResource::new("wood", 10.0), ProductionResource::new("labor", -1.0)];
        let products = vec![
            Product::new("chair", 3.0).with_need("wood", 1.0).with_need("steel", 2.0),
            Product::new("chair", f64::NAN).with_need("wood", -1.0),
        ];
        let errors = validate_production(&products, &resources).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "resources[1].available",
                "products[0].needs.steel",
                "products[1].id",
                "products[1].profit",
                "products[1].needs.wood",
            ]
        );

        let ok = validate_production(&[Product::new("chair", -2.0).with_need("wood", 1.0)], &resources[..1]);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_empty_calendar() {
        let calendar = StaffingCalendar::new(Vec::new(), Vec::new(), Vec::new());
        let errors = validate_staffing(&calendar, &StaffingDemand::new(), &[]).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyCalendar);
    }
}
