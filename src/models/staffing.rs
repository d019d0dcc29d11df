//! Hiring candidates.
//!
//! A candidate can be hired at a fixed cost and then assigned shifts.
//! Qualifications say which skills the candidate counts towards when
//! covering demand.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A candidate employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique candidate identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Skills the candidate is qualified for.
    pub qualifications: Vec<String>,
    /// Cost incurred when hired.
    pub hire_cost: f64,
    /// Cost per worked shift, by shift name (reporting only).
    pub shift_costs: HashMap<String, f64>,
    /// Availability by day. Unlisted days are available.
    pub availability: HashMap<String, bool>,
    /// Overrides the rule-wide minimum number of shifts.
    pub min_shifts: Option<u32>,
    /// Overrides the rule-wide maximum number of shifts.
    pub max_shifts: Option<u32>,
    /// Must be hired.
    pub mandatory: bool,
}

impl Candidate {
    /// Creates a candidate with the given hire cost.
    pub fn new(id: impl Into<String>, hire_cost: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            qualifications: Vec::new(),
            hire_cost,
            shift_costs: HashMap::new(),
            availability: HashMap::new(),
            min_shifts: None,
            max_shifts: None,
            mandatory: false,
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a qualification.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.qualifications.push(skill.into());
        self
    }

    /// Sets the cost of working one `shift`.
    pub fn with_shift_cost(mut self, shift: impl Into<String>, cost: f64) -> Self {
        self.shift_costs.insert(shift.into(), cost);
        self
    }

    /// Marks the candidate unavailable on `day`.
    pub fn unavailable_on(mut self, day: impl Into<String>) -> Self {
        self.availability.insert(day.into(), false);
        self
    }

    /// Marks the candidate unavailable on every listed day.
    pub fn unavailable_on_all<'a>(mut self, days: impl IntoIterator<Item = &'a String>) -> Self {
        for day in days {
            self.availability.insert(day.clone(), false);
        }
        self
    }

    /// Overrides the shift bounds for this candidate.
    pub fn with_shift_bounds(mut self, min: u32, max: u32) -> Self {
        self.min_shifts = Some(min);
        self.max_shifts = Some(max);
        self
    }

    /// Requires the candidate to be hired.
    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    /// Whether the candidate counts towards `skill`.
    pub fn is_qualified(&self, skill: &str) -> bool {
        self.qualifications.iter().any(|q| q == skill)
    }

    /// Whether the candidate can work on `day`.
    pub fn is_available(&self, day: &str) -> bool {
        self.availability.get(day).copied().unwrap_or(true)
    }

    /// Cost of working one `shift` (0 when unknown).
    pub fn shift_cost(&self, shift: &str) -> f64 {
        self.shift_costs.get(shift).copied().unwrap_or(0.0)
    }
}
