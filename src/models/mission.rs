//! Mission and mission-resource models.
//!
//! A mission occupies a contiguous block of `duration` time units and
//! draws a fixed quantity of each required resource for its whole
//! duration. Time is discrete: instants `0..horizon`.
//!
//! # Reference
//! Pritsker, Watters & Wolfe (1969), "Multiproject scheduling with
//! limited resources: a zero-one programming approach"

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A mission to be scheduled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    /// Unique mission identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Duration in time units.
    pub duration: i64,
    /// Objective weight earned when the mission is scheduled.
    pub priority: f64,
    /// Latest completion instant. `None` = the planning horizon.
    pub deadline: Option<i64>,
    /// Quantity drawn per resource while active.
    pub requirements: HashMap<String, i64>,
}

impl Mission {
    /// Creates a mission with unit priority and no requirements.
    pub fn new(id: impl Into<String>, duration: i64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            duration,
            priority: 1.0,
            deadline: None,
            requirements: HashMap::new(),
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the priority weight.
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the deadline (latest completion instant).
    pub fn with_deadline(mut self, deadline: i64) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Adds a resource requirement.
    pub fn with_requirement(mut self, resource: impl Into<String>, quantity: i64) -> Self {
        self.requirements.insert(resource.into(), quantity);
        self
    }

    /// Quantity of `resource` drawn while active (0 if not required).
    pub fn requirement(&self, resource: &str) -> i64 {
        self.requirements.get(resource).copied().unwrap_or(0)
    }

    /// Effective deadline under `horizon`: the mission's own deadline
    /// clamped to the horizon, or the horizon itself.
    pub fn deadline_within(&self, horizon: i64) -> i64 {
        self.deadline.map_or(horizon, |d| d.min(horizon))
    }

    /// Whether the mission is active at `instant` when started at `start`.
    #[inline]
    pub fn covers(&self, start: i64, instant: i64) -> bool {
        start <= instant && instant < start + self.duration
    }
}

/// A renewable resource available to missions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionResource {
    /// Unique resource identifier.
    pub id: String,
    /// Units available at every instant, unless profiled.
    pub capacity: i64,
    /// Per-instant availability overriding `capacity` where defined.
    pub profile: Option<Vec<i64>>,
}

impl MissionResource {
    /// Creates a resource with constant availability.
    pub fn new(id: impl Into<String>, capacity: i64) -> Self {
        Self {
            id: id.into(),
            capacity,
            profile: None,
        }
    }

    /// Sets a per-instant availability profile.
    ///
    /// Instants past the end of the profile fall back to `capacity`.
    pub fn with_profile(mut self, profile: Vec<i64>) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Units available at `instant`.
    pub fn available_at(&self, instant: i64) -> i64 {
        usize::try_from(instant)
            .ok()
            .and_then(|i| self.profile.as_ref().and_then(|p| p.get(i)))
            .copied()
            .unwrap_or(self.capacity)
    }
}
