//! Solution records.
//!
//! Domain-level readings of a solved model: flow per edge, a mission
//! timetable, and a shift roster. They are plain data produced once from a
//! solution; metrics are derived from them in [`crate::interpret::kpi`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flow carried by one edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeFlow {
    /// Tail node id.
    pub from: String,
    /// Head node id.
    pub to: String,
    /// Flow value as read from the solution.
    pub flow: f64,
    /// Value of the edge's "used" indicator.
    pub used: bool,
}

/// Start of one mission in a timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledMission {
    /// Mission ID.
    pub mission_id: String,
    /// Start instant. `None` when the mission was not scheduled.
    pub start: Option<i64>,
    /// End instant (exclusive). `None` when not scheduled.
    pub end: Option<i64>,
}

/// A mission timetable over `0..horizon`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionSchedule {
    /// One entry per mission, in input order.
    pub entries: Vec<ScheduledMission>,
    /// Planning horizon.
    pub horizon: i64,
    /// Units drawn per resource at each instant.
    pub usage: BTreeMap<String, Vec<i64>>,
}

impl MissionSchedule {
    /// Creates an empty timetable.
    pub fn new(horizon: i64) -> Self {
        Self {
            entries: Vec::new(),
            horizon,
            usage: BTreeMap::new(),
        }
    }

    /// Records a mission's start (or that it was left out).
    pub fn record(&mut self, mission_id: impl Into<String>, start: Option<i64>, duration: i64) {
        self.entries.push(ScheduledMission {
            mission_id: mission_id.into(),
            start,
            end: start.map(|s| s + duration),
        });
    }

    /// Start instant of a mission.
    pub fn start_of(&self, mission_id: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|e| e.mission_id == mission_id)
            .and_then(|e| e.start)
    }

    /// Number of scheduled missions.
    pub fn scheduled_count(&self) -> usize {
        self.entries.iter().filter(|e| e.start.is_some()).count()
    }

    /// Missions running at `instant`.
    pub fn active_at(&self, instant: i64) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| match (e.start, e.end) {
                (Some(s), Some(end)) => s <= instant && instant < end,
                _ => false,
            })
            .map(|e| e.mission_id.as_str())
            .collect()
    }

    /// Units of `resource` drawn at `instant`.
    pub fn usage_at(&self, resource: &str, instant: i64) -> i64 {
        usize::try_from(instant)
            .ok()
            .and_then(|i| self.usage.get(resource).and_then(|u| u.get(i)))
            .copied()
            .unwrap_or(0)
    }
}

/// One worked shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    pub candidate_id: String,
    pub day: String,
    pub shift: String,
}

/// Assignments of hired candidates to (day, shift) slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRoster {
    pub assignments: Vec<ShiftAssignment>,
}

impl ShiftRoster {
    /// Empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assignment.
    pub fn assign(&mut self, candidate_id: &str, day: &str, shift: &str) {
        self.assignments.push(ShiftAssignment {
            candidate_id: candidate_id.to_string(),
            day: day.to_string(),
            shift: shift.to_string(),
        });
    }

    /// Candidates working a slot.
    pub fn staffed(&self, day: &str, shift: &str) -> Vec<&str> {
        self.assignments
            .iter()
            .filter(|a| a.day == day && a.shift == shift)
            .map(|a| a.candidate_id.as_str())
            .collect()
    }

    /// `(day, shift)` slots worked by a candidate.
    pub fn shifts_of(&self, candidate_id: &str) -> Vec<(&str, &str)> {
        self.assignments
            .iter()
            .filter(|a| a.candidate_id == candidate_id)
            .map(|a| (a.day.as_str(), a.shift.as_str()))
            .collect()
    }

    /// Number of shifts worked by a candidate.
    pub fn shift_count(&self, candidate_id: &str) -> usize {
        self.assignments
            .iter()
            .filter(|a| a.candidate_id == candidate_id)
            .count()
    }

    /// Number of shifts a candidate works on `day`.
    pub fn shifts_on(&self, candidate_id: &str, day: &str) -> usize {
        self.assignments
            .iter()
            .filter(|a| a.candidate_id == candidate_id && a.day == day)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mission_schedule_queries() {
        let mut schedule = MissionSchedule::new(10);
        schedule.record("M1", Some(2), 3);
        schedule.record("M2", None, 4);
        schedule.usage.insert("drones".into(), vec![0, 0, 2, 2, 2, 0]);

        assert_eq!(schedule.start_of("M1"), Some(2));
        assert_eq!(schedule.start_of("M2"), None);
        assert_eq!(schedule.scheduled_count(), 1);
        assert_eq!(schedule.active_at(4), vec!["M1"]);
        assert!(schedule.active_at(5).is_empty());
        assert_eq!(schedule.usage_at("drones", 3), 2);
        assert_eq!(schedule.usage_at("drones", 99), 0);
        assert_eq!(schedule.usage_at("medics", 3), 0);
    }

    #[test]
    fn test_roster_queries() {
        let mut roster = ShiftRoster::new();
        roster.assign("N1", "Mon", "Morning");
        roster.assign("N2", "Mon", "Morning");
        roster.assign("N1", "Tue", "Guard");

        assert_eq!(roster.staffed("Mon", "Morning"), vec!["N1", "N2"]);
        assert_eq!(roster.shifts_of("N1"), vec![("Mon", "Morning"), ("Tue", "Guard")]);
        assert_eq!(roster.shift_count("N2"), 1);
        assert_eq!(roster.shifts_on("N1", "Tue"), 1);
        assert_eq!(roster.shifts_on("N2", "Tue"), 0);
    }
}
