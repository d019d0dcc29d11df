//! Staffing calendar and demand.
//!
//! The planning period is an ordered list of days, each split into the
//! same set of shifts. Day order matters: rest rules and rolling windows
//! look at consecutive days.

use serde::{Deserialize, Serialize};

/// What a shift means for rest and rolling-window rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftKind {
    /// Early shift; capped by the consecutive-mornings rule.
    Morning,
    /// Night / on-call shift; forbids next morning, spaced out.
    Guard,
    /// No rest or window rule applies.
    Regular,
}

/// A shift within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// Shift name, unique within the calendar.
    pub name: String,
    /// Rule classification.
    pub kind: ShiftKind,
}

impl Shift {
    /// Creates a shift.
    pub fn new(name: impl Into<String>, kind: ShiftKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered days, shifts per day, and the skills demand is expressed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingCalendar {
    pub days: Vec<String>,
    pub shifts: Vec<Shift>,
    pub skills: Vec<String>,
}

impl StaffingCalendar {
    /// Creates a calendar.
    pub fn new(days: Vec<String>, shifts: Vec<Shift>, skills: Vec<String>) -> Self {
        Self {
            days,
            shifts,
            skills,
        }
    }

    /// One week, a morning and a guard shift, nurses and doctors.
    pub fn weekly() -> Self {
        let days = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
        Self::new(
            days.iter().map(|d| d.to_string()).collect(),
            vec![
                Shift::new("Morning", ShiftKind::Morning),
                Shift::new("Guard", ShiftKind::Guard),
            ],
            vec!["nurse".into(), "doctor".into()],
        )
    }

    /// Shifts of the given kind.
    pub fn shifts_of_kind(&self, kind: ShiftKind) -> impl Iterator<Item = &Shift> {
        self.shifts.iter().filter(move |s| s.kind == kind)
    }

    /// Looks up a shift by name.
    pub fn shift(&self, name: &str) -> Option<&Shift> {
        self.shifts.iter().find(|s| s.name == name)
    }

    /// Every run of `len` consecutive days.
    ///
    /// Empty when the calendar is shorter than `len` or `len` is zero.
    pub fn rolling_windows(&self, len: usize) -> impl Iterator<Item = &[String]> {
        let count = if len == 0 { 0 } else { usize::MAX };
        self.days.windows(len.max(1)).take(count)
    }

    /// Number of (day, shift) slots.
    pub fn slot_count(&self) -> usize {
        self.days.len() * self.shifts.len()
    }
}

/// Headcount required for one (day, shift, skill).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandEntry {
    pub day: String,
    pub shift: String,
    pub skill: String,
    pub required: u32,
}

/// Staffing demand table. Unlisted slots require nobody.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingDemand {
    pub entries: Vec<DemandEntry>,
}

impl StaffingDemand {
    /// Empty demand.
    pub fn new() -> Self {
        Self::default()
    }

    /// The same per-shift skill requirement on every day.
    ///
    /// `per_shift` lists `(shift, skill, required)`.
    pub fn uniform(calendar: &StaffingCalendar, per_shift: &[(&str, &str, u32)]) -> Self {
        let mut demand = Self::new();
        for day in &calendar.days {
            for &(shift, skill, required) in per_shift {
                demand.set(day, shift, skill, required);
            }
        }
        demand
    }

    /// Sets (or replaces) the requirement of a slot.
    pub fn set(&mut self, day: &str, shift: &str, skill: &str, required: u32) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.day == day && e.shift == shift && e.skill == skill)
        {
            Some(entry) => entry.required = required,
            None => self.entries.push(DemandEntry {
                day: day.to_string(),
                shift: shift.to_string(),
                skill: skill.to_string(),
                required,
            }),
        }
    }

    /// Builder form of [`StaffingDemand::set`].
    pub fn with(mut self, day: &str, shift: &str, skill: &str, required: u32) -> Self {
        self.set(day, shift, skill, required);
        self
    }

    /// Requirement of a slot.
    pub fn required(&self, day: &str, shift: &str, skill: &str) -> u32 {
        self.entries
            .iter()
            .find(|e| e.day == day && e.shift == shift && e.skill == skill)
            .map_or(0, |e| e.required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekly_calendar() {
        let cal = StaffingCalendar::weekly();
        assert_eq!(cal.days.len(), 7);
        assert_eq!(cal.slot_count(), 14);
        assert_eq!(cal.shifts_of_kind(ShiftKind::Guard).count(), 1);
        assert_eq!(cal.shift("Morning").map(|s| s.kind), Some(ShiftKind::Morning));
    }

    #[test]
    fn test_rolling_windows() {
        let cal = StaffingCalendar::weekly();
        let windows: Vec<&[String]> = cal.rolling_windows(3).collect();
        assert_eq!(windows.len(), 5);
        assert_eq!(windows[0], ["Mon", "Tue", "Wed"]);
        assert_eq!(windows[4], ["Fri", "Sat", "Sun"]);

        assert_eq!(cal.rolling_windows(8).count(), 0);
        assert_eq!(cal.rolling_windows(0).count(), 0);
        assert_eq!(cal.rolling_windows(7).count(), 1);
    }

    #[test]
    fn test_demand_table() {
        let cal = StaffingCalendar::weekly();
        let mut demand = StaffingDemand::uniform(
            &cal,
            &[("Morning", "nurse", 3), ("Morning", "doctor", 1), ("Guard", "nurse", 2)],
        );
        assert_eq!(demand.entries.len(), 21);
        assert_eq!(demand.required("Tue", "Morning", "nurse"), 3);
        assert_eq!(demand.required("Tue", "Guard", "doctor"), 0);

        demand.set("Tue", "Morning", "nurse", 5);
        assert_eq!(demand.required("Tue", "Morning", "nurse"), 5);
        assert_eq!(demand.entries.len(), 21);
    }
}
