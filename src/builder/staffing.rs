//! Staff hiring and shift assignment.
//!
//! Chooses which candidates to hire and which shifts they work so that
//! every (day, shift, skill) demand is covered at minimum hiring cost.
//!
//! # Formulation
//!
//! ```text
//! hire[e] ∈ {0, 1},  y[e][d][s] ∈ {0, 1}
//!
//! Σ_{e qualified for k} y[e][d][s] ≥ demand(d, s, k)      coverage
//! y[e][d][s] ≤ hire[e]                                    hire link
//! y[e][d][s] = 0             if e is unavailable on d
//! Σ_s y[e][d][s] ≤ 1                                      one per day
//! Σ guard y[e][d] + Σ morning y[e][d+1] ≤ 1               rest
//! Σ guard y[e] over W consecutive days ≤ 1                guard spacing
//! Σ morning y[e] over L+1 consecutive days ≤ L            morning streak
//! min · hire[e] ≤ Σ y[e] ≤ max · hire[e]                  shift bounds
//! hire[e] = 1                if e is mandatory
//!
//! minimize  Σ hire_cost[e] · hire[e]
//! ```
//!
//! | Rule | Default |
//! |------|---------|
//! | min shifts per hire | 2 |
//! | max shifts per hire | 8 |
//! | guard spacing window W | 3 days |
//! | max consecutive mornings L | 5 |

use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::no_solution_message;
use crate::error::ModelError;
use crate::interpret::{diagnose, StaffingKpi};
use crate::lp::{self, Direction, LinearExpr, LpModel, ModelStatistics, Relation, Solution, SolveOptions, Solver, SolverStatus, VarId, VarKind};
use crate::models::{
    Candidate, ConstraintCategory, ConstraintTag, ShiftKind, ShiftRoster, StaffingCalendar, StaffingDemand,
};
use crate::objective::linear_sum;
use crate::validation::validate_staffing;

/// Labour rules applied to every candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffingRules {
    /// Minimum shifts of a hired candidate.
    pub min_shifts: u32,
    /// Maximum shifts of a hired candidate.
    pub max_shifts: u32,
    /// At most one guard in any window of this many consecutive days.
    pub guard_spacing_days: usize,
    /// Maximum run of consecutive morning shifts.
    pub max_consecutive_mornings: usize,
}

impl Default for StaffingRules {
    fn default() -> Self {
        Self {
            min_shifts: 2,
            max_shifts: 8,
            guard_spacing_days: 3,
            max_consecutive_mornings: 5,
        }
    }
}

impl StaffingRules {
    /// Sets the shift bounds.
    pub fn with_shift_bounds(mut self, min: u32, max: u32) -> Self {
        self.min_shifts = min;
        self.max_shifts = max;
        self
    }

    /// Sets the guard spacing window.
    pub fn with_guard_spacing(mut self, days: usize) -> Self {
        self.guard_spacing_days = days;
        self
    }

    /// Sets the consecutive mornings cap.
    pub fn with_max_consecutive_mornings(mut self, mornings: usize) -> Self {
        self.max_consecutive_mornings = mornings;
        self
    }

    /// Effective `(min, max)` for a candidate.
    fn bounds_for(&self, candidate: &Candidate) -> (u32, u32) {
        (
            candidate.min_shifts.unwrap_or(self.min_shifts),
            candidate.max_shifts.unwrap_or(self.max_shifts),
        )
    }
}

/// Staffing result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingPlan {
    pub status: SolverStatus,
    pub message: Option<String>,
    pub objective_value: Option<f64>,
    /// Hired candidate ids, in candidate order.
    pub hired: Vec<String>,
    pub roster: ShiftRoster,
    pub kpi: Option<StaffingKpi>,
    pub statistics: ModelStatistics,
    pub solve_time: Duration,
    pub diagnostics: Vec<String>,
}

/// A built staffing model and its variable handles.
#[derive(Debug, Clone)]
pub struct StaffingModel {
    pub model: LpModel,
    /// Hire indicator per candidate.
    pub hire: Vec<VarId>,
    /// Assignment indicator, indexed `[candidate][day][shift]`.
    pub assign: Vec<Vec<Vec<VarId>>>,
}

impl StaffingModel {
    /// Reads a solution of this model back into a plan.
    pub fn interpret(
        &self,
        calendar: &StaffingCalendar,
        demand: &StaffingDemand,
        candidates: &[Candidate],
        solution: &Solution,
    ) -> StaffingPlan {
        let mut plan = StaffingPlan {
            status: solution.status,
            message: no_solution_message(
                solution.status,
                "check demand, availability and the labour rules.",
            ),
            objective_value: solution.objective_value,
            hired: Vec::new(),
            roster: ShiftRoster::new(),
            kpi: None,
            statistics: self.model.statistics(),
            solve_time: solution.solve_time,
            diagnostics: diagnose::explain(&self.model, solution),
        };
        if !solution.has_assignment() {
            return plan;
        }

        for (e, candidate) in candidates.iter().enumerate() {
            if solution.is_set(self.hire[e]) {
                plan.hired.push(candidate.id.clone());
            }
            for (d, day) in calendar.days.iter().enumerate() {
                for (s, shift) in calendar.shifts.iter().enumerate() {
                    if solution.is_set(self.assign[e][d][s]) {
                        plan.roster.assign(&candidate.id, day, &shift.name);
                    }
                }
            }
        }

        plan.kpi = Some(StaffingKpi::calculate(
            calendar,
            demand,
            candidates,
            &plan.hired,
            &plan.roster,
        ));
        plan
    }
}

/// Builds staffing models.
pub struct StaffingBuilder<'a> {
    calendar: &'a StaffingCalendar,
    demand: &'a StaffingDemand,
    candidates: &'a [Candidate],
    rules: StaffingRules,
}

impl<'a> StaffingBuilder<'a> {
    /// Creates a builder with the default rules.
    pub fn new(calendar: &'a StaffingCalendar, demand: &'a StaffingDemand, candidates: &'a [Candidate]) -> Self {
        Self {
            calendar,
            demand,
            candidates,
            rules: StaffingRules::default(),
        }
    }

    /// Sets the labour rules.
    pub fn with_rules(mut self, rules: StaffingRules) -> Self {
        self.rules = rules;
        self
    }

    /// Builds the model.
    pub fn build(&self) -> Result<StaffingModel, ModelError> {
        validate_staffing(self.calendar, self.demand, self.candidates).map_err(ModelError::InvalidInput)?;
        if self.rules.min_shifts > self.rules.max_shifts {
            return Err(ModelError::InvalidParameter {
                name: "min_shifts",
                reason: format!(
                    "exceeds max_shifts ({} > {})",
                    self.rules.min_shifts, self.rules.max_shifts
                ),
            });
        }

        let calendar = self.calendar;
        let candidates = self.candidates;
        let mut model = LpModel::new("staff_hiring");

        let hire = candidates
            .iter()
            .map(|c| model.declare_variable(VarKind::Binary, 0.0, 1.0, format!("hire_{}", c.id)))
            .collect::<Result<Vec<_>, _>>()?;
        let mut assign = Vec::with_capacity(candidates.len());
        for c in candidates {
            let mut days = Vec::with_capacity(calendar.days.len());
            for day in &calendar.days {
                let shifts = calendar
                    .shifts
                    .iter()
                    .map(|s| model.declare_variable(VarKind::Binary, 0.0, 1.0, format!("y_{}_{}_{}", c.id, day, s.name)))
                    .collect::<Result<Vec<_>, _>>()?;
                days.push(shifts);
            }
            assign.push(days);
        }

        // Shift indices by kind, for the rest and window rules.
        let of_kind = |kind: ShiftKind| -> Vec<usize> {
            calendar
                .shifts
                .iter()
                .enumerate()
                .filter(|(_, s)| s.kind == kind)
                .map(|(i, _)| i)
                .collect()
        };
        let guards = of_kind(ShiftKind::Guard);
        let mornings = of_kind(ShiftKind::Morning);

        for (d, day) in calendar.days.iter().enumerate() {
            for (s, shift) in calendar.shifts.iter().enumerate() {
                for skill in &calendar.skills {
                    let required = self.demand.required(day, &shift.name, skill);
                    if required == 0 {
                        continue;
                    }
                    let covering = LinearExpr::sum(
                        candidates
                            .iter()
                            .enumerate()
                            .filter(|(_, c)| c.is_qualified(skill))
                            .map(|(e, _)| assign[e][d][s]),
                    );
                    model.add_linear_constraint(
                        covering,
                        Relation::Ge,
                        required as f64,
                        ConstraintTag::coverage(day, &shift.name, skill),
                    )?;
                }
            }
        }

        for (e, c) in candidates.iter().enumerate() {
            for (d, day) in calendar.days.iter().enumerate() {
                for (s, shift) in calendar.shifts.iter().enumerate() {
                    model.add_linear_constraint(
                        LinearExpr::from(assign[e][d][s]).with_term(hire[e], -1.0),
                        Relation::Le,
                        0.0,
                        ConstraintTag::slot(ConstraintCategory::HireLink, &c.id, day, &shift.name),
                    )?;
                }
            }
        }

        for (e, c) in candidates.iter().enumerate() {
            for (d, day) in calendar.days.iter().enumerate() {
                if c.is_available(day) {
                    continue;
                }
                for (s, shift) in calendar.shifts.iter().enumerate() {
                    model.add_linear_constraint(
                        LinearExpr::from(assign[e][d][s]),
                        Relation::Eq,
                        0.0,
                        ConstraintTag::slot(ConstraintCategory::Unavailable, &c.id, day, &shift.name),
                    )?;
                }
            }
        }

        for (e, c) in candidates.iter().enumerate() {
            for (d, day) in calendar.days.iter().enumerate() {
                model.add_linear_constraint(
                    LinearExpr::sum(assign[e][d].iter().copied()),
                    Relation::Le,
                    1.0,
                    ConstraintTag::edge(ConstraintCategory::OnePerDay, &c.id, day),
                )?;
            }
        }

        if !guards.is_empty() && !mornings.is_empty() {
            for (e, c) in candidates.iter().enumerate() {
                for d in 1..calendar.days.len() {
                    let expr = LinearExpr::sum(
                        guards
                            .iter()
                            .map(|&s| assign[e][d - 1][s])
                            .chain(mornings.iter().map(|&s| assign[e][d][s])),
                    );
                    model.add_linear_constraint(
                        expr,
                        Relation::Le,
                        1.0,
                        ConstraintTag::new(
                            ConstraintCategory::Rest,
                            vec![c.id.clone(), calendar.days[d - 1].clone(), calendar.days[d].clone()],
                        ),
                    )?;
                }
            }
        }

        let window_sum = |e: usize, start: usize, len: usize, kinds: &[usize]| {
            LinearExpr::sum(
                (start..start + len)
                    .flat_map(|d| kinds.iter().map(move |&s| (d, s)))
                    .map(|(d, s)| assign[e][d][s]),
            )
        };

        if !guards.is_empty() {
            let len = self.rules.guard_spacing_days;
            for (e, c) in candidates.iter().enumerate() {
                for (start, window) in calendar.rolling_windows(len).enumerate() {
                    model.add_linear_constraint(
                        window_sum(e, start, len, &guards),
                        Relation::Le,
                        1.0,
                        ConstraintTag::window(ConstraintCategory::GuardSpacing, &c.id, window),
                    )?;
                }
            }
        }

        if !mornings.is_empty() {
            let cap = self.rules.max_consecutive_mornings;
            for (e, c) in candidates.iter().enumerate() {
                for (start, window) in calendar.rolling_windows(cap + 1).enumerate() {
                    model.add_linear_constraint(
                        window_sum(e, start, cap + 1, &mornings),
                        Relation::Le,
                        cap as f64,
                        ConstraintTag::window(ConstraintCategory::MorningStreak, &c.id, window),
                    )?;
                }
            }
        }

        for (e, c) in candidates.iter().enumerate() {
            let (_, max) = self.rules.bounds_for(c);
            model.add_linear_constraint(
                total_shifts(&assign[e]).with_term(hire[e], -(max as f64)),
                Relation::Le,
                0.0,
                ConstraintTag::single(ConstraintCategory::MaxTotal, &c.id),
            )?;
        }

        for (e, c) in candidates.iter().enumerate() {
            let (min, _) = self.rules.bounds_for(c);
            model.add_linear_constraint(
                total_shifts(&assign[e]).with_term(hire[e], -(min as f64)),
                Relation::Ge,
                0.0,
                ConstraintTag::single(ConstraintCategory::MinTotal, &c.id),
            )?;
        }

        for (e, c) in candidates.iter().enumerate().filter(|(_, c)| c.mandatory) {
            model.add_linear_constraint(
                LinearExpr::from(hire[e]),
                Relation::Eq,
                1.0,
                ConstraintTag::single(ConstraintCategory::HireRequired, &c.id),
            )?;
        }

        let objective = linear_sum(hire.iter().zip(candidates).map(|(&var, c)| (var, c.hire_cost)));
        model.set_objective(objective, Direction::Minimize)?;

        let stats = model.statistics();
        debug!(
            "staffing model: {} candidates, {} slots -> {} vars, {} constraints",
            candidates.len(),
            calendar.slot_count(),
            stats.num_variables,
            stats.num_constraints
        );

        Ok(StaffingModel { model, hire, assign })
    }

    /// Builds, solves and interprets.
    pub fn solve<S: Solver + ?Sized>(&self, solver: &S, options: &SolveOptions) -> Result<StaffingPlan, ModelError> {
        let built = self.build()?;
        let solution = lp::solve(&built.model, solver, options);
        Ok(built.interpret(self.calendar, self.demand, self.candidates, &solution))
    }
}

fn total_shifts(days: &[Vec<VarId>]) -> LinearExpr {
    LinearExpr::sum(days.iter().flatten().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lp::MicroLpSolver;
    use crate::models::Shift;

    fn calendar(days: &[&str]) -> StaffingCalendar {
        StaffingCalendar::new(
            days.iter().map(|d| d.to_string()).collect(),
            vec![
                Shift::new("Morning", ShiftKind::Morning),
                Shift::new("Guard", ShiftKind::Guard),
            ],
            vec!["nurse".into()],
        )
    }

    fn nurses() -> Vec<Candidate> {
        ["N1", "N2", "N3", "N4"]
            .iter()
            .enumerate()
            .map(|(i, id)| Candidate::new(*id, 100.0 + 10.0 * i as f64).with_skill("nurse"))
            .collect()
    }

    /// Ten nurses and three doctors.
    fn week_roster() -> Vec<Candidate> {
        let nurses = (1..=10).map(|i| {
            Candidate::new(format!("I{i}"), 1000.0 + 10.0 * i as f64)
                .with_skill("nurse")
                .with_shift_cost("Morning", 80.0)
                .with_shift_cost("Guard", 120.0)
        });
        let doctors = (1..=3).map(|i| {
            Candidate::new(format!("M{i}"), 2000.0 + 20.0 * i as f64)
                .with_skill("doctor")
                .with_shift_cost("Morning", 120.0)
                .with_shift_cost("Guard", 180.0)
        });
        nurses.chain(doctors).collect()
    }

    fn week_demand(calendar: &StaffingCalendar) -> StaffingDemand {
        StaffingDemand::uniform(
            calendar,
            &[
                ("Morning", "nurse", 3),
                ("Morning", "doctor", 1),
                ("Guard", "nurse", 2),
                ("Guard", "doctor", 1),
            ],
        )
    }

    /// Weekly calendar with an extra skill only `X` has, needed on Monday morning.
    fn midwife_week() -> (StaffingCalendar, StaffingDemand) {
        let mut cal = StaffingCalendar::weekly();
        cal.skills.push("midwife".into());
        let mut demand = week_demand(&cal);
        demand.set("Mon", "Morning", "midwife", 1);
        (cal, demand)
    }

    fn solve(
        calendar: &StaffingCalendar,
        demand: &StaffingDemand,
        candidates: &[Candidate],
        rules: StaffingRules,
    ) -> StaffingPlan {
        StaffingBuilder::new(calendar, demand, candidates)
            .with_rules(rules)
            .solve(&MicroLpSolver::new(), &SolveOptions::new())
            .unwrap()
    }

    #[test]
    fn test_four_days_need_three_nurses() {
        let cal = calendar(&["Mon", "Tue", "Wed", "Thu"]);
        let demand = StaffingDemand::uniform(&cal, &[("Morning", "nurse", 1), ("Guard", "nurse", 1)]);
        let candidates = nurses();
        let rules = StaffingRules::default().with_shift_bounds(1, 3);
        let plan = solve(&cal, &demand, &candidates, rules);

        assert_eq!(plan.status, SolverStatus::Optimal);
        // 8 shifts at most 3 per nurse: three hires, the cheapest three.
        assert!((plan.objective_value.unwrap() - 330.0).abs() < 1e-6);
        assert_eq!(plan.hired, vec!["N1", "N2", "N3"]);

        for id in &plan.hired {
            let count = plan.roster.shift_count(id);
            assert!((1..=3).contains(&count), "{id} works {count}");
            for day in &cal.days {
                assert!(plan.roster.shifts_on(id, day) <= 1);
            }
            for pair in cal.days.windows(2) {
                let guard = plan.roster.staffed(&pair[0], "Guard").contains(&id.as_str());
                let morning = plan.roster.staffed(&pair[1], "Morning").contains(&id.as_str());
                assert!(!(guard && morning), "{id} lacks rest after {}", pair[0]);
            }
            let guards: Vec<usize> = cal
                .days
                .iter()
                .enumerate()
                .filter(|(_, d)| plan.roster.staffed(d, "Guard").contains(&id.as_str()))
                .map(|(i, _)| i)
                .collect();
            assert!(guards.windows(2).all(|g| g[1] - g[0] >= 3));
        }
        assert_eq!(plan.roster.shift_count("N4"), 0);

        let kpi = plan.kpi.unwrap();
        assert!((kpi.demand_met_pct - 100.0).abs() < 1e-9);
        assert_eq!(kpi.headcount_by_skill["nurse"], 3);
        assert!((kpi.hire_cost - 330.0).abs() < 1e-9);
    }

    #[test]
    fn test_unavailable_mandatory_candidate_is_explained() {
        let cal = calendar(&["Mon", "Tue"]);
        let demand = StaffingDemand::new();
        let candidates = vec![Candidate::new("X", 50.0)
            .with_skill("nurse")
            .unavailable_on_all(&cal.days)
            .mandatory()];

        let plan = solve(&cal, &demand, &candidates, StaffingRules::default());
        assert_eq!(plan.status, SolverStatus::Infeasible);
        assert!(plan.hired.is_empty());
        assert!(plan.kpi.is_none());
        assert!(plan
            .diagnostics
            .contains(&"Minimum shift count unreachable for X.".to_string()));
        assert!(plan.diagnostics.contains(&"X must be hired.".to_string()));
    }

    #[test]
    fn test_unavailable_candidate_with_relaxed_bounds() {
        let cal = calendar(&["Mon", "Tue"]);
        let demand = StaffingDemand::new();
        let base = Candidate::new("X", 50.0).with_skill("nurse").unavailable_on_all(&cal.days);

        let relaxed = vec![base.clone().with_shift_bounds(0, 8).mandatory()];
        let plan = solve(&cal, &demand, &relaxed, StaffingRules::default());
        assert_eq!(plan.status, SolverStatus::Optimal);
        assert_eq!(plan.hired, vec!["X"]);
        assert!(plan.roster.assignments.is_empty());

        let optional = vec![base];
        let plan = solve(&cal, &demand, &optional, StaffingRules::default());
        assert_eq!(plan.status, SolverStatus::Optimal);
        assert!(plan.hired.is_empty());
        assert!(plan.objective_value.unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_infeasibility_explained_at_full_week_size() {
        let cal = StaffingCalendar::weekly();
        let demand = week_demand(&cal);
        let mut candidates = week_roster();
        candidates.push(
            Candidate::new("X", 500.0)
                .with_skill("doctor")
                .unavailable_on_all(&cal.days)
                .mandatory(),
        );

        let built = StaffingBuilder::new(&cal, &demand, &candidates).build().unwrap();
        assert!(built.model.constraints().len() > 500);

        let plan = solve(&cal, &demand, &candidates, StaffingRules::default());
        assert_eq!(plan.status, SolverStatus::Infeasible);
        assert!(plan
            .diagnostics
            .contains(&"Minimum shift count unreachable for X.".to_string()));
        assert!(plan.diagnostics.contains(&"X must be hired.".to_string()));
        assert!(plan.diagnostics.iter().all(|m| m.contains('X')), "{:?}", plan.diagnostics);
    }

    #[test]
    fn test_minimum_shifts_unreachable_for_needed_candidate() {
        let (cal, demand) = midwife_week();
        let x = cal
            .days
            .iter()
            .skip(1)
            .fold(Candidate::new("X", 500.0).with_skill("midwife"), |c, day| c.unavailable_on(day.as_str()));
        let mut candidates = week_roster();
        candidates.push(x);

        let plan = solve(&cal, &demand, &candidates, StaffingRules::default());
        assert_eq!(plan.status, SolverStatus::Infeasible);
        assert!(plan
            .diagnostics
            .contains(&"Minimum shift count unreachable for X.".to_string()));
        assert!(plan
            .diagnostics
            .contains(&"Understaffed: not enough 'midwife' for the Mon Morning shift.".to_string()));
        assert!(!plan.diagnostics.contains(&"X must be hired.".to_string()));
    }

    #[test]
    fn test_needed_candidate_with_zero_availability() {
        let (cal, _) = midwife_week();
        let demand = StaffingDemand::new().with("Mon", "Morning", "midwife", 1);
        let candidates = vec![Candidate::new("X", 500.0)
            .with_skill("midwife")
            .unavailable_on_all(&cal.days)];

        let plan = solve(&cal, &demand, &candidates, StaffingRules::default());
        assert_eq!(plan.status, SolverStatus::Infeasible);
        assert!(plan
            .diagnostics
            .contains(&"Understaffed: not enough 'midwife' for the Mon Morning shift.".to_string()));
        assert!(plan.diagnostics.iter().any(|m| m.starts_with("X is not available on")));
    }

    #[test]
    fn test_single_shift_allowed_by_candidate_bounds() {
        let (cal, _) = midwife_week();
        let demand = StaffingDemand::new().with("Mon", "Morning", "midwife", 1);
        let x = cal
            .days
            .iter()
            .skip(1)
            .fold(Candidate::new("X", 500.0).with_skill("midwife"), |c, day| c.unavailable_on(day.as_str()))
            .with_shift_bounds(1, 8);

        let plan = solve(&cal, &demand, &[x], StaffingRules::default());
        assert_eq!(plan.status, SolverStatus::Optimal);
        assert_eq!(plan.hired, vec!["X"]);
        assert_eq!(plan.roster.staffed("Mon", "Morning"), vec!["X"]);
        assert_eq!(plan.roster.shift_count("X"), 1);
    }

    #[test]
    fn test_constraint_layout() {
        let cal = StaffingCalendar::weekly();
        let demand = StaffingDemand::uniform(&cal, &[("Morning", "nurse", 1)]);
        let candidates = nurses();
        let built = StaffingBuilder::new(&cal, &demand, &candidates).build().unwrap();

        let names: Vec<String> = built.model.constraints().iter().map(|c| c.name()).collect();
        assert_eq!(names[0], "cover_Mon_Morning_nurse");
        assert!(names.contains(&"rest_guard_matin_N1_Mon_Tue".to_string()));
        assert!(names.contains(&"spacing_garde_N1_Mon_Tue_Wed".to_string()));
        assert!(names.contains(&"max_matin_seq_N1_Mon_Tue_Wed_Thu_Fri_Sat".to_string()));
        assert!(!names.iter().any(|n| n.starts_with("hire_required")));

        // 7 cover, 56 hire links, 28 one-per-day, 24 rest, 20 spacing,
        // 8 streak, 4 max, 4 min.
        assert_eq!(names.len(), 7 + 56 + 28 + 24 + 20 + 8 + 4 + 4);
        for constraint in built.model.constraints() {
            assert!(diagnose::describe(&constraint.tag).is_some(), "{}", constraint.name());
        }
    }

    #[test]
    fn test_rules_checked() {
        let cal = calendar(&["Mon"]);
        let demand = StaffingDemand::new();
        let err = StaffingBuilder::new(&cal, &demand, &[])
            .with_rules(StaffingRules::default().with_shift_bounds(5, 2))
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidParameter { name: "min_shifts", .. }));

        let bad_demand = StaffingDemand::new().with("Fri", "Morning", "nurse", 1);
        assert!(matches!(
            StaffingBuilder::new(&cal, &bad_demand, &[]).build().unwrap_err(),
            ModelError::InvalidInput(_)
        ));
    }

    #[test]
    fn test_rules_from_json() {
        let rules: StaffingRules = serde_json::from_str(r#"{"max_shifts": 5}"#).unwrap();
        assert_eq!(rules, StaffingRules::default().with_shift_bounds(2, 5));
    }
}
