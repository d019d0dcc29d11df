//! Mission scheduling under renewable resources.
//!
//! Time-indexed 0-1 formulation over discrete instants `0..horizon`:
//!
//! ```text
//! x[m][t] ∈ {0, 1}   for t in 0..=horizon − duration[m]
//! Σ_m Σ_{t' covering t} req[m][r] · x[m][t'] ≤ avail[r](t)   ∀ r, t
//! x[m][t] = 0        when t + duration[m] > deadline[m]
//! Σ_t x[m][t] ≤ 1
//!
//! maximize  Σ priority[m] · x[m][t]
//! ```
//!
//! A mission longer than the horizon gets no start variable and is never
//! scheduled.
//!
//! # Reference
//! Pritsker, Watters & Wolfe (1969), "Multiproject scheduling with limited
//! resources: a zero-one programming approach", Management Science 16(1)

use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::no_solution_message;
use crate::error::ModelError;
use crate::interpret::{diagnose, MissionKpi};
use crate::lp::{self, Direction, LinearExpr, LpModel, ModelStatistics, Relation, Solution, SolveOptions, Solver, SolverStatus, VarId, VarKind};
use crate::models::{ConstraintCategory, ConstraintTag, Mission, MissionResource, MissionSchedule};
use crate::objective::linear_sum;
use crate::validation::validate_missions;

/// Default planning horizon.
pub const DEFAULT_HORIZON: i64 = 24;

/// Mission scheduling result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionPlan {
    pub status: SolverStatus,
    pub message: Option<String>,
    pub objective_value: Option<f64>,
    /// Timetable with resource usage; empty without an assignment.
    pub schedule: MissionSchedule,
    pub kpi: Option<MissionKpi>,
    pub statistics: ModelStatistics,
    pub solve_time: Duration,
    pub diagnostics: Vec<String>,
}

/// A built mission model and its start variables.
#[derive(Debug, Clone)]
pub struct MissionModel {
    pub model: LpModel,
    /// `(start instant, indicator)` per mission, in mission order.
    pub starts: Vec<Vec<(i64, VarId)>>,
    horizon: i64,
}

impl MissionModel {
    /// Reads a solution of this model back into a plan.
    pub fn interpret(&self, missions: &[Mission], resources: &[MissionResource], solution: &Solution) -> MissionPlan {
        let mut plan = MissionPlan {
            status: solution.status,
            message: no_solution_message(solution.status, "check resource availability and deadlines."),
            objective_value: solution.objective_value,
            schedule: MissionSchedule::new(self.horizon),
            kpi: None,
            statistics: self.model.statistics(),
            solve_time: solution.solve_time,
            diagnostics: diagnose::explain(&self.model, solution),
        };
        if !solution.has_assignment() {
            return plan;
        }

        let schedule = &mut plan.schedule;
        for (mission, starts) in missions.iter().zip(&self.starts) {
            let start = starts
                .iter()
                .find(|&&(_, var)| solution.is_set(var))
                .map(|&(t, _)| t);
            schedule.record(mission.id.clone(), start, mission.duration);
        }

        let horizon = usize::try_from(self.horizon).unwrap_or(0);
        for resource in resources {
            let mut usage = vec![0i64; horizon];
            for (t, slot) in usage.iter_mut().enumerate() {
                let instant = t as i64;
                *slot = missions
                    .iter()
                    .filter(|m| {
                        schedule
                            .start_of(&m.id)
                            .is_some_and(|s| m.covers(s, instant))
                    })
                    .map(|m| m.requirement(&resource.id))
                    .sum();
            }
            schedule.usage.insert(resource.id.clone(), usage);
        }

        plan.kpi = Some(MissionKpi::calculate(&plan.schedule, missions, resources));
        plan
    }
}

/// Builds mission scheduling models.
pub struct MissionBuilder<'a> {
    missions: &'a [Mission],
    resources: &'a [MissionResource],
    horizon: i64,
}

impl<'a> MissionBuilder<'a> {
    /// Creates a builder over the default horizon.
    pub fn new(missions: &'a [Mission], resources: &'a [MissionResource]) -> Self {
        Self {
            missions,
            resources,
            horizon: DEFAULT_HORIZON,
        }
    }

    /// Sets the planning horizon.
    pub fn with_horizon(mut self, horizon: i64) -> Self {
        self.horizon = horizon;
        self
    }

    /// Builds the model.
    pub fn build(&self) -> Result<MissionModel, ModelError> {
        validate_missions(self.missions, self.resources).map_err(ModelError::InvalidInput)?;
        if self.horizon < 0 {
            return Err(ModelError::InvalidParameter {
                name: "horizon",
                reason: format!("must be non-negative, got {}", self.horizon),
            });
        }

        let mut model = LpModel::new("mission_scheduling");
        let mut starts = Vec::with_capacity(self.missions.len());
        for m in self.missions {
            let vars = (0..=self.horizon - m.duration)
                .map(|t| {
                    model
                        .declare_variable(VarKind::Binary, 0.0, 1.0, format!("x_{}_{t}", m.id))
                        .map(|var| (t, var))
                })
                .collect::<Result<Vec<_>, _>>()?;
            starts.push(vars);
        }

        for r in self.resources {
            for t in 0..self.horizon {
                let mut expr = LinearExpr::new();
                for (m, vars) in self.missions.iter().zip(&starts) {
                    let quantity = m.requirement(&r.id);
                    if quantity <= 0 {
                        continue;
                    }
                    for &(_, var) in vars.iter().filter(|&&(s, _)| m.covers(s, t)) {
                        expr.add_term(var, quantity as f64);
                    }
                }
                if expr.is_empty() {
                    continue;
                }
                model.add_linear_constraint(
                    expr,
                    Relation::Le,
                    r.available_at(t) as f64,
                    ConstraintTag::edge(ConstraintCategory::ResourceCapacity, &r.id, format!("t{t}")),
                )?;
            }
        }

        for (m, vars) in self.missions.iter().zip(&starts) {
            let deadline = m.deadline_within(self.horizon);
            for &(t, var) in vars.iter().filter(|&&(t, _)| t + m.duration > deadline) {
                model.add_linear_constraint(
                    LinearExpr::from(var),
                    Relation::Eq,
                    0.0,
                    ConstraintTag::edge(ConstraintCategory::Deadline, &m.id, t.to_string()),
                )?;
            }
        }

        for (m, vars) in self.missions.iter().zip(&starts) {
            if vars.is_empty() {
                continue;
            }
            model.add_linear_constraint(
                LinearExpr::sum(vars.iter().map(|&(_, var)| var)),
                Relation::Le,
                1.0,
                ConstraintTag::single(ConstraintCategory::SingleStart, &m.id),
            )?;
        }

        let objective = linear_sum(
            self.missions
                .iter()
                .zip(&starts)
                .flat_map(|(m, vars)| vars.iter().map(move |&(_, var)| (var, m.priority))),
        );
        model.set_objective(objective, Direction::Maximize)?;

        let stats = model.statistics();
        debug!(
            "mission model: {} missions, {} resources, horizon {} -> {} vars, {} constraints",
            self.missions.len(),
            self.resources.len(),
            self.horizon,
            stats.num_variables,
            stats.num_constraints
        );

        Ok(MissionModel {
            model,
            starts,
            horizon: self.horizon,
        })
    }

    /// Builds, solves and interprets.
    pub fn solve<S: Solver + ?Sized>(&self, solver: &S, options: &SolveOptions) -> Result<MissionPlan, ModelError> {
        let built = self.build()?;
        let solution = lp::solve(&built.model, solver, options);
        Ok(built.interpret(self.missions, self.resources, &solution))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lp::MicroLpSolver;
    use crate::validation::ValidationErrorKind;

    fn drones() -> Vec<MissionResource> {
        vec![MissionResource::new("drones", 2)]
    }

    fn missions() -> Vec<Mission> {
        vec![
            Mission::new("M1", 3).with_priority(3.0).with_requirement("drones", 2),
            Mission::new("M2", 3)
                .with_priority(2.0)
                .with_requirement("drones", 2)
                .with_deadline(3),
            Mission::new("M3", 2).with_priority(1.0).with_requirement("drones", 1),
        ]
    }

    fn solve(missions: &[Mission], resources: &[MissionResource], horizon: i64) -> MissionPlan {
        MissionBuilder::new(missions, resources)
            .with_horizon(horizon)
            .solve(&MicroLpSolver::new(), &SolveOptions::new())
            .unwrap()
    }

    #[test]
    fn test_resource_conflict_picks_highest_priority() {
        let missions = missions();
        let plan = solve(&missions, &drones(), 6);
        assert_eq!(plan.status, SolverStatus::Optimal);
        assert!((plan.objective_value.unwrap() - 5.0).abs() < 1e-6);
        assert_eq!(plan.schedule.start_of("M2"), Some(0));
        assert_eq!(plan.schedule.start_of("M1"), Some(3));
        assert_eq!(plan.schedule.start_of("M3"), None);
        assert_eq!(plan.schedule.active_at(4), vec!["M1"]);

        let kpi = plan.kpi.unwrap();
        assert_eq!(kpi.scheduled, 2);
        assert_eq!(kpi.total, 3);
        assert_eq!(kpi.peak_usage["drones"], 2);
        assert!((kpi.utilization_by_resource["drones"] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_usage_never_exceeds_availability() {
        let missions = missions();
        let resources = vec![MissionResource::new("drones", 2).with_profile(vec![2, 2, 1, 1])];
        let plan = solve(&missions, &resources, 8);
        assert_eq!(plan.status, SolverStatus::Optimal);
        for t in 0..8 {
            assert!(plan.schedule.usage_at("drones", t) <= resources[0].available_at(t), "t = {t}");
        }
        // M2 must finish by 3 but needs 2 drones while only 1 is free at t = 2.
        assert_eq!(plan.schedule.start_of("M2"), None);
    }

    #[test]
    fn test_mission_longer_than_horizon() {
        let missions = vec![Mission::new("long", 10).with_requirement("drones", 1)];
        let built = MissionBuilder::new(&missions, &drones()).with_horizon(5).build().unwrap();
        assert!(built.starts[0].is_empty());
        assert_eq!(built.model.constraints().len(), 0);

        let plan = solve(&missions, &drones(), 5);
        assert_eq!(plan.status, SolverStatus::Optimal);
        assert_eq!(plan.schedule.scheduled_count(), 0);
    }

    #[test]
    fn test_deadline_past_horizon_adds_no_rows() {
        let missions = vec![
            Mission::new("late", 2).with_requirement("drones", 1).with_deadline(50),
            Mission::new("open", 2).with_requirement("drones", 1),
        ];
        let built = MissionBuilder::new(&missions, &drones()).with_horizon(6).build().unwrap();
        assert!(!built
            .model
            .constraints()
            .iter()
            .any(|c| c.tag.category == ConstraintCategory::Deadline));
        assert_eq!(built.starts[0].len(), 5);
    }

    #[test]
    fn test_constraint_layout() {
        let missions = missions();
        let built = MissionBuilder::new(&missions, &drones()).with_horizon(6).build().unwrap();
        let names: Vec<String> = built.model.constraints().iter().map(|c| c.name()).collect();
        assert_eq!(names[0], "res_drones_t0");
        assert!(names.contains(&"dead_M2_1".to_string()));
        assert!(!names.contains(&"dead_M2_0".to_string()));
        assert_eq!(names.last().unwrap(), "once_M3");
        for constraint in built.model.constraints() {
            assert!(diagnose::describe(&constraint.tag).is_some(), "{}", constraint.name());
        }
    }

    #[test]
    fn test_invalid_missions_rejected() {
        let missions = vec![Mission::new("M1", 0).with_requirement("cranes", 1)];
        let err = MissionBuilder::new(&missions, &drones()).build().unwrap_err();
        match err {
            ModelError::InvalidInput(errors) => {
                let kinds: Vec<_> = errors.iter().map(|e| e.kind).collect();
                assert!(kinds.contains(&ValidationErrorKind::InvalidDuration));
                assert!(kinds.contains(&ValidationErrorKind::UnknownResource));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
