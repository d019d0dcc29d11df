//! Production mix.
//!
//! Chooses how much of each product to make with limited shared
//! resources so that total profit is maximal.
//!
//! # Formulation
//!
//! ```text
//! x[p] ≥ 0
//!
//! Σ_p need[p][r] · x[p] ≤ available[r]    ∀ r
//! x[p] ≥ min_output[p]                    when committed
//!
//! maximize  Σ profit[p] · x[p]
//! ```
//!
//! A profitable product that needs no limited resource makes the model
//! unbounded.
//!
//! # Reference
//! Hillier & Lieberman, "Introduction to Operations Research", Ch. 3.1
//! (the Wyndor Glass product-mix example)

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use super::no_solution_message;
use crate::error::ModelError;
use crate::interpret::{diagnose, ProductionKpi};
use crate::lp::{self, Direction, LinearExpr, LpModel, ModelStatistics, Relation, Solution, SolveOptions, Solver, SolverStatus, VarId, VarKind};
use crate::models::{ConstraintCategory, ConstraintTag, Product, ProductionResource};
use crate::objective::linear_sum;
use crate::validation::validate_production;

/// Production mix result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionPlan {
    pub status: SolverStatus,
    pub message: Option<String>,
    pub objective_value: Option<f64>,
    /// Quantity per product.
    pub quantities: BTreeMap<String, f64>,
    pub kpi: Option<ProductionKpi>,
    pub statistics: ModelStatistics,
    pub solve_time: Duration,
    pub diagnostics: Vec<String>,
}

/// A built production model and its quantity variables.
#[derive(Debug, Clone)]
pub struct ProductionModel {
    pub model: LpModel,
    /// Quantity per product, in product order.
    pub quantity: Vec<VarId>,
}

impl ProductionModel {
    /// Reads a solution of this model back into a plan.
    pub fn interpret(&self, products: &[Product], resources: &[ProductionResource], solution: &Solution) -> ProductionPlan {
        let mut plan = ProductionPlan {
            status: solution.status,
            message: no_solution_message(solution.status, "check resource availability and committed outputs."),
            objective_value: solution.objective_value,
            quantities: BTreeMap::new(),
            kpi: None,
            statistics: self.model.statistics(),
            solve_time: solution.solve_time,
            diagnostics: diagnose::explain(&self.model, solution),
        };
        if !solution.has_assignment() {
            return plan;
        }

        let values: Vec<f64> = self.quantity.iter().map(|&v| solution.value(v)).collect();
        plan.quantities = products.iter().map(|p| p.id.clone()).zip(values.iter().copied()).collect();
        plan.kpi = Some(ProductionKpi::calculate(products, resources, &values));
        plan
    }
}

/// Builds production mix models.
pub struct ProductionBuilder<'a> {
    products: &'a [Product],
    resources: &'a [ProductionResource],
}

impl<'a> ProductionBuilder<'a> {
    pub fn new(products: &'a [Product], resources: &'a [ProductionResource]) -> Self {
        Self { products, resources }
    }

    /// Builds the model.
    pub fn build(&self) -> Result<ProductionModel, ModelError> {
        validate_production(self.products, self.resources).map_err(ModelError::InvalidInput)?;

        let mut model = LpModel::new("production_mix");
        let quantity = self
            .products
            .iter()
            .map(|p| model.declare_variable(VarKind::Continuous, 0.0, f64::INFINITY, format!("x_{}", p.id)))
            .collect::<Result<Vec<_>, _>>()?;

        for r in self.resources {
            let draw: LinearExpr = self
                .products
                .iter()
                .zip(&quantity)
                .map(|(p, &var)| (var, p.need(&r.id)))
                .filter(|&(_, need)| need > 0.0)
                .collect();
            if draw.is_empty() {
                continue;
            }
            model.add_linear_constraint(
                draw,
                Relation::Le,
                r.available,
                ConstraintTag::single(ConstraintCategory::ResourceAvailability, &r.id),
            )?;
        }

        for (p, &var) in self.products.iter().zip(&quantity) {
            if p.min_output <= 0.0 {
                continue;
            }
            model.add_linear_constraint(
                LinearExpr::from(var),
                Relation::Ge,
                p.min_output,
                ConstraintTag::single(ConstraintCategory::MinimumOutput, &p.id),
            )?;
        }

        let objective = linear_sum(quantity.iter().zip(self.products).map(|(&var, p)| (var, p.profit)));
        model.set_objective(objective, Direction::Maximize)?;

        let stats = model.statistics();
        debug!(
            "production model: {} products, {} resources -> {} vars, {} constraints",
            self.products.len(),
            self.resources.len(),
            stats.num_variables,
            stats.num_constraints
        );

        Ok(ProductionModel { model, quantity })
    }

    /// Builds, solves and interprets.
    pub fn solve<S: Solver + ?Sized>(&self, solver: &S, options: &SolveOptions) -> Result<ProductionPlan, ModelError> {
        let built = self.build()?;
        let solution = lp::solve(&built.model, solver, options);
        Ok(built.interpret(self.products, self.resources, &solution))
    }
}
