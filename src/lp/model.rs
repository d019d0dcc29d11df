//! LP/MILP model container.
//!
//! An [`LpModel`] is built once by a model builder, handed read-only to a
//! [`Solver`](super::Solver), and never mutated by solving. Each solve works
//! on its own model instance.

use serde::{Deserialize, Serialize};

use super::expr::{LinearExpr, VarId};
use crate::error::ModelError;
use crate::models::ConstraintTag;

/// Variable domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    Continuous,
    Binary,
    Integer,
}

/// A declared decision variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,
    pub kind: VarKind,
    pub lower: f64,
    pub upper: f64,
}

/// Relation between the left- and right-hand side of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    Le,
    Ge,
    Eq,
}

impl Relation {
    /// Mathematical symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Relation::Le => "<=",
            Relation::Ge => ">=",
            Relation::Eq => "==",
        }
    }

    /// Whether `lhs (relation) rhs` holds within `tolerance`.
    pub fn holds(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            Relation::Le => lhs <= rhs + tolerance,
            Relation::Ge => lhs >= rhs - tolerance,
            Relation::Eq => (lhs - rhs).abs() <= tolerance,
        }
    }
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Minimize,
    Maximize,
}

/// Handle of an added constraint (dense index into its model).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConstraintId(pub(crate) usize);

impl ConstraintId {
    /// Position of the constraint in insertion order.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// `expr (relation) rhs`, tagged with its descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    pub expr: LinearExpr,
    pub relation: Relation,
    pub rhs: f64,
    pub tag: ConstraintTag,
}

impl LinearConstraint {
    /// Rendered constraint name.
    pub fn name(&self) -> String {
        self.tag.name()
    }
}

/// Objective function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub expr: LinearExpr,
    pub direction: Direction,
}

/// Size summary of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModelStatistics {
    pub num_variables: usize,
    pub num_constraints: usize,
    pub num_binary_vars: usize,
    pub num_integer_vars: usize,
    pub num_continuous_vars: usize,
}

/// A linear (mixed-integer) optimization model.
///
/// # Examples
///
/// ```
/// use u_milp::lp::{Direction, LinearExpr, LpModel, Relation, VarKind};
/// use u_milp::models::{ConstraintCategory, ConstraintTag};
///
/// let mut model = LpModel::new("example");
/// let x = model.declare_variable(VarKind::Continuous, 0.0, 10.0, "x").unwrap();
/// let used = model.declare_variable(VarKind::Binary, 0.0, 1.0, "used").unwrap();
/// model
///     .add_linear_constraint(
///         LinearExpr::from(x).with_term(used, -10.0),
///         Relation::Le,
///         0.0,
///         ConstraintTag::edge(ConstraintCategory::LinkActivation, "a", "b"),
///     )
///     .unwrap();
/// model.set_objective(LinearExpr::from(x), Direction::Maximize).unwrap();
/// assert_eq!(model.statistics().num_binary_vars, 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LpModel {
    name: String,
    variables: Vec<VarDecl>,
    constraints: Vec<LinearConstraint>,
    objective: Objective,
}

impl LpModel {
    /// Creates an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: Objective::default(),
        }
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declares a variable.
    ///
    /// Binary variables are clamped to `[0, 1]` intersected with the given
    /// bounds. Fails when `lower > upper` or either bound is NaN.
    pub fn declare_variable(
        &mut self,
        kind: VarKind,
        lower: f64,
        upper: f64,
        name: impl Into<String>,
    ) -> Result<VarId, ModelError> {
        let name = name.into();
        let (lower, upper) = match kind {
            VarKind::Binary => (lower.max(0.0), upper.min(1.0)),
            _ => (lower, upper),
        };
        if lower.is_nan() || upper.is_nan() || lower > upper {
            return Err(ModelError::InvertedBounds { name, lower, upper });
        }

        let id = VarId(self.variables.len());
        self.variables.push(VarDecl {
            name,
            kind,
            lower,
            upper,
        });
        Ok(id)
    }

    /// Adds `expr (relation) rhs` under the given descriptor.
    pub fn add_linear_constraint(
        &mut self,
        expr: LinearExpr,
        relation: Relation,
        rhs: f64,
        tag: ConstraintTag,
    ) -> Result<ConstraintId, ModelError> {
        self.check_expr(&expr)?;
        let id = ConstraintId(self.constraints.len());
        self.constraints.push(LinearConstraint {
            expr,
            relation,
            rhs,
            tag,
        });
        Ok(id)
    }

    /// Replaces the objective.
    pub fn set_objective(&mut self, expr: LinearExpr, direction: Direction) -> Result<(), ModelError> {
        self.check_expr(&expr)?;
        self.objective = Objective { expr, direction };
        Ok(())
    }

    fn check_expr(&self, expr: &LinearExpr) -> Result<(), ModelError> {
        match expr
            .terms()
            .iter()
            .find(|(var, _)| var.index() >= self.variables.len())
        {
            Some((var, _)) => Err(ModelError::UnknownVariable(var.index())),
            None => Ok(()),
        }
    }

    /// Declared variables in declaration order.
    pub fn variables(&self) -> &[VarDecl] {
        &self.variables
    }

    /// A declared variable.
    pub fn variable(&self, id: VarId) -> &VarDecl {
        &self.variables[id.index()]
    }

    /// Constraints in insertion order.
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// An added constraint.
    pub fn constraint(&self, id: ConstraintId) -> &LinearConstraint {
        &self.constraints[id.index()]
    }

    /// Current objective.
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// Finds a constraint by rendered name.
    pub fn find_constraint(&self, name: &str) -> Option<ConstraintId> {
        self.constraints
            .iter()
            .position(|c| c.name() == name)
            .map(ConstraintId)
    }

    /// Variable and constraint counts.
    pub fn statistics(&self) -> ModelStatistics {
        let count = |kind: VarKind| self.variables.iter().filter(|v| v.kind == kind).count();
        ModelStatistics {
            num_variables: self.variables.len(),
            num_constraints: self.constraints.len(),
            num_binary_vars: count(VarKind::Binary),
            num_integer_vars: count(VarKind::Integer),
            num_continuous_vars: count(VarKind::Continuous),
        }
    }

    /// Constraints violated by an assignment (values indexed by variable).
    ///
    /// Used to audit solver output; bounds are not checked.
    pub fn violated_constraints(&self, values: &[f64], tolerance: f64) -> Vec<ConstraintId> {
        let value = |v: VarId| values.get(v.index()).copied().unwrap_or(0.0);
        self.constraints
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.relation.holds(c.expr.evaluate(value), c.rhs, tolerance))
            .map(|(i, _)| ConstraintId(i))
            .collect()
    }
}
