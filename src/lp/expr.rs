//! Linear expressions over model variables.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Handle of a declared variable (dense index into its model).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of the variable in declaration order.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A linear expression `Σ coeff · var`.
///
/// Terms are kept in insertion order and may repeat a variable;
/// [`LinearExpr::compact`] merges them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    /// Creates an empty expression.
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Expression with a single term.
    pub fn term(var: VarId, coeff: f64) -> Self {
        Self {
            terms: vec![(var, coeff)],
        }
    }

    /// Sum of the given variables with coefficient 1.
    pub fn sum(vars: impl IntoIterator<Item = VarId>) -> Self {
        vars.into_iter().map(|v| (v, 1.0)).collect()
    }

    /// Appends a term.
    pub fn add_term(&mut self, var: VarId, coeff: f64) {
        self.terms.push((var, coeff));
    }

    /// Builder form of [`LinearExpr::add_term`].
    pub fn with_term(mut self, var: VarId, coeff: f64) -> Self {
        self.add_term(var, coeff);
        self
    }

    /// Raw terms in insertion order.
    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    /// Whether the expression has no terms at all.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Multiplies every coefficient by `factor`.
    pub fn scaled(mut self, factor: f64) -> Self {
        for (_, coeff) in &mut self.terms {
            *coeff *= factor;
        }
        self
    }

    /// Merged terms, one per variable, ordered by variable index,
    /// with zero coefficients dropped.
    pub fn compact(&self) -> Vec<(VarId, f64)> {
        let mut merged: BTreeMap<VarId, f64> = BTreeMap::new();
        for &(var, coeff) in &self.terms {
            *merged.entry(var).or_insert(0.0) += coeff;
        }
        merged.into_iter().filter(|&(_, c)| c != 0.0).collect()
    }

    /// Evaluates the expression under an assignment.
    pub fn evaluate(&self, value: impl Fn(VarId) -> f64) -> f64 {
        self.terms.iter().map(|&(var, coeff)| coeff * value(var)).sum()
    }
}

impl From<VarId> for LinearExpr {
    fn from(var: VarId) -> Self {
        Self::term(var, 1.0)
    }
}

impl FromIterator<(VarId, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (VarId, f64)>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}

impl Extend<(VarId, f64)> for LinearExpr {
    fn extend<I: IntoIterator<Item = (VarId, f64)>>(&mut self, iter: I) {
        self.terms.extend(iter);
    }
}

impl AddAssign for LinearExpr {
    fn add_assign(&mut self, rhs: Self) {
        self.terms.extend(rhs.terms);
    }
}

impl Add for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl Neg for LinearExpr {
    type Output = LinearExpr;

    fn neg(self) -> Self::Output {
        self.scaled(-1.0)
    }
}

impl Sub for LinearExpr {
    type Output = LinearExpr;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl Mul<f64> for LinearExpr {
    type Output = LinearExpr;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scaled(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_merges_and_drops_zeros() {
        let x = VarId(0);
        let y = VarId(1);
        let z = VarId(2);
        let expr = LinearExpr::new()
            .with_term(y, 2.0)
            .with_term(x, 1.0)
            .with_term(y, -0.5)
            .with_term(z, 3.0)
            .with_term(z, -3.0);
        assert_eq!(expr.compact(), vec![(x, 1.0), (y, 1.5)]);
    }

    #[test]
    fn test_arithmetic() {
        let x = VarId(0);
        let y = VarId(1);
        let out = LinearExpr::sum([x, y]);
        let inflow = LinearExpr::from(y);
        let balance = (out - inflow) * 2.0;
        assert_eq!(balance.compact(), vec![(x, 2.0)]);
    }

    #[test]
    fn test_evaluate() {
        let x = VarId(0);
        let y = VarId(1);
        let expr = LinearExpr::term(x, 3.0).with_term(y, -1.0);
        let values = [2.0, 4.0];
        assert!((expr.evaluate(|v| values[v.index()]) - 2.0).abs() < 1e-12);
    }
}
