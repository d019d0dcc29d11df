//! Objective composition.
//!
//! Single-criterion objectives are plain linear sums. Multi-criterion
//! objectives combine criteria that live on different numeric scales, so
//! one of them is rescaled before weighting:
//!
//! | Composer | Expression | Direction |
//! |----------|-----------|-----------|
//! | [`linear_sum`] | `Σ coeff · var` | either |
//! | [`WeightedObjective`] | `cost + α · latency / normalization` | minimize |
//! | [`flow_versus_time`] | `α · flow / total_supply − (1 − α) · t_max` | maximize |

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::lp::{LinearExpr, VarId};

/// `Σ coeff · var` over the given terms.
pub fn linear_sum(terms: impl IntoIterator<Item = (VarId, f64)>) -> LinearExpr {
    terms.into_iter().collect()
}

/// Cost plus normalized latency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightedObjective {
    /// Weight of the latency criterion.
    pub alpha: f64,
    /// Latency is divided by this before weighting.
    pub normalization: f64,
}

impl Default for WeightedObjective {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            normalization: 100.0,
        }
    }
}

impl WeightedObjective {
    /// Creates a weighting.
    pub fn new(alpha: f64, normalization: f64) -> Self {
        Self { alpha, normalization }
    }

    /// Checks `alpha >= 0` and `normalization > 0`, both finite.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(ModelError::InvalidParameter {
                name: "alpha",
                reason: format!("must be finite and non-negative, got {}", self.alpha),
            });
        }
        if !self.normalization.is_finite() || self.normalization <= 0.0 {
            return Err(ModelError::InvalidParameter {
                name: "normalization",
                reason: format!("must be finite and positive, got {}", self.normalization),
            });
        }
        Ok(())
    }

    /// `cost + alpha * latency / normalization`.
    pub fn compose(&self, cost: LinearExpr, latency: LinearExpr) -> Result<LinearExpr, ModelError> {
        self.validate()?;
        Ok(cost + latency.scaled(self.alpha / self.normalization))
    }
}

/// Flow-versus-time trade-off, to be maximized.
///
/// `alpha` must lie in `[0, 1]` and `total_supply` must be positive.
pub fn flow_versus_time(
    flow: LinearExpr,
    total_supply: f64,
    t_max: VarId,
    alpha: f64,
) -> Result<LinearExpr, ModelError> {
    if !(0.0..=1.0).contains(&alpha) {
        return Err(ModelError::InvalidParameter {
            name: "alpha",
            reason: format!("must lie in [0, 1], got {alpha}"),
        });
    }
    if !total_supply.is_finite() || total_supply <= 0.0 {
        return Err(ModelError::InvalidParameter {
            name: "total_supply",
            reason: format!("must be finite and positive, got {total_supply}"),
        });
    }
    Ok(flow.scaled(alpha / total_supply).with_term(t_max, -(1.0 - alpha)))
}
