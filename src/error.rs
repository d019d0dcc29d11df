//! Error types.
//!
//! Only construction failures and backend failures are errors. Solver
//! outcomes such as infeasibility or an expired time limit are reported
//! through [`SolverStatus`](crate::lp::SolverStatus) instead.

use thiserror::Error;

use crate::validation::ValidationError;

/// A model could not be constructed from the given input.
///
/// Raised before any solver call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("invalid model input: {}", summarize(.0))]
    InvalidInput(Vec<ValidationError>),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("variable `{name}` has lower bound {lower} above upper bound {upper}")]
    InvertedBounds { name: String, lower: f64, upper: f64 },

    #[error("expression references undeclared variable #{0}")]
    UnknownVariable(usize),
}

/// Failures of the optimizer backend itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("backend failure: {0}")]
    Backend(String),

    #[error("infeasible subset computation is not supported by this backend")]
    Unsupported,

    #[error("infeasible subset computation needed more than {0} re-solves")]
    BudgetExceeded(usize),

    #[error("the model is not infeasible")]
    NotInfeasible,

    #[error("solve did not finish: {0}")]
    Aborted(&'static str),
}

fn summarize(errors: &[ValidationError]) -> String {
    match errors {
        [] => "no details".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_invalid_input_names_first_issue() {
        let err = ModelError::InvalidInput(vec![
            ValidationError::new(ValidationErrorKind::NegativeValue, "edges[1].capacity", "capacity is -3"),
            ValidationError::new(ValidationErrorKind::SelfLoop, "edges[2]", "self-loop on a"),
        ]);
        let text = err.to_string();
        assert!(text.contains("edges[1].capacity"));
        assert!(text.contains("and 1 more"));
    }

    #[test]
    fn test_parameter_error_display() {
        let err = ModelError::InvalidParameter {
            name: "alpha",
            reason: "must lie in [0, 1], got 1.5".into(),
        };
        assert_eq!(err.to_string(), "invalid parameter `alpha`: must lie in [0, 1], got 1.5");
    }
}
