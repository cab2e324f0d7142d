//! Error types for the calculator library.
//!
//! Every formula either returns a finite number or one of these errors. Input
//! problems are the caller's fault and are reported before any arithmetic
//! runs; domain problems mean the inputs are well formed but the formula has
//! no finite answer for them.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} cannot be below -100%, got {value}")]
    RateBelowTotalLoss { field: &'static str, value: f64 },
    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("division by zero: {what} is zero")]
    DivisionByZero { what: &'static str },
    #[error("no solution: {reason}")]
    NoSolution { reason: String },
    #[error("payment of {payment:.2} does not cover the monthly interest of {interest:.2}")]
    PaymentTooLow { payment: f64, interest: f64 },
    #[error("growth rate is undefined from {start} to {end}")]
    UndefinedGrowth { start: f64, end: f64 },
    #[error("{what} is outside the representable range")]
    NonFiniteResult { what: &'static str },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl CalcError {
    pub fn is_domain(&self) -> bool {
        matches!(self, CalcError::Domain(_))
    }

    /// A short hint telling the user what to change.
    pub fn guidance(&self) -> &'static str {
        match self {
            CalcError::Input(InputError::NonFinite { .. }) => "Enter a plain number.",
            CalcError::Input(InputError::Negative { .. }) => "Use zero or a positive value.",
            CalcError::Input(InputError::RateBelowTotalLoss { .. }) => {
                "A rate cannot lose more than everything."
            }
            CalcError::Input(InputError::Invalid { .. }) => "Check the highlighted input.",
            CalcError::Domain(DomainError::DivisionByZero { .. }) => {
                "One of the inputs must be non-zero."
            }
            CalcError::Domain(DomainError::NoSolution { .. }) => {
                "These inputs have no answer; adjust them and try again."
            }
            CalcError::Domain(DomainError::PaymentTooLow { .. }) => "Increase the payment!",
            CalcError::Domain(DomainError::UndefinedGrowth { .. }) => {
                "Start and end values must both be positive."
            }
            CalcError::Domain(DomainError::NonFiniteResult { .. }) => {
                "The inputs are too extreme; try more moderate values."
            }
        }
    }
}

pub type CalcResult<T> = std::result::Result<T, CalcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_and_display() {
        let err: CalcError = DomainError::DivisionByZero { what: "invested" }.into();
        assert!(err.is_domain());
        assert_eq!(err.to_string(), "division by zero: invested is zero");

        let err: CalcError = InputError::Negative {
            field: "years",
            value: -1.0,
        }
        .into();
        assert!(!err.is_domain());
        assert_eq!(err.to_string(), "years must not be negative, got -1");
    }

    #[test]
    fn test_payment_too_low_guidance() {
        let err: CalcError = DomainError::PaymentTooLow {
            payment: 50.0,
            interest: 75.0,
        }
        .into();
        assert_eq!(err.guidance(), "Increase the payment!");
        assert_eq!(
            err.to_string(),
            "payment of 50.00 does not cover the monthly interest of 75.00"
        );
    }
}
