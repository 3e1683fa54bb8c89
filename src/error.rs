//! Error types for rate normalization and schedule generation

use thiserror::Error;

/// Errors surfaced by the amortization core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AmortizationError {
    /// A caller-supplied parameter is outside its domain
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// The installment does not exceed the period's interest charge
    #[error(
        "Infeasible amortization in period {period}: installment {installment:.6} does not cover interest {interest:.6}"
    )]
    InfeasibleAmortization {
        period: u32,
        installment: f64,
        interest: f64,
    },

    /// The period loop hit its iteration cap with balance outstanding
    #[error("Schedule did not converge after {periods} periods (remaining balance {balance})")]
    NonConvergence { periods: u32, balance: f64 },
}

impl AmortizationError {
    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        AmortizationError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AmortizationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let err = AmortizationError::invalid_input("term_periods", "must be > 0");
        assert_eq!(err.to_string(), "Invalid input: term_periods: must be > 0");
    }

    #[test]
    fn test_infeasible_message_includes_period() {
        let err = AmortizationError::InfeasibleAmortization {
            period: 3,
            installment: 10.0,
            interest: 12.5,
        };
        assert!(err.to_string().contains("period 3"));
    }
}
