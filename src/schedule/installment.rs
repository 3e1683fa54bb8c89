//! Level installment for the French (constant-installment) method

use crate::error::{AmortizationError, Result};

/// Level installment that amortizes `balance` over `remaining_periods` at `periodic_rate`
///
/// A zero rate degenerates to straight-line repayment.
pub fn installment(balance: f64, periodic_rate: f64, remaining_periods: u32) -> Result<f64> {
    if remaining_periods == 0 {
        return Err(AmortizationError::invalid_input(
            "remaining_periods",
            "number of periods must be > 0",
        ));
    }

    let n = remaining_periods as f64;
    if periodic_rate == 0.0 {
        return Ok(balance / n);
    }

    let growth = (1.0 + periodic_rate).powf(n);
    Ok(balance * (periodic_rate * growth) / (growth - 1.0))
}
