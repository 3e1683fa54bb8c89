//! Running state of a schedule between periods

/// Closing balance below which the loan is considered repaid
pub const BALANCE_EPSILON: f64 = 1e-8;

/// Periods allowed beyond the planned term before the loop gives up
pub const ITERATION_HEADROOM: u32 = 6000;

/// State of the loan at the end of the last processed period
#[derive(Debug, Clone)]
pub struct AmortizationState {
    /// Last processed period (0 before the first)
    pub period: u32,

    /// Outstanding balance, unrounded
    pub balance: f64,

    /// Installment charged from the next period on, unrounded
    pub installment: f64,

    /// Planned total number of periods; lowered by term shortening
    pub planned_term: u32,
}

impl AmortizationState {
    pub fn new(principal: f64, installment: f64, term_periods: u32) -> Self {
        Self {
            period: 0,
            balance: principal,
            installment,
            planned_term: term_periods,
        }
    }

    /// Whether another period should run
    pub fn is_open(&self) -> bool {
        self.balance > BALANCE_EPSILON && self.period < self.iteration_cap()
    }

    pub fn iteration_cap(&self) -> u32 {
        self.planned_term.saturating_add(ITERATION_HEADROOM)
    }

    pub fn advance_period(&mut self) {
        self.period += 1;
    }

    /// Periods left in the plan after the current one, never less than one
    pub fn remaining_periods(&self) -> u32 {
        self.planned_term.saturating_sub(self.period).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_until_repaid() {
        let mut state = AmortizationState::new(100.0, 50.0, 2);
        assert!(state.is_open());
        state.balance = 5e-9;
        assert!(!state.is_open());
    }

    #[test]
    fn test_iteration_cap() {
        let mut state = AmortizationState::new(100.0, 1.0, 3);
        state.period = 3 + ITERATION_HEADROOM;
        assert!(!state.is_open());
        assert_eq!(AmortizationState::new(1.0, 1.0, u32::MAX).iteration_cap(), u32::MAX);
    }

    #[test]
    fn test_remaining_periods_floor() {
        let mut state = AmortizationState::new(100.0, 10.0, 12);
        state.period = 5;
        assert_eq!(state.remaining_periods(), 7);
        state.period = 12;
        assert_eq!(state.remaining_periods(), 1);
        state.period = 15;
        assert_eq!(state.remaining_periods(), 1);
    }
}
