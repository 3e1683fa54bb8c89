//! Amortization schedule generation

mod state;
mod installment;
mod rows;
mod engine;

pub use state::{AmortizationState, BALANCE_EPSILON, ITERATION_HEADROOM};
pub use installment::installment;
pub use rows::{Replanning, Schedule, ScheduleRow, ScheduleSummary};
pub use engine::{
    build_schedule, periods_to_close, round_to, LoanTerms, ScheduleConfig, ScheduleEngine,
    CLOSING_TOLERANCE, DEFAULT_ROUNDING_DECIMALS, SIMULATION_CAP,
};
