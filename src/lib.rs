//! Amortization System - French-method (constant installment) loan schedules
//!
//! This library provides:
//! - Rate normalization across nominal/effective, due/anticipated and any payment frequency
//! - Level installment calculation
//! - Schedule generation with extraordinary payments that shorten the term or lower the installment
//! - Payment dates, duration conversion, and CSV/JSON export

pub mod error;
pub mod rates;
pub mod payments;
pub mod schedule;
pub mod calendar;
pub mod config;
pub mod export;

// Re-export commonly used types
pub use error::{AmortizationError, Result};
pub use rates::{normalize, DayBasis, Frequency, RateKind, RateSpec, RateTiming};
pub use payments::{ExtraPayment, RecomputeMode};
pub use schedule::{build_schedule, installment, LoanTerms, Schedule, ScheduleConfig, ScheduleEngine, ScheduleRow};
pub use config::LoanRequest;
