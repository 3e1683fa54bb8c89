//! Loan request configuration loaded from JSON
//!
//! ```json
//! {
//!   "principal": 1000000,
//!   "rate": { "value": 24.0, "kind": "nominal", "compounding": "monthly" },
//!   "payment_frequency": "monthly",
//!   "term": { "quantity": 1, "unit": "years" },
//!   "start_date": "01/01/2025",
//!   "extra_payments": [ { "period": 6, "amount": 200000, "recompute_mode": "recompute_installment" } ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::calendar::{parse_date, periods_for_duration, DurationUnit};
use crate::error::Result;
use crate::payments::ExtraPayment;
use crate::rates::{Frequency, RateSpec};
use crate::schedule::{LoanTerms, ScheduleConfig, DEFAULT_ROUNDING_DECIMALS};

/// Loan term, either as a period count or as a duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Term {
    Periods { periods: u32 },
    Duration { quantity: f64, unit: DurationUnit },
}

impl Term {
    /// Period count for the given payment frequency; durations use the rate's day basis
    pub fn periods(&self, payment_frequency: Frequency, rate: &RateSpec) -> Result<u32> {
        match self {
            Term::Periods { periods } => Ok(*periods),
            Term::Duration { quantity, unit } => {
                periods_for_duration(payment_frequency, rate.day_basis, *quantity, *unit)
            }
        }
    }
}

/// Input request for one schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRequest {
    pub principal: f64,

    pub rate: RateSpec,

    pub payment_frequency: Frequency,

    pub term: Term,

    /// First date as DD/MM/YYYY; payment dates are omitted when absent
    #[serde(default)]
    pub start_date: Option<String>,

    #[serde(default)]
    pub extra_payments: Vec<ExtraPayment>,

    /// Decimal places for displayed amounts (default: 2)
    #[serde(default = "default_rounding_decimals")]
    pub rounding_decimals: u32,
}

fn default_rounding_decimals() -> u32 {
    DEFAULT_ROUNDING_DECIMALS
}

impl LoanRequest {
    /// Load a request from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::result::Result<Self, Box<dyn Error>> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, Box<dyn Error>> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolve the term and start date into engine inputs
    pub fn into_terms(self) -> Result<(LoanTerms, ScheduleConfig)> {
        let term_periods = self.term.periods(self.payment_frequency, &self.rate)?;
        let start_date = self.start_date.as_deref().map(parse_date).transpose()?;

        let terms = LoanTerms {
            principal: self.principal,
            rate: self.rate,
            payment_frequency: self.payment_frequency,
            term_periods,
            start_date,
            extra_payments: self.extra_payments,
        };
        let config = ScheduleConfig {
            rounding_decimals: self.rounding_decimals,
        };
        Ok((terms, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::RecomputeMode;
    use crate::rates::{DayBasis, RateKind, RateTiming};
    use chrono::NaiveDate;

    #[test]
    fn test_request_with_duration_and_defaults() {
        let request = LoanRequest::from_json(
            r#"{
                "principal": 1000000,
                "rate": { "value": 24.0, "kind": "nominal", "compounding": "monthly" },
                "payment_frequency": "monthly",
                "term": { "quantity": 1, "unit": "years" },
                "start_date": "01/01/2025",
                "extra_payments": [ { "period": 6, "amount": 200000 } ]
            }"#,
        )
        .expect("valid request");

        assert_eq!(request.rounding_decimals, 2);
        assert_eq!(request.rate.kind, RateKind::Nominal);
        assert_eq!(request.rate.timing, RateTiming::Due);

        let (terms, config) = request.into_terms().unwrap();
        assert_eq!(terms.term_periods, 12);
        assert_eq!(terms.start_date, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(terms.extra_payments[0].recompute_mode, RecomputeMode::ShortenTerm);
        assert_eq!(config.rounding_decimals, 2);
    }

    #[test]
    fn test_request_with_periods() {
        let request = LoanRequest::from_json(
            r#"{
                "principal": 5000,
                "rate": { "value": 0.05, "kind": "effective", "compounding": "daily",
                          "timing": "anticipated", "day_basis": 365 },
                "payment_frequency": "weekly",
                "term": { "periods": 20 },
                "rounding_decimals": 4
            }"#,
        )
        .unwrap();

        assert_eq!(request.rate.day_basis, DayBasis::Days365);
        let (terms, config) = request.into_terms().unwrap();
        assert_eq!(terms.term_periods, 20);
        assert!(terms.start_date.is_none());
        assert_eq!(config.rounding_decimals, 4);
    }

    #[test]
    fn test_bad_start_date() {
        let request = LoanRequest::from_json(
            r#"{
                "principal": 5000,
                "rate": { "value": 12, "kind": "nominal", "compounding": "annual" },
                "payment_frequency": "monthly",
                "term": { "periods": 6 },
                "start_date": "2025-01-01"
            }"#,
        )
        .unwrap();
        assert!(request.into_terms().is_err());
    }
}
