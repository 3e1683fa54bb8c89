//! Interest rate description and its conventions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::frequency::{DayBasis, Frequency};
use crate::error::AmortizationError;

/// Whether the stated rate is nominal (annual, to be split by compounding) or effective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateKind {
    Nominal,
    Effective,
}

impl FromStr for RateKind {
    type Err = AmortizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nominal" => Ok(RateKind::Nominal),
            "effective" => Ok(RateKind::Effective),
            other => Err(AmortizationError::invalid_input(
                "rate_kind",
                format!("expected nominal or effective, got '{}'", other),
            )),
        }
    }
}

impl fmt::Display for RateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateKind::Nominal => f.write_str("nominal"),
            RateKind::Effective => f.write_str("effective"),
        }
    }
}

/// When interest is charged within the period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateTiming {
    /// Charged at period end
    #[default]
    Due,
    /// Discounted at period start
    Anticipated,
}

impl FromStr for RateTiming {
    type Err = AmortizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "due" => Ok(RateTiming::Due),
            "anticipated" => Ok(RateTiming::Anticipated),
            other => Err(AmortizationError::invalid_input(
                "rate_timing",
                format!("expected due or anticipated, got '{}'", other),
            )),
        }
    }
}

impl fmt::Display for RateTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateTiming::Due => f.write_str("due"),
            RateTiming::Anticipated => f.write_str("anticipated"),
        }
    }
}

/// An interest rate and the convention it is quoted in
///
/// `value` is in percent: 18.0 means 18%.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSpec {
    pub value: f64,

    pub kind: RateKind,

    /// Compounding frequency for nominal rates; the period the rate refers to for effective rates
    pub compounding: Frequency,

    #[serde(default)]
    pub timing: RateTiming,

    #[serde(default)]
    pub day_basis: DayBasis,
}

impl RateSpec {
    /// Rate due at period end on a 360-day basis
    pub fn new(value: f64, kind: RateKind, compounding: Frequency) -> Self {
        Self {
            value,
            kind,
            compounding,
            timing: RateTiming::Due,
            day_basis: DayBasis::Days360,
        }
    }

    pub fn nominal(value: f64, compounding: Frequency) -> Self {
        Self::new(value, RateKind::Nominal, compounding)
    }

    pub fn effective(value: f64, period: Frequency) -> Self {
        Self::new(value, RateKind::Effective, period)
    }

    pub fn with_timing(self, timing: RateTiming) -> Self {
        Self { timing, ..self }
    }

    pub fn with_day_basis(self, day_basis: DayBasis) -> Self {
        Self { day_basis, ..self }
    }

    pub fn as_decimal(&self) -> f64 {
        self.value / 100.0
    }
}

impl fmt::Display for RateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}% {} {} {} (basis {})",
            self.value, self.kind, self.compounding, self.timing, self.day_basis
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_default_to_due_360() {
        let spec = RateSpec::nominal(24.0, Frequency::Monthly);
        assert_eq!(spec.timing, RateTiming::Due);
        assert_eq!(spec.day_basis, DayBasis::Days360);
        assert!((spec.as_decimal() - 0.24).abs() < 1e-12);

        let anticipated = spec.with_timing(RateTiming::Anticipated);
        assert_eq!(anticipated.timing, RateTiming::Anticipated);
        assert_eq!(anticipated.kind, RateKind::Nominal);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let spec: RateSpec = serde_json::from_str(
            r#"{"value": 18.0, "kind": "effective", "compounding": "annual"}"#,
        )
        .unwrap();
        assert_eq!(spec.kind, RateKind::Effective);
        assert_eq!(spec.compounding, Frequency::Annual);
        assert_eq!(spec.timing, RateTiming::Due);
        assert_eq!(spec.day_basis, DayBasis::Days360);
    }
}
