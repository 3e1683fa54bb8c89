//! Extraordinary payment records

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{AmortizationError, Result};

/// What the schedule re-plans after an extraordinary payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecomputeMode {
    /// Keep the installment, finish earlier
    #[default]
    ShortenTerm,
    /// Keep the term, lower the installment
    RecomputeInstallment,
}

impl FromStr for RecomputeMode {
    type Err = AmortizationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shorten_term" | "term" => Ok(RecomputeMode::ShortenTerm),
            "recompute_installment" | "installment" => Ok(RecomputeMode::RecomputeInstallment),
            other => Err(AmortizationError::invalid_input(
                "recompute_mode",
                format!("expected shorten_term or recompute_installment, got '{}'", other),
            )),
        }
    }
}

impl fmt::Display for RecomputeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecomputeMode::ShortenTerm => f.write_str("shorten_term"),
            RecomputeMode::RecomputeInstallment => f.write_str("recompute_installment"),
        }
    }
}

/// An out-of-schedule principal payment applied on top of the installment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraPayment {
    /// Period (1-indexed) the payment is applied in
    pub period: u32,

    /// Amount paid; capped at the outstanding balance when applied
    pub amount: f64,

    #[serde(default)]
    pub recompute_mode: RecomputeMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ExtraPayment {
    pub fn new(period: u32, amount: f64, recompute_mode: RecomputeMode) -> Self {
        Self {
            period,
            amount,
            recompute_mode,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.period == 0 {
            return Err(AmortizationError::invalid_input(
                "extra_payment.period",
                "periods are 1-indexed",
            ));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(AmortizationError::invalid_input(
                "extra_payment.amount",
                format!("must be a positive amount, got {}", self.amount),
            ));
        }
        Ok(())
    }
}

/// Parses `PERIOD:AMOUNT[:MODE]`, e.g. `6:200000:installment`
impl FromStr for ExtraPayment {
    type Err = AmortizationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let period = parts
            .next()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .ok_or_else(|| AmortizationError::invalid_input("extra_payment", format!("bad period in '{}'", s)))?;
        let amount = parts
            .next()
            .and_then(|a| a.trim().parse::<f64>().ok())
            .ok_or_else(|| AmortizationError::invalid_input("extra_payment", format!("bad amount in '{}'", s)))?;
        let recompute_mode = match parts.next() {
            Some(mode) => mode.parse()?,
            None => RecomputeMode::default(),
        };
        if parts.next().is_some() {
            return Err(AmortizationError::invalid_input(
                "extra_payment",
                format!("expected PERIOD:AMOUNT[:MODE], got '{}'", s),
            ));
        }
        Ok(ExtraPayment::new(period, amount, recompute_mode))
    }
}

/// Extra payments grouped by period, keeping supplied order within a period
pub(crate) fn index_by_period(payments: &[ExtraPayment]) -> BTreeMap<u32, Vec<&ExtraPayment>> {
    let mut index: BTreeMap<u32, Vec<&ExtraPayment>> = BTreeMap::new();
    for payment in payments {
        index.entry(payment.period).or_default().push(payment);
    }
    index
}
