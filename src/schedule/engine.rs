//! Period-by-period French amortization with extraordinary payments

use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::installment::installment;
use super::rows::{Replanning, Schedule, ScheduleRow};
use super::state::{AmortizationState, BALANCE_EPSILON};
use crate::calendar::payment_date;
use crate::error::{AmortizationError, Result};
use crate::payments::{index_by_period, ExtraPayment, RecomputeMode};
use crate::rates::{normalize, Frequency, RateSpec};

/// Cap on periods simulated when re-deriving a shortened term
pub const SIMULATION_CAP: u32 = 10_000;

/// Last closing balance within this distance of zero is shown as zero
pub const CLOSING_TOLERANCE: f64 = 0.01;

pub const DEFAULT_ROUNDING_DECIMALS: u32 = 2;

/// Everything that defines one loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: f64,
    pub rate: RateSpec,
    pub payment_frequency: Frequency,

    /// Number of payment periods
    pub term_periods: u32,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub extra_payments: Vec<ExtraPayment>,
}

impl LoanTerms {
    pub fn new(principal: f64, rate: RateSpec, payment_frequency: Frequency, term_periods: u32) -> Self {
        Self {
            principal,
            rate,
            payment_frequency,
            term_periods,
            start_date: None,
            extra_payments: Vec::new(),
        }
    }

    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    pub fn with_extra_payment(mut self, payment: ExtraPayment) -> Self {
        self.extra_payments.push(payment);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_finite() || self.principal <= 0.0 {
            return Err(AmortizationError::invalid_input(
                "principal",
                format!("must be a positive amount, got {}", self.principal),
            ));
        }
        if !self.rate.value.is_finite() {
            return Err(AmortizationError::invalid_input(
                "rate.value",
                format!("must be finite, got {}", self.rate.value),
            ));
        }
        if self.term_periods == 0 {
            return Err(AmortizationError::invalid_input("term_periods", "must be > 0"));
        }
        for payment in &self.extra_payments {
            payment.validate()?;
        }
        Ok(())
    }
}

/// Configuration for schedule generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Decimal places for the displayed monetary fields
    pub rounding_decimals: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            rounding_decimals: DEFAULT_ROUNDING_DECIMALS,
        }
    }
}

/// Main schedule engine
#[derive(Debug, Clone, Default)]
pub struct ScheduleEngine {
    config: ScheduleConfig,
}

impl ScheduleEngine {
    pub fn new(config: ScheduleConfig) -> Self {
        Self { config }
    }

    /// Build the full amortization schedule for a loan
    pub fn build_schedule(&self, terms: &LoanTerms) -> Result<Schedule> {
        terms.validate()?;

        let periodic_rate = normalize(&terms.rate, terms.payment_frequency);
        let initial_installment = installment(terms.principal, periodic_rate, terms.term_periods)?;
        let extras = index_by_period(&terms.extra_payments);

        debug!(
            "Building schedule: principal={} rate=[{}] periodic_rate={} installment={} term={}",
            terms.principal, terms.rate, periodic_rate, initial_installment, terms.term_periods
        );

        let mut schedule = Schedule::new(
            terms.principal,
            terms.rate,
            terms.payment_frequency,
            terms.term_periods,
            periodic_rate,
            initial_installment,
        );
        let mut state = AmortizationState::new(terms.principal, initial_installment, terms.term_periods);

        while state.is_open() {
            state.advance_period();
            let row = self.calculate_period(terms, periodic_rate, &extras, &mut state)?;
            schedule.add_row(row);
        }

        if state.balance > BALANCE_EPSILON {
            return Err(AmortizationError::NonConvergence {
                periods: state.period,
                balance: state.balance,
            });
        }

        schedule.close_residual(CLOSING_TOLERANCE);
        warn_unapplied(&extras, state.period);

        info!(
            "Schedule built: {} periods (requested {}), installment {:.2}",
            schedule.len(),
            terms.term_periods,
            initial_installment
        );

        Ok(schedule)
    }

    /// Run one period: interest, installment, extra payments and re-planning
    fn calculate_period(
        &self,
        terms: &LoanTerms,
        periodic_rate: f64,
        extras: &BTreeMap<u32, Vec<&ExtraPayment>>,
        state: &mut AmortizationState,
    ) -> Result<ScheduleRow> {
        let period = state.period;
        let interest = state.balance * periodic_rate;
        let principal_portion = state.installment - interest;

        if principal_portion.is_nan() || principal_portion <= 0.0 {
            return Err(AmortizationError::InfeasibleAmortization {
                period,
                installment: state.installment,
                interest,
            });
        }

        // re-planning may replace state.installment; the row keeps what this period paid
        let paid_installment = state.installment;
        let mut balance = (state.balance - principal_portion).max(0.0);
        let mut extra_total = 0.0;
        let mut replanning = Replanning::Unchanged;

        if let Some(entries) = extras.get(&period) {
            if balance > 0.0 {
                for entry in entries {
                    let applied = entry.amount.min(balance);
                    balance -= applied;
                    extra_total += applied;
                }

                if balance > 0.0 {
                    let recompute = entries
                        .iter()
                        .any(|e| e.recompute_mode == RecomputeMode::RecomputeInstallment);
                    replanning = if recompute {
                        recompute_installment(state, balance, periodic_rate)?
                    } else {
                        shorten_term(state, balance, periodic_rate)?
                    };
                    debug!("Period {}: extra {} applied, {:?}", period, extra_total, replanning);
                }
            }
        }

        state.balance = balance;

        let date = match terms.start_date {
            Some(start) => Some(payment_date(start, terms.payment_frequency, period)?),
            None => None,
        };

        let decimals = self.config.rounding_decimals;
        Ok(ScheduleRow {
            period,
            date,
            installment: round_to(paid_installment, decimals),
            interest: round_to(interest, decimals),
            principal_portion: round_to(principal_portion, decimals),
            extra_payment_total: round_to(extra_total, decimals),
            closing_balance: round_to(balance, decimals),
            replanning,
        })
    }
}

/// Keep the term, spread `balance` over the periods left in the plan
fn recompute_installment(state: &mut AmortizationState, balance: f64, periodic_rate: f64) -> Result<Replanning> {
    state.installment = installment(balance, periodic_rate, state.remaining_periods())?;
    Ok(Replanning::InstallmentRecomputed {
        installment: state.installment,
    })
}

/// Keep the installment and re-derive the planned term by simulation
///
/// Falls back to recomputing the installment over the remaining periods when
/// the kept installment cannot cover interest at some simulated step.
fn shorten_term(state: &mut AmortizationState, balance: f64, periodic_rate: f64) -> Result<Replanning> {
    match periods_to_close(balance, state.installment, periodic_rate) {
        Some(periods) => {
            state.planned_term = state.period.saturating_add(periods);
            Ok(Replanning::TermShortened {
                planned_term: state.planned_term,
            })
        }
        None => {
            let remaining = state.remaining_periods();
            state.installment = installment(balance, periodic_rate, remaining)?;
            state.planned_term = state.period.saturating_add(remaining);
            Ok(Replanning::FallbackRecomputed {
                installment: state.installment,
                planned_term: state.planned_term,
            })
        }
    }
}

/// Periods a fixed installment needs to repay `balance`, capped at
/// [`SIMULATION_CAP`]; `None` when the installment stops covering interest
pub fn periods_to_close(balance: f64, fixed_installment: f64, periodic_rate: f64) -> Option<u32> {
    let mut remaining = balance;
    let mut periods = 0;

    while remaining > BALANCE_EPSILON && periods < SIMULATION_CAP {
        periods += 1;
        let principal_portion = fixed_installment - remaining * periodic_rate;
        if principal_portion.is_nan() || principal_portion <= 0.0 {
            return None;
        }
        remaining -= principal_portion;
    }

    Some(periods)
}

fn warn_unapplied(extras: &BTreeMap<u32, Vec<&ExtraPayment>>, last_period: u32) {
    for (period, entries) in extras.range(last_period.saturating_add(1)..) {
        warn!(
            "{} extra payment(s) for period {} not applied: schedule ended at period {}",
            entries.len(),
            period,
            last_period
        );
    }
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if decimals > 15 {
        return value;
    }
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Build a schedule from loose parameters with the given display rounding
pub fn build_schedule(
    principal: f64,
    rate: &RateSpec,
    payment_frequency: Frequency,
    term_periods: u32,
    start_date: Option<NaiveDate>,
    extra_payments: &[ExtraPayment],
    rounding_decimals: u32,
) -> Result<Schedule> {
    let terms = LoanTerms {
        principal,
        rate: *rate,
        payment_frequency,
        term_periods,
        start_date,
        extra_payments: extra_payments.to_vec(),
    };
    ScheduleEngine::new(ScheduleConfig { rounding_decimals }).build_schedule(&terms)
}
