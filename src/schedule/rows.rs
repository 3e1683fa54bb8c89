//! Schedule output structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::rates::{Frequency, RateSpec};

/// Re-planning that took place at a period carrying extra payments
///
/// Between these events the schedule accumulates with a fixed installment
/// and a fixed planned term; each event is one-shot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Replanning {
    #[default]
    Unchanged,
    /// Installment kept, term re-derived by forward simulation
    TermShortened { planned_term: u32 },
    /// Term kept, installment recomputed over the remaining periods
    InstallmentRecomputed { installment: f64 },
    /// The kept installment stopped covering interest while simulating, so the
    /// installment was recomputed over the remaining periods instead
    FallbackRecomputed { installment: f64, planned_term: u32 },
}

impl Replanning {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Replanning::Unchanged)
    }
}

/// One period of the amortization table (monetary values rounded for display)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub period: u32,
    pub date: Option<NaiveDate>,

    /// Installment paid this period
    pub installment: f64,
    pub interest: f64,
    pub principal_portion: f64,
    pub extra_payment_total: f64,
    pub closing_balance: f64,

    #[serde(default, skip_serializing_if = "Replanning::is_unchanged")]
    pub replanning: Replanning,
}

/// Complete amortization schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub principal: f64,
    pub rate: RateSpec,
    pub payment_frequency: Frequency,

    /// Term requested by the caller, in payment periods
    pub term_periods: u32,

    /// Effective due rate per payment period used for every row
    pub periodic_rate: f64,

    /// Installment before any re-planning (unrounded)
    pub initial_installment: f64,

    pub rows: Vec<ScheduleRow>,
}

impl Schedule {
    pub fn new(
        principal: f64,
        rate: RateSpec,
        payment_frequency: Frequency,
        term_periods: u32,
        periodic_rate: f64,
        initial_installment: f64,
    ) -> Self {
        Self {
            principal,
            rate,
            payment_frequency,
            term_periods,
            periodic_rate,
            initial_installment,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: ScheduleRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, period: u32) -> Option<&ScheduleRow> {
        self.rows.iter().find(|r| r.period == period)
    }

    /// Snap a last closing balance within `tolerance` of zero to exactly zero
    pub(crate) fn close_residual(&mut self, tolerance: f64) {
        if let Some(last) = self.rows.last_mut() {
            if last.closing_balance.abs() < tolerance {
                last.closing_balance = 0.0;
            }
        }
    }

    /// Totals over the displayed (rounded) rows
    pub fn summary(&self) -> ScheduleSummary {
        let total_interest: f64 = self.rows.iter().map(|r| r.interest).sum();
        let total_extra_payments: f64 = self.rows.iter().map(|r| r.extra_payment_total).sum();
        let total_installments: f64 = self.rows.iter().map(|r| r.installment).sum();
        let replanning_events = self.rows.iter().filter(|r| !r.replanning.is_unchanged()).count();

        ScheduleSummary {
            total_periods: self.rows.len() as u32,
            total_interest,
            total_extra_payments,
            total_installments,
            total_paid: total_installments + total_extra_payments,
            final_balance: self.rows.last().map(|r| r.closing_balance).unwrap_or(self.principal),
            replanning_events: replanning_events as u32,
        }
    }
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_periods: u32,
    pub total_interest: f64,
    pub total_extra_payments: f64,
    pub total_installments: f64,
    pub total_paid: f64,
    pub final_balance: f64,
    pub replanning_events: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(period: u32, installment: f64, interest: f64, extra: f64, closing: f64) -> ScheduleRow {
        ScheduleRow {
            period,
            date: None,
            installment,
            interest,
            principal_portion: installment - interest,
            extra_payment_total: extra,
            closing_balance: closing,
            replanning: Replanning::Unchanged,
        }
    }

    fn schedule() -> Schedule {
        Schedule::new(
            200.0,
            RateSpec::effective(1.0, Frequency::Monthly),
            Frequency::Monthly,
            2,
            0.01,
            101.5,
        )
    }

    #[test]
    fn test_summary_totals() {
        let mut s = schedule();
        s.add_row(row(1, 101.5, 2.0, 10.0, 90.5));
        s.add_row(row(2, 101.5, 0.91, 0.0, 0.004));

        let summary = s.summary();
        assert_eq!(summary.total_periods, 2);
        assert!((summary.total_interest - 2.91).abs() < 1e-12);
        assert!((summary.total_paid - 213.0).abs() < 1e-12);
        assert_eq!(summary.replanning_events, 0);
    }

    #[test]
    fn test_close_residual() {
        let mut s = schedule();
        s.add_row(row(1, 101.5, 2.0, 0.0, 100.5));
        s.add_row(row(2, 101.5, 1.0, 0.0, 0.004));
        s.close_residual(0.01);
        assert_eq!(s.rows[1].closing_balance, 0.0);

        let mut s = schedule();
        s.add_row(row(1, 101.5, 2.0, 0.0, 0.5));
        s.close_residual(0.01);
        assert_eq!(s.rows[0].closing_balance, 0.5);
    }

    #[test]
    fn test_unchanged_replanning_not_serialized() {
        let value = serde_json::to_value(row(1, 1.0, 0.0, 0.0, 0.0)).unwrap();
        assert!(value.get("replanning").is_none());

        let mut shortened = row(2, 1.0, 0.0, 0.0, 0.0);
        shortened.replanning = Replanning::TermShortened { planned_term: 9 };
        let value = serde_json::to_value(shortened).unwrap();
        assert_eq!(value["replanning"]["event"], "term_shortened");
        assert_eq!(value["replanning"]["planned_term"], 9);
    }
}
