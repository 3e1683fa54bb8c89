//! Payment dates and term conversion for a payment frequency

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AmortizationError, Result};
use crate::rates::{periods_per_year, DayBasis, Frequency};

/// Display and input format for dates (DD/MM/YYYY)
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Highest day-of-month used for month-stepped payment dates
const MAX_PAYMENT_DAY: u32 = 28;

/// Unit of a loan duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    Days,
    Weeks,
    Biweeks,
    Months,
    Bimonths,
    Quarters,
    Semesters,
    Years,
}

impl DurationUnit {
    /// The frequency whose period this unit measures
    pub fn frequency(&self) -> Frequency {
        match self {
            DurationUnit::Days => Frequency::Daily,
            DurationUnit::Weeks => Frequency::Weekly,
            DurationUnit::Biweeks => Frequency::Biweekly,
            DurationUnit::Months => Frequency::Monthly,
            DurationUnit::Bimonths => Frequency::Bimonthly,
            DurationUnit::Quarters => Frequency::Quarterly,
            DurationUnit::Semesters => Frequency::Semiannual,
            DurationUnit::Years => Frequency::Annual,
        }
    }
}

impl FromStr for DurationUnit {
    type Err = AmortizationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "days" => Ok(DurationUnit::Days),
            "weeks" => Ok(DurationUnit::Weeks),
            "biweeks" => Ok(DurationUnit::Biweeks),
            "months" => Ok(DurationUnit::Months),
            "bimonths" => Ok(DurationUnit::Bimonths),
            "quarters" => Ok(DurationUnit::Quarters),
            "semesters" => Ok(DurationUnit::Semesters),
            "years" => Ok(DurationUnit::Years),
            other => Err(AmortizationError::invalid_input(
                "duration_unit",
                format!("unknown unit '{}'", other),
            )),
        }
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DurationUnit::Days => "days",
            DurationUnit::Weeks => "weeks",
            DurationUnit::Biweeks => "biweeks",
            DurationUnit::Months => "months",
            DurationUnit::Bimonths => "bimonths",
            DurationUnit::Quarters => "quarters",
            DurationUnit::Semesters => "semesters",
            DurationUnit::Years => "years",
        };
        f.write_str(name)
    }
}

/// Number of payment periods covering `quantity` units, never less than one
///
/// `day_basis` sets how many days make a year, both for the `Days` unit and
/// for daily payments.
pub fn periods_for_duration(
    payment_frequency: Frequency,
    day_basis: DayBasis,
    quantity: f64,
    unit: DurationUnit,
) -> Result<u32> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(AmortizationError::invalid_input(
            "duration",
            format!("must be a positive quantity, got {}", quantity),
        ));
    }

    let per_year_payment = periods_per_year(payment_frequency, day_basis);
    let per_year_unit = periods_per_year(unit.frequency(), day_basis);
    let periods = ((quantity / per_year_unit) * per_year_payment).round();

    if periods > u32::MAX as f64 {
        return Err(AmortizationError::invalid_input(
            "duration",
            format!("{} {} is too long", quantity, unit),
        ));
    }
    Ok((periods as u32).max(1))
}

/// Date of the `period`-th payment counted from `start`
///
/// Month-based frequencies step calendar months and pin the day at 28 or
/// earlier; daily, weekly and biweekly step 1, 7 and 15 days.
pub fn payment_date(start: NaiveDate, frequency: Frequency, period: u32) -> Result<NaiveDate> {
    let stepped = match (frequency.months_per_period(), frequency.days_per_period()) {
        (Some(months), _) => {
            let day = start.day().min(MAX_PAYMENT_DAY);
            months.checked_mul(period).and_then(|total| {
                start
                    .with_day(day)
                    .and_then(|anchor| anchor.checked_add_months(Months::new(total)))
            })
        }
        (None, Some(days)) => start.checked_add_days(Days::new(days * period as u64)),
        (None, None) => None,
    };

    stepped.ok_or_else(|| {
        AmortizationError::invalid_input(
            "start_date",
            format!("payment {} from {} is outside the supported calendar", period, start),
        )
    })
}

/// Parse a DD/MM/YYYY date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|e| {
        AmortizationError::invalid_input("date", format!("'{}' is not DD/MM/YYYY: {}", s, e))
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_periods_for_duration() {
        let n = periods_for_duration(Frequency::Monthly, DayBasis::Days360, 1.0, DurationUnit::Years).unwrap();
        assert_eq!(n, 12);

        let n = periods_for_duration(Frequency::Quarterly, DayBasis::Days360, 18.0, DurationUnit::Months).unwrap();
        assert_eq!(n, 6);

        let n = periods_for_duration(Frequency::Daily, DayBasis::Days365, 2.0, DurationUnit::Years).unwrap();
        assert_eq!(n, 730);

        let n = periods_for_duration(Frequency::Monthly, DayBasis::Days360, 90.0, DurationUnit::Days).unwrap();
        assert_eq!(n, 3);
    }

    #[test]
    fn test_periods_for_duration_floor_of_one() {
        let n = periods_for_duration(Frequency::Annual, DayBasis::Days360, 1.0, DurationUnit::Weeks).unwrap();
        assert_eq!(n, 1);
        assert!(periods_for_duration(Frequency::Annual, DayBasis::Days360, 0.0, DurationUnit::Weeks).is_err());
    }

    #[test]
    fn test_month_stepping_caps_day() {
        let start = date(2025, 1, 31);
        assert_eq!(payment_date(start, Frequency::Monthly, 1).unwrap(), date(2025, 2, 28));
        assert_eq!(payment_date(start, Frequency::Monthly, 12).unwrap(), date(2026, 1, 28));
        assert_eq!(payment_date(start, Frequency::Quarterly, 2).unwrap(), date(2025, 7, 28));
        assert_eq!(payment_date(start, Frequency::Annual, 3).unwrap(), date(2028, 1, 28));
    }

    #[test]
    fn test_month_stepping_keeps_early_day() {
        let start = date(2025, 11, 15);
        assert_eq!(payment_date(start, Frequency::Bimonthly, 1).unwrap(), date(2026, 1, 15));
        assert_eq!(payment_date(start, Frequency::Semiannual, 1).unwrap(), date(2026, 5, 15));
    }

    #[test]
    fn test_day_stepping() {
        let start = date(2025, 1, 1);
        assert_eq!(payment_date(start, Frequency::Daily, 31).unwrap(), date(2025, 2, 1));
        assert_eq!(payment_date(start, Frequency::Weekly, 2).unwrap(), date(2025, 1, 15));
        assert_eq!(payment_date(start, Frequency::Biweekly, 2).unwrap(), date(2025, 1, 31));
    }

    #[test]
    fn test_far_periods_are_rejected() {
        let start = date(2025, 1, 1);
        assert!(matches!(
            payment_date(start, Frequency::Annual, 400_000_000),
            Err(AmortizationError::InvalidInput { .. })
        ));
        assert!(payment_date(start, Frequency::Monthly, u32::MAX).is_err());
        assert!(payment_date(start, Frequency::Daily, u32::MAX).is_err());
    }

    #[test]
    fn test_parse_and_format() {
        let d = parse_date("01/03/2025").unwrap();
        assert_eq!(d, date(2025, 3, 1));
        assert_eq!(format_date(d), "01/03/2025");
        assert!(parse_date("2025-03-01").is_err());
    }
}
