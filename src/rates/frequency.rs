//! Payment and compounding frequencies with their periods-per-year table

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AmortizationError;

/// Frequency of payments, compounding, or the period a stated rate refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    /// Twice a month (24 periods per year, 15-day date steps)
    Biweekly,
    Monthly,
    Bimonthly,
    Quarterly,
    Semiannual,
    Annual,
}

impl Frequency {
    pub const ALL: [Frequency; 8] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Biweekly,
        Frequency::Monthly,
        Frequency::Bimonthly,
        Frequency::Quarterly,
        Frequency::Semiannual,
        Frequency::Annual,
    ];

    /// Periods per year; the daily count follows the day basis
    pub fn periods_per_year(&self, day_basis: DayBasis) -> f64 {
        match self {
            Frequency::Daily => day_basis.days() as f64,
            Frequency::Weekly => 52.0,
            Frequency::Biweekly => 24.0,
            Frequency::Monthly => 12.0,
            Frequency::Bimonthly => 6.0,
            Frequency::Quarterly => 4.0,
            Frequency::Semiannual => 2.0,
            Frequency::Annual => 1.0,
        }
    }

    /// Calendar months per period, for month-based frequencies only
    pub fn months_per_period(&self) -> Option<u32> {
        match self {
            Frequency::Monthly => Some(1),
            Frequency::Bimonthly => Some(2),
            Frequency::Quarterly => Some(3),
            Frequency::Semiannual => Some(6),
            Frequency::Annual => Some(12),
            Frequency::Daily | Frequency::Weekly | Frequency::Biweekly => None,
        }
    }

    /// Days per period for the day-count frequencies
    pub fn days_per_period(&self) -> Option<u64> {
        match self {
            Frequency::Daily => Some(1),
            Frequency::Weekly => Some(7),
            Frequency::Biweekly => Some(15),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Bimonthly => "bimonthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Semiannual => "semiannual",
            Frequency::Annual => "annual",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = AmortizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Frequency::ALL
            .iter()
            .copied()
            .find(|freq| freq.as_str() == normalized)
            .ok_or_else(|| {
                AmortizationError::invalid_input("frequency", format!("unknown frequency '{}'", s))
            })
    }
}

/// Day-count basis used to rescale the daily frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum DayBasis {
    #[default]
    Days360,
    Days365,
}

impl DayBasis {
    pub fn days(&self) -> u16 {
        match self {
            DayBasis::Days360 => 360,
            DayBasis::Days365 => 365,
        }
    }
}

impl TryFrom<u16> for DayBasis {
    type Error = AmortizationError;

    fn try_from(days: u16) -> Result<Self, Self::Error> {
        match days {
            360 => Ok(DayBasis::Days360),
            365 => Ok(DayBasis::Days365),
            other => Err(AmortizationError::invalid_input(
                "day_basis",
                format!("expected 360 or 365, got {}", other),
            )),
        }
    }
}

impl From<DayBasis> for u16 {
    fn from(basis: DayBasis) -> u16 {
        basis.days()
    }
}

impl FromStr for DayBasis {
    type Err = AmortizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let days: u16 = s.trim().parse().map_err(|_| {
            AmortizationError::invalid_input("day_basis", format!("expected 360 or 365, got '{}'", s))
        })?;
        DayBasis::try_from(days)
    }
}

impl fmt::Display for DayBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.days())
    }
}

/// Periods per year for `frequency` under `day_basis`
pub fn periods_per_year(frequency: Frequency, day_basis: DayBasis) -> f64 {
    frequency.periods_per_year(day_basis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_periods_per_year() {
        assert_eq!(periods_per_year(Frequency::Weekly, DayBasis::Days365), 52.0);
        assert_eq!(periods_per_year(Frequency::Biweekly, DayBasis::Days360), 24.0);
        assert_eq!(periods_per_year(Frequency::Monthly, DayBasis::Days360), 12.0);
        assert_eq!(periods_per_year(Frequency::Annual, DayBasis::Days365), 1.0);
    }

    #[test]
    fn test_daily_follows_day_basis() {
        assert_eq!(periods_per_year(Frequency::Daily, DayBasis::Days360), 360.0);
        assert_eq!(periods_per_year(Frequency::Daily, DayBasis::Days365), 365.0);
    }

    #[test]
    fn test_frequency_parsing() {
        assert_eq!("Monthly".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert_eq!(" semiannual ".parse::<Frequency>().unwrap(), Frequency::Semiannual);
        assert!("fortnightly".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_day_basis_serde() {
        let basis: DayBasis = serde_json::from_str("365").unwrap();
        assert_eq!(basis, DayBasis::Days365);
        assert_eq!(serde_json::to_string(&DayBasis::Days360).unwrap(), "360");
        assert!(serde_json::from_str::<DayBasis>("300").is_err());
    }
}
