//! Rate equivalences: nominal to effective, anticipated to due, and between frequencies
//!
//! Every conversion goes through the annual effective rate:
//! - nominal `j` compounded `m` times a year: `(1 + j/m)^m - 1`
//! - effective `i` per reference period (`p` per year): `(1 + i)^p - 1`
//! - annual effective back to a period with `p_target` per year: `(1 + ea)^(1/p_target) - 1`
//!
//! No guards beyond f64 arithmetic: callers validate rate magnitudes.

use log::warn;

use super::frequency::{periods_per_year, DayBasis, Frequency};
use super::spec::{RateKind, RateSpec, RateTiming};

/// Nominal annual rate `j` (decimal) with `m_comp` compoundings a year to the
/// effective rate per payment period (`p_target` payments a year)
pub fn nominal_to_effective_periodic(j: f64, m_comp: f64, p_target: f64) -> f64 {
    let annual_effective = (1.0 + j / m_comp).powf(m_comp) - 1.0;
    (1.0 + annual_effective).powf(1.0 / p_target) - 1.0
}

/// Effective rate per reference period (`p_ref` per year) to the equivalent
/// effective rate per target period (`p_target` per year)
pub fn effective_equivalent(i_ref: f64, p_ref: f64, p_target: f64) -> f64 {
    let annual_effective = (1.0 + i_ref).powf(p_ref) - 1.0;
    (1.0 + annual_effective).powf(1.0 / p_target) - 1.0
}

/// Anticipated rate per period to the due rate for the same period
pub fn anticipated_to_due(i: f64) -> f64 {
    i / (1.0 - i)
}

/// Due rate per period to the anticipated rate for the same period
pub fn due_to_anticipated(i: f64) -> f64 {
    i / (1.0 + i)
}

/// Effective periodic rate (due convention) matching `payment_frequency`
///
/// The frequency equivalence runs first; an anticipated quote is then
/// resolved to due at the payment-period granularity, not at the quote's own
/// period.
pub fn normalize(spec: &RateSpec, payment_frequency: Frequency) -> f64 {
    let basis = spec.day_basis;
    let p_target = periods_per_year(payment_frequency, basis);
    let p_quote = periods_per_year(spec.compounding, basis);

    let periodic = match spec.kind {
        RateKind::Nominal => nominal_to_effective_periodic(spec.as_decimal(), p_quote, p_target),
        RateKind::Effective => effective_equivalent(spec.as_decimal(), p_quote, p_target),
    };

    match spec.timing {
        RateTiming::Due => periodic,
        RateTiming::Anticipated => {
            if periodic >= 1.0 {
                warn!(
                    "Degenerate anticipated rate: periodic rate {} >= 1 for {} payments ({})",
                    periodic, payment_frequency, spec
                );
            }
            anticipated_to_due(periodic)
        }
    }
}

/// Annual effective rate equivalent to a due periodic rate
pub fn effective_annual(periodic_rate: f64, payment_frequency: Frequency, day_basis: DayBasis) -> f64 {
    (1.0 + periodic_rate).powf(periods_per_year(payment_frequency, day_basis)) - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_nominal_monthly_to_monthly() {
        let spec = RateSpec::nominal(24.0, Frequency::Monthly);
        assert_abs_diff_eq!(normalize(&spec, Frequency::Monthly), 0.02, epsilon = 1e-6);
    }

    #[test]
    fn test_effective_annual_to_quarterly() {
        // 26.824% EA is 2% monthly compounded, so one quarter is 1.02^3 - 1
        let spec = RateSpec::effective(26.824, Frequency::Annual);
        let quarterly = normalize(&spec, Frequency::Quarterly);
        assert_abs_diff_eq!(quarterly, 1.02_f64.powi(3) - 1.0, epsilon = 1e-6);
        assert!((quarterly - 0.06).abs() < 2e-3);
    }

    #[test]
    fn test_effective_annual_round_trip() {
        let spec = RateSpec::effective(12.0, Frequency::Annual);
        let monthly = normalize(&spec, Frequency::Monthly);
        assert_abs_diff_eq!(
            effective_annual(monthly, Frequency::Monthly, DayBasis::Days360),
            0.12,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_anticipated_monthly() {
        let spec = RateSpec::effective(2.0, Frequency::Monthly).with_timing(RateTiming::Anticipated);
        assert_abs_diff_eq!(
            normalize(&spec, Frequency::Monthly),
            0.02 / (1.0 - 0.02),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_anticipated_resolved_at_payment_period() {
        // 12% anticipated quarterly equivalent, paid monthly: convert frequency first
        let spec = RateSpec::effective(12.0, Frequency::Quarterly).with_timing(RateTiming::Anticipated);
        let monthly_equivalent = 1.12_f64.powf(1.0 / 3.0) - 1.0;
        assert_abs_diff_eq!(
            normalize(&spec, Frequency::Monthly),
            monthly_equivalent / (1.0 - monthly_equivalent),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_daily_basis_changes_rate() {
        let spec_360 = RateSpec::nominal(18.0, Frequency::Daily);
        let spec_365 = spec_360.with_day_basis(DayBasis::Days365);
        let r360 = normalize(&spec_360, Frequency::Daily);
        let r365 = normalize(&spec_365, Frequency::Daily);
        assert_abs_diff_eq!(r360, 0.18 / 360.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r365, 0.18 / 365.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_rate() {
        for kind in [RateKind::Nominal, RateKind::Effective] {
            for timing in [RateTiming::Due, RateTiming::Anticipated] {
                let spec = RateSpec::new(0.0, kind, Frequency::Annual).with_timing(timing);
                assert_eq!(normalize(&spec, Frequency::Weekly), 0.0);
            }
        }
    }

    #[test]
    fn test_due_anticipated_inverse() {
        let i = 0.035;
        assert_abs_diff_eq!(anticipated_to_due(due_to_anticipated(i)), i, epsilon = 1e-15);
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let spec = RateSpec::nominal(31.7, Frequency::Quarterly).with_timing(RateTiming::Anticipated);
        let a = normalize(&spec, Frequency::Biweekly);
        let b = normalize(&spec, Frequency::Biweekly);
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
