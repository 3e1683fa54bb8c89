//! Amortization CLI
//!
//! Builds a French-method schedule from command-line flags or a JSON request
//! file, prints it, and optionally writes CSV/JSON output.

use amortization_system::calendar::{format_date, parse_date, DurationUnit};
use amortization_system::config::{LoanRequest, Term};
use amortization_system::export::{format_thousands, write_csv, write_json};
use amortization_system::payments::load_extra_payments;
use amortization_system::rates::effective_annual;
use amortization_system::{
    DayBasis, ExtraPayment, Frequency, LoanTerms, RateKind, RateSpec, RateTiming, Schedule, ScheduleConfig,
    ScheduleEngine,
};
use anyhow::{anyhow, bail, Context};
use clap::Parser;
use std::path::PathBuf;

/// French-method loan amortization schedules
#[derive(Parser, Debug)]
#[command(name = "amortize", version, about)]
struct Cli {
    /// JSON loan request; when given, the loan flags below are ignored
    #[arg(long)]
    request: Option<PathBuf>,

    /// Loan principal
    #[arg(long)]
    principal: Option<f64>,

    /// Rate value in percent (24.33 means 24.33%)
    #[arg(long)]
    rate: Option<f64>,

    /// nominal or effective
    #[arg(long, default_value = "nominal")]
    rate_kind: RateKind,

    /// Compounding frequency (nominal) or the period the effective rate refers to
    #[arg(long, default_value = "annual")]
    compounding: Frequency,

    /// due or anticipated
    #[arg(long, default_value = "due")]
    timing: RateTiming,

    /// Day basis for daily frequencies (360 or 365)
    #[arg(long, default_value = "360")]
    day_basis: DayBasis,

    /// Payment frequency
    #[arg(long, default_value = "monthly")]
    frequency: Frequency,

    /// Number of installments
    #[arg(long, conflicts_with = "duration")]
    periods: Option<u32>,

    /// Loan duration, in `--unit`s
    #[arg(long, requires = "unit")]
    duration: Option<f64>,

    /// Unit of `--duration` (days, weeks, biweeks, months, bimonths, quarters, semesters, years)
    #[arg(long)]
    unit: Option<DurationUnit>,

    /// Start date (DD/MM/YYYY)
    #[arg(long)]
    start_date: Option<String>,

    /// Extra payment as PERIOD:AMOUNT[:term|installment] (repeatable)
    #[arg(long = "extra")]
    extras: Vec<ExtraPayment>,

    /// CSV file of extra payments (Period,Amount,Mode,Note)
    #[arg(long)]
    extras_file: Option<PathBuf>,

    /// Decimal places for displayed amounts
    #[arg(long, default_value_t = 2)]
    decimals: u32,

    /// Print amounts with thousands separators
    #[arg(long)]
    thousands: bool,

    /// Print only the first N rows
    #[arg(long)]
    preview: Option<usize>,

    /// Write the schedule as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the schedule as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

impl Cli {
    fn loan(&self) -> anyhow::Result<(LoanTerms, ScheduleConfig)> {
        if let Some(path) = &self.request {
            let request = LoanRequest::from_path(path)
                .map_err(|e| anyhow!("{}", e))
                .with_context(|| format!("reading loan request {}", path.display()))?;
            return Ok(request.into_terms()?);
        }

        let principal = self.principal.context("--principal is required without --request")?;
        let value = self.rate.context("--rate is required without --request")?;
        let rate = RateSpec::new(value, self.rate_kind, self.compounding)
            .with_timing(self.timing)
            .with_day_basis(self.day_basis);

        let term = match (self.periods, self.duration, self.unit) {
            (Some(periods), _, _) => Term::Periods { periods },
            (None, Some(quantity), Some(unit)) => Term::Duration { quantity, unit },
            _ => bail!("either --periods or --duration with --unit is required"),
        };

        let mut extra_payments = self.extras.clone();
        if let Some(path) = &self.extras_file {
            let loaded = load_extra_payments(path)
                .map_err(|e| anyhow!("{}", e))
                .with_context(|| format!("reading extra payments {}", path.display()))?;
            extra_payments.extend(loaded);
        }

        let terms = LoanTerms {
            principal,
            rate,
            payment_frequency: self.frequency,
            term_periods: term.periods(self.frequency, &rate)?,
            start_date: self.start_date.as_deref().map(parse_date).transpose()?,
            extra_payments,
        };
        let config = ScheduleConfig {
            rounding_decimals: self.decimals,
        };
        Ok((terms, config))
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let (terms, config) = cli.loan()?;
    let decimals = config.rounding_decimals as usize;
    let schedule = ScheduleEngine::new(config).build_schedule(&terms)?;

    let ea = effective_annual(schedule.periodic_rate, terms.payment_frequency, terms.rate.day_basis);
    println!("Rate: {}", terms.rate);
    println!(
        "Periodic rate ({}) = {:.6}% | Effective annual = {:.6}%",
        terms.payment_frequency,
        schedule.periodic_rate * 100.0,
        ea * 100.0
    );
    println!("Term: {} installments ({})\n", terms.term_periods, terms.payment_frequency);

    print_table(&schedule, cli.preview, cli.thousands, decimals);

    let amount = |v: f64| {
        if cli.thousands {
            format_thousands(v, decimals)
        } else {
            format!("{:.*}", decimals, v)
        }
    };
    let summary = schedule.summary();
    println!("\nSummary:");
    println!("  Periods: {}", summary.total_periods);
    println!("  Interest: {}", amount(summary.total_interest));
    println!("  Extra payments: {}", amount(summary.total_extra_payments));
    println!("  Total paid: {}", amount(summary.total_paid));

    if let Some(path) = &cli.csv {
        write_csv(&schedule, path)
            .map_err(|e| anyhow!("{}", e))
            .with_context(|| format!("writing {}", path.display()))?;
        println!("\nCSV written to: {}", path.display());
    }
    if let Some(path) = &cli.json {
        write_json(&schedule, path)
            .map_err(|e| anyhow!("{}", e))
            .with_context(|| format!("writing {}", path.display()))?;
        println!("JSON written to: {}", path.display());
    }

    Ok(())
}

fn print_table(schedule: &Schedule, preview: Option<usize>, thousands: bool, decimals: usize) {
    let fmt = |v: f64| {
        if thousands {
            format_thousands(v, decimals)
        } else {
            format!("{:.*}", decimals, v)
        }
    };

    println!(
        "{:>6} {:>10} {:>16} {:>16} {:>16} {:>16} {:>16}",
        "Period", "Date", "Installment", "Interest", "Principal", "Extra", "Balance"
    );
    println!("{}", "-".repeat(104));

    let limit = preview.unwrap_or(schedule.len());
    for row in schedule.rows.iter().take(limit) {
        println!(
            "{:>6} {:>10} {:>16} {:>16} {:>16} {:>16} {:>16}",
            row.period,
            row.date.map(format_date).unwrap_or_default(),
            fmt(row.installment),
            fmt(row.interest),
            fmt(row.principal_portion),
            fmt(row.extra_payment_total),
            fmt(row.closing_balance),
        );
    }

    if schedule.len() > limit {
        println!("... ({} more periods)", schedule.len() - limit);
    }
}
