//! Schedule export to CSV and JSON

use serde::Serialize;
use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::calendar::format_date;
use crate::schedule::{Schedule, ScheduleRow};

/// CSV layout of one schedule row
#[derive(Debug, Serialize)]
struct CsvRow {
    #[serde(rename = "Period")]
    period: u32,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Installment")]
    installment: f64,
    #[serde(rename = "Interest")]
    interest: f64,
    #[serde(rename = "Principal")]
    principal: f64,
    #[serde(rename = "ExtraPayment")]
    extra_payment: f64,
    #[serde(rename = "Balance")]
    balance: f64,
}

impl From<&ScheduleRow> for CsvRow {
    fn from(row: &ScheduleRow) -> Self {
        Self {
            period: row.period,
            date: row.date.map(format_date).unwrap_or_default(),
            installment: row.installment,
            interest: row.interest,
            principal: row.principal_portion,
            extra_payment: row.extra_payment_total,
            balance: row.closing_balance,
        }
    }
}

/// Write the schedule rows as CSV to any writer
pub fn write_csv_to<W: Write>(schedule: &Schedule, writer: W) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in &schedule.rows {
        wtr.serialize(CsvRow::from(row))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv<P: AsRef<Path>>(schedule: &Schedule, path: P) -> Result<(), Box<dyn Error>> {
    write_csv_to(schedule, BufWriter::new(File::create(path)?))
}

/// Write the whole schedule (inputs, rate and rows) as pretty JSON
pub fn write_json_to<W: Write>(schedule: &Schedule, writer: W) -> Result<(), Box<dyn Error>> {
    serde_json::to_writer_pretty(writer, schedule)?;
    Ok(())
}

pub fn write_json<P: AsRef<Path>>(schedule: &Schedule, path: P) -> Result<(), Box<dyn Error>> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_json_to(schedule, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Format with `,` thousands separators and a fixed number of decimals
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}
