//! Load extraordinary payments from CSV
//!
//! Expected columns: `Period,Amount,Mode,Note` (Mode and Note may be empty).

use super::{ExtraPayment, RecomputeMode};
use csv::{Reader, Trim};
use std::error::Error;
use std::path::Path;

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Period")]
    period: u32,
    #[serde(rename = "Amount")]
    amount: f64,
    #[serde(rename = "Mode", default)]
    mode: Option<String>,
    #[serde(rename = "Note", default)]
    note: Option<String>,
}

impl CsvRow {
    fn to_extra_payment(self) -> Result<ExtraPayment, Box<dyn Error>> {
        let recompute_mode = match self.mode.as_deref().map(str::trim) {
            None | Some("") => RecomputeMode::default(),
            Some(mode) => mode.parse()?,
        };

        let payment = ExtraPayment {
            period: self.period,
            amount: self.amount,
            recompute_mode,
            note: self.note.filter(|n| !n.trim().is_empty()),
        };
        payment.validate()?;
        Ok(payment)
    }
}

fn collect<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<ExtraPayment>, Box<dyn Error>> {
    let mut payments = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        payments.push(row.to_extra_payment()?);
    }

    Ok(payments)
}

/// Load extra payments from a CSV file, in file order
pub fn load_extra_payments<P: AsRef<Path>>(path: P) -> Result<Vec<ExtraPayment>, Box<dyn Error>> {
    let reader = csv::ReaderBuilder::new().trim(Trim::All).from_path(path)?;
    collect(reader)
}

/// Load extra payments from any reader (e.g., string buffer, stdin)
pub fn load_extra_payments_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<ExtraPayment>, Box<dyn Error>> {
    collect(csv::ReaderBuilder::new().trim(Trim::All).from_reader(reader))
}
