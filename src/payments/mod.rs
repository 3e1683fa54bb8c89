//! Extraordinary payment data structures and CSV loading

mod data;
pub mod loader;

pub use data::{ExtraPayment, RecomputeMode};
pub(crate) use data::index_by_period;
pub use loader::{load_extra_payments, load_extra_payments_from_reader};
