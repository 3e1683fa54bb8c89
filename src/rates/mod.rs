//! Interest rate specification and normalization to the payment period

mod frequency;
mod spec;
mod normalize;

pub use frequency::{periods_per_year, DayBasis, Frequency};
pub use spec::{RateKind, RateSpec, RateTiming};
pub use normalize::{
    anticipated_to_due, due_to_anticipated, effective_annual, effective_equivalent, normalize,
    nominal_to_effective_periodic,
};
