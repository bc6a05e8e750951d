//! RangeFilter: restrict a time-ordered history to an inclusive date interval

pub mod range;

pub use range::{DateRange, RangeFilter};
