//! Derived values for the morning summary
//!
//! - clock: sunrise/sunset rendering at a fixed offset
//! - day_filter: today's slice of an hourly series
//! - extremes: high/low reduction over that slice

pub mod clock;
pub mod day_filter;
pub mod extremes;

pub use clock::{ClockPolicy, TimeFormatter};
pub use day_filter::{date_prefix, periods_on};
pub use extremes::aggregate;
