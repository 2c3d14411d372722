//! Selection of the periods that fall on a given calendar day

use chrono::NaiveDate;

use crate::models::{ForecastPeriod, ForecastSeries};

/// `YYYY-MM-DD` with zero-padded month and day
#[must_use]
pub fn date_prefix(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Periods whose start time textually begins with `prefix`, in series order.
///
/// Start times are compared as strings in the provider's own offset; nothing is
/// parsed or converted.
#[must_use]
pub fn periods_on<'a>(series: &'a ForecastSeries, prefix: &str) -> Vec<&'a ForecastPeriod> {
    series
        .periods
        .iter()
        .filter(|period| period.start_time.starts_with(prefix))
        .collect()
}
