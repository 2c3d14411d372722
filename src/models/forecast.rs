//! Forecast periods and the values derived from them

use serde::{Deserialize, Serialize};

/// One time-bounded prediction from the forecast provider
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastPeriod {
    /// Provider-local timestamp, e.g. `2024-06-15T06:00:00-04:00`
    pub start_time: String,
    pub temperature: f64,
    pub detailed_forecast: String,
    /// Period label such as "Tonight", absent for hourly periods
    pub name: Option<String>,
}

/// Periods in the provider's chronological order
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ForecastSeries {
    pub periods: Vec<ForecastPeriod>,
}

impl ForecastSeries {
    #[must_use]
    pub fn new(periods: Vec<ForecastPeriod>) -> Self {
        Self { periods }
    }

    /// The current period, which the daily forecast uses as today's summary
    #[must_use]
    pub fn first(&self) -> Option<&ForecastPeriod> {
        self.periods.first()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.periods.len()
    }
}

/// Today's high and low. `low <= high` always holds.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct DailyExtremes {
    pub high: f64,
    pub low: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_preserves_provider_order() {
        let series = ForecastSeries::new(vec![
            ForecastPeriod {
                start_time: "2024-06-15T06:00:00-04:00".to_string(),
                temperature: 81.0,
                detailed_forecast: "Sunny, with a high near 81.".to_string(),
                name: Some("Today".to_string()),
            },
            ForecastPeriod {
                start_time: "2024-06-15T18:00:00-04:00".to_string(),
                temperature: 63.0,
                detailed_forecast: "Mostly clear.".to_string(),
                name: Some("Tonight".to_string()),
            },
        ]);

        assert_eq!(series.len(), 2);
        assert_eq!(series.first().unwrap().name.as_deref(), Some("Today"));
    }

    #[test]
    fn test_empty_series() {
        let series = ForecastSeries::default();
        assert!(series.is_empty());
        assert!(series.first().is_none());
    }
}
