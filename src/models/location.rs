//! Location model for the configured coordinate

use serde::{Deserialize, Serialize};

/// Location coordinates
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `lat,lon` at four decimals, the precision api.weather.gov accepts for point lookups
    #[must_use]
    pub fn to_point(&self) -> String {
        format!("{:.4},{:.4}", self.latitude, self.longitude)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_point_rounds() {
        let location = Location::new(40.712_776, -74.005_974);
        assert_eq!(location.to_point(), "40.7128,-74.0060");
    }

    #[test]
    fn test_display() {
        let location = Location::new(42.0, -71.5);
        assert_eq!(location.to_string(), "42.0000, -71.5000");
    }
}
