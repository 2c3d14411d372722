//! Current conditions snapshot

use serde::{Deserialize, Serialize};

/// Present weather at the configured location, in the configured unit system
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub wind_speed: f64,
    /// Epoch seconds, UTC
    pub sunrise_epoch: i64,
    /// Epoch seconds, UTC
    pub sunset_epoch: i64,
}
