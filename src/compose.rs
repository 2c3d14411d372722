//! Morning message template

use std::fmt::Display;

use crate::models::{CurrentConditions, DailyExtremes, NotificationMessage};

/// Everything the template needs, already derived
#[derive(Debug, Clone)]
pub struct MessageInputs<'a> {
    pub conditions: &'a CurrentConditions,
    pub extremes: DailyExtremes,
    pub sunrise: &'a str,
    pub sunset: &'a str,
    /// Detailed text of the first daily forecast period
    pub forecast: &'a str,
}

/// Renders the message. Same inputs always give the same bytes.
#[must_use]
pub fn compose(inputs: &MessageInputs<'_>) -> NotificationMessage {
    NotificationMessage::new(inputs.to_string())
}

/// Nearest integer, never rendered as `-0`
fn whole(value: f64) -> i64 {
    value.round() as i64
}

impl Display for MessageInputs<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "WEATHER TEXT:")?;
        writeln!(f)?;
        writeln!(f, "Good Morning!  ☀️ 💦 🌤 ⛈ ")?;
        writeln!(f, "Here's the lowdown for today...")?;
        writeln!(f)?;
        writeln!(f, "temp: {}°", whole(self.conditions.temperature))?;
        writeln!(f, "high: {}°", whole(self.extremes.high))?;
        writeln!(f, "low: {}°", whole(self.extremes.low))?;
        writeln!(f, "wind: {} MPH", whole(self.conditions.wind_speed))?;
        writeln!(f, "sunrise: {} AM", self.sunrise)?;
        writeln!(f, "sunset: {} PM", self.sunset)?;
        writeln!(f)?;
        writeln!(f, "forecast: {}", self.forecast)?;
        writeln!(f)?;
        write!(f, "Have a good day! 🎉🎉 🎉 🎉")
    }
}
