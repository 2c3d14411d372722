//! Data models for the weather text job
//!
//! - Location: the configured coordinate
//! - Conditions: current weather snapshot from the primary provider
//! - Forecast: forecast periods, series and derived daily extremes
//! - Notification: composed message and dispatch outcome

pub mod conditions;
pub mod forecast;
pub mod location;
pub mod notification;

// Re-export all public types for convenient access
pub use conditions::CurrentConditions;
pub use forecast::{DailyExtremes, ForecastPeriod, ForecastSeries};
pub use location::Location;
pub use notification::{DispatchResult, NotificationMessage, OutboundMessage};
