//! `weather-text` - a scheduled morning weather message
//!
//! Gathers current conditions and forecasts from two weather providers,
//! derives today's high/low and local sunrise/sunset, and sends a short
//! summary through SMS or email.

pub mod compose;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod summary;
pub mod weather;

// Re-export core types for public API
pub use config::WeatherTextConfig;
pub use error::WeatherTextError;
pub use models::{
    CurrentConditions, DailyExtremes, DispatchResult, ForecastPeriod, ForecastSeries,
};
pub use notify::{MessageChannel, NotificationDispatcher};
pub use pipeline::{PipelineOrchestrator, RunReport, STATUS_ERROR, STATUS_SUCCESS};
pub use weather::{
    CurrentConditionsProvider, ForecastProvider, GridMetadataProvider, WeatherSourceClient,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherTextError>;
