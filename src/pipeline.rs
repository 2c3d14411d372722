//! One scheduled run: fetch, derive, compose, dispatch
//!
//! Conditions, grid metadata and the daily forecast are required. If any of
//! them is missing the run stops with `MissingData` before a message is
//! composed, so the channel is never called with a half-filled template.
//! Hourly data only refines the high/low and falls back to the provider's
//! own daily range.

use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::compose::{MessageInputs, compose};
use crate::config::{TimeConfig, WeatherTextConfig};
use crate::models::{
    CurrentConditions, DailyExtremes, DispatchResult, ForecastSeries, NotificationMessage,
};
use crate::notify::NotificationDispatcher;
use crate::summary::{TimeFormatter, aggregate, date_prefix, periods_on};
use crate::weather::WeatherSourceClient;
use crate::{Result, WeatherTextError};

pub const STATUS_SUCCESS: &str = "completed with success";
pub const STATUS_ERROR: &str = "completed with error";

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub message: NotificationMessage,
    pub dispatch: DispatchResult,
}

impl RunReport {
    #[must_use]
    pub fn status(&self) -> &'static str {
        if self.dispatch.is_success() {
            STATUS_SUCCESS
        } else {
            STATUS_ERROR
        }
    }
}

pub struct PipelineOrchestrator {
    source: WeatherSourceClient,
    dispatcher: NotificationDispatcher,
    formatter: TimeFormatter,
    time: TimeConfig,
}

impl PipelineOrchestrator {
    pub fn new(
        source: WeatherSourceClient,
        dispatcher: NotificationDispatcher,
        formatter: TimeFormatter,
        time: TimeConfig,
    ) -> Self {
        Self {
            source,
            dispatcher,
            formatter,
            time,
        }
    }

    pub fn from_config(config: &WeatherTextConfig) -> Result<Self> {
        Ok(Self::new(
            WeatherSourceClient::from_config(&config.weather)?,
            NotificationDispatcher::from_config(&config.notification)?,
            TimeFormatter::new(config.time.utc_offset_hours, config.time.clock),
            config.time.clone(),
        ))
    }

    /// Runs for today's date and reduces the outcome to a status line
    pub async fn run_to_status(&self) -> &'static str {
        match self.run().await {
            Ok(report) => {
                if let Some(e) = report.dispatch.error() {
                    error!("Run finished without delivery: {}", e);
                }
                report.status()
            }
            Err(e) => {
                error!("Run aborted: {}", e);
                STATUS_ERROR
            }
        }
    }

    pub async fn run(&self) -> Result<RunReport> {
        self.run_for(self.time.today()).await
    }

    /// `today` decides which hourly periods count toward the high and low
    #[tracing::instrument(skip(self))]
    pub async fn run_for(&self, today: NaiveDate) -> Result<RunReport> {
        let fetched = self.source.fetch().await;

        let conditions = required(fetched.conditions, "current conditions")?;
        required(fetched.grid, "grid metadata")?;
        let daily = required(fetched.daily, "daily forecast")?;
        let summary = daily
            .first()
            .ok_or_else(|| WeatherTextError::missing("daily forecast has no periods"))?;

        let sunrise = self
            .formatter
            .format(conditions.sunrise_epoch)
            .ok_or_else(|| WeatherTextError::missing("sunrise time out of range"))?;
        let sunset = self
            .formatter
            .format(conditions.sunset_epoch)
            .ok_or_else(|| WeatherTextError::missing("sunset time out of range"))?;

        let extremes = daily_extremes(&conditions, fetched.hourly, today);

        let message = compose(&MessageInputs {
            conditions: &conditions,
            extremes,
            sunrise: &sunrise,
            sunset: &sunset,
            forecast: &summary.detailed_forecast,
        });
        info!("Composed message of {} bytes", message.as_str().len());

        let dispatch = self.dispatcher.dispatch(&message).await;
        Ok(RunReport { message, dispatch })
    }
}

/// Any failure of a required call becomes `MissingData` for that value
fn required<T>(result: Result<T>, what: &str) -> Result<T> {
    result.map_err(|e| match e {
        WeatherTextError::MissingData { .. } => e,
        other => WeatherTextError::missing(format!("{what}: {other}")),
    })
}

/// High/low from today's hourly periods, or the conditions provider's range
/// when there are none to reduce.
fn daily_extremes(
    conditions: &CurrentConditions,
    hourly: Option<Result<ForecastSeries>>,
    today: NaiveDate,
) -> DailyExtremes {
    let fallback = DailyExtremes {
        high: conditions.temperature_max.max(conditions.temperature_min),
        low: conditions.temperature_min.min(conditions.temperature_max),
    };

    match hourly {
        Some(Ok(series)) => {
            let prefix = date_prefix(today);
            let todays = periods_on(&series, &prefix);
            if todays.is_empty() {
                warn!("No hourly periods start on {}, using provider high/low", prefix);
                fallback
            } else {
                aggregate(todays.iter().map(|period| period.temperature))
            }
        }
        Some(Err(e)) => {
            warn!("Hourly forecast unavailable ({}), using provider high/low", e);
            fallback
        }
        None => fallback,
    }
}
