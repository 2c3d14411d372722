//! Upstream weather retrieval
//!
//! Current conditions come from OpenWeatherMap; grid metadata and the daily and
//! hourly forecasts come from api.weather.gov. Every call produces its own
//! `Result`, so one failed call never hides the outcome of the others.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::WeatherConfig;
use crate::models::{CurrentConditions, ForecastSeries, Location};
use crate::{Result, WeatherTextError};

pub mod nws;
pub mod open_weather_map;

pub use nws::NwsClient;
pub use open_weather_map::OpenWeatherMapClient;

/// Source of the current conditions snapshot
#[async_trait]
pub trait CurrentConditionsProvider: Send + Sync {
    async fn fetch_current(&self, location: Location, units: &str) -> Result<CurrentConditions>;
}

/// Resolves a coordinate to the forecast resources that cover it
#[async_trait]
pub trait GridMetadataProvider: Send + Sync {
    async fn fetch_grid(&self, location: Location) -> Result<GridEndpoints>;
}

/// Fetches a forecast series from a URL handed out by the grid metadata
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn fetch_forecast(&self, url: &str) -> Result<ForecastSeries>;
}

/// Forecast URLs embedded in the grid metadata response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridEndpoints {
    pub forecast_url: String,
    pub hourly_forecast_url: Option<String>,
}

/// Per-call outcomes of one retrieval round
#[derive(Debug)]
pub struct WeatherFetch {
    pub conditions: Result<CurrentConditions>,
    pub grid: Result<GridEndpoints>,
    pub daily: Result<ForecastSeries>,
    /// `None` when hourly retrieval is switched off
    pub hourly: Option<Result<ForecastSeries>>,
}

/// Runs the dependent chain of weather calls for one location
pub struct WeatherSourceClient {
    conditions: Arc<dyn CurrentConditionsProvider>,
    grid: Arc<dyn GridMetadataProvider>,
    forecast: Arc<dyn ForecastProvider>,
    location: Location,
    units: String,
    hourly: bool,
}

impl WeatherSourceClient {
    pub fn new(
        conditions: Arc<dyn CurrentConditionsProvider>,
        grid: Arc<dyn GridMetadataProvider>,
        forecast: Arc<dyn ForecastProvider>,
        location: Location,
        units: impl Into<String>,
        hourly: bool,
    ) -> Self {
        Self {
            conditions,
            grid,
            forecast,
            location,
            units: units.into(),
            hourly,
        }
    }

    /// Builds the HTTP-backed client described by the configuration
    pub fn from_config(config: &WeatherConfig) -> Result<Self> {
        let http = build_http_client(config)?;
        let nws = Arc::new(NwsClient::new(http.clone(), &config.grid_base_url));
        let owm = Arc::new(OpenWeatherMapClient::new(
            http,
            &config.current_base_url,
            &config.api_key,
        ));

        Ok(Self::new(
            owm,
            nws.clone(),
            nws,
            Location::new(config.latitude, config.longitude),
            &config.units,
            config.hourly,
        ))
    }

    /// Conditions and grid metadata run together; the forecast calls wait for
    /// the metadata because their URLs come from it.
    #[tracing::instrument(skip(self), fields(location = %self.location))]
    pub async fn fetch(&self) -> WeatherFetch {
        let (conditions, grid) = futures::join!(
            self.conditions.fetch_current(self.location, &self.units),
            self.grid.fetch_grid(self.location),
        );
        log_failure("current conditions", &conditions);
        log_failure("grid metadata", &grid);

        let (daily, hourly) = match &grid {
            Ok(endpoints) => {
                debug!("Forecast URL: {}", endpoints.forecast_url);
                futures::join!(
                    self.forecast.fetch_forecast(&endpoints.forecast_url),
                    self.fetch_hourly(endpoints),
                )
            }
            Err(_) => (
                Err(WeatherTextError::missing(
                    "daily forecast (grid metadata unavailable)",
                )),
                self.hourly.then(|| {
                    Err(WeatherTextError::missing(
                        "hourly forecast (grid metadata unavailable)",
                    ))
                }),
            ),
        };
        if grid.is_ok() {
            log_failure("daily forecast", &daily);
            if let Some(hourly) = &hourly {
                log_failure("hourly forecast", hourly);
            }
        }

        WeatherFetch {
            conditions,
            grid,
            daily,
            hourly,
        }
    }

    async fn fetch_hourly(&self, endpoints: &GridEndpoints) -> Option<Result<ForecastSeries>> {
        if !self.hourly {
            return None;
        }
        Some(match &endpoints.hourly_forecast_url {
            Some(url) => self.forecast.fetch_forecast(url).await,
            None => Err(WeatherTextError::missing("hourly forecast url")),
        })
    }
}

fn log_failure<T>(call: &str, result: &Result<T>) {
    if let Err(e) = result {
        warn!(call, error = %e, "Weather call failed");
    }
}

/// Shared client for the weather GETs, with transport retries when configured
pub fn build_http_client(config: &WeatherConfig) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds.into()))
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| WeatherTextError::config(format!("Failed to create HTTP client: {e}")))?;

    let mut builder = ClientBuilder::new(client);
    if config.max_retries > 0 {
        let policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        builder = builder.with(RetryTransientMiddleware::new_with_policy(policy));
    }
    Ok(builder.build())
}

/// GET `url` and decode the JSON body, attributing failures to `source_name`.
///
/// Error text never carries the request URL, since query strings hold API keys.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &ClientWithMiddleware,
    url: &str,
    source_name: &str,
) -> Result<T> {
    let response = client.get(url).send().await.map_err(|e| {
        let message = match e {
            reqwest_middleware::Error::Reqwest(e) => describe(e),
            reqwest_middleware::Error::Middleware(e) => redact_query_secrets(&format!("{e:#}")),
        };
        WeatherTextError::network(source_name, message)
    })?;

    let response = response
        .error_for_status()
        .map_err(|e| WeatherTextError::network(source_name, describe(e)))?;

    response.json::<T>().await.map_err(|e| {
        WeatherTextError::network(source_name, format!("Invalid response body: {}", describe(e)))
    })
}

/// Error text with its cause chain, minus the URL
fn describe(error: reqwest::Error) -> String {
    let error = error.without_url();
    let mut message = error.to_string();
    let mut cause = std::error::Error::source(&error);
    while let Some(inner) = cause {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        cause = std::error::Error::source(inner);
    }
    redact_query_secrets(&message)
}

const SECRET_PARAMS: [&str; 2] = ["appid=", "api_key="];

/// Masks credential query parameters in free text such as middleware error chains
fn redact_query_secrets(text: &str) -> String {
    let mut redacted = text.to_string();
    for param in SECRET_PARAMS {
        let mut from = 0;
        while let Some(found) = redacted[from..].find(param) {
            let start = from + found + param.len();
            let end = redacted[start..]
                .find(|c: char| c == '&' || c == ')' || c == '"' || c.is_whitespace())
                .map_or(redacted.len(), |offset| start + offset);
            redacted.replace_range(start..end, "REDACTED");
            from = start + "REDACTED".len();
        }
    }
    redacted
}
