//! api.weather.gov point metadata and gridpoint forecasts

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{info, instrument};

use super::{ForecastProvider, GridEndpoints, GridMetadataProvider, get_json};
use crate::models::{ForecastPeriod, ForecastSeries, Location};
use crate::{Result, WeatherTextError};

const SOURCE: &str = "api.weather.gov";

/// Serves both the point lookup and the forecast URLs it returns
pub struct NwsClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl NwsClient {
    pub fn new(client: ClientWithMiddleware, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn points_url(&self, location: Location) -> String {
        format!("{}/points/{}", self.base_url, location.to_point())
    }
}

#[async_trait]
impl GridMetadataProvider for NwsClient {
    #[instrument(skip(self))]
    async fn fetch_grid(&self, location: Location) -> Result<GridEndpoints> {
        let response: PointsResponse =
            get_json(&self.client, &self.points_url(location), SOURCE).await?;
        GridEndpoints::try_from(response)
    }
}

#[async_trait]
impl ForecastProvider for NwsClient {
    #[instrument(skip(self))]
    async fn fetch_forecast(&self, url: &str) -> Result<ForecastSeries> {
        let response: ForecastResponse = get_json(&self.client, url, SOURCE).await?;
        let series = ForecastSeries::try_from(response)?;
        info!("Retrieved {} forecast periods", series.len());
        Ok(series)
    }
}

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: Option<PointProperties>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointProperties {
    forecast: Option<String>,
    forecast_hourly: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    properties: Option<ForecastProperties>,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    #[serde(default)]
    periods: Vec<Period>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Period {
    name: Option<String>,
    start_time: Option<String>,
    temperature: Option<Temperature>,
    detailed_forecast: Option<String>,
}

/// Plain number by default; a quantity object when the quantitative-values feature flag is on
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Temperature {
    Plain(f64),
    Quantity { value: Option<f64> },
}

impl Temperature {
    fn value(&self) -> Option<f64> {
        match self {
            Temperature::Plain(v) => Some(*v),
            Temperature::Quantity { value } => *value,
        }
    }
}

impl TryFrom<PointsResponse> for GridEndpoints {
    type Error = WeatherTextError;

    fn try_from(response: PointsResponse) -> Result<Self> {
        let properties = response
            .properties
            .ok_or_else(|| WeatherTextError::missing("point metadata properties"))?;

        Ok(Self {
            forecast_url: properties
                .forecast
                .ok_or_else(|| WeatherTextError::missing("daily forecast url"))?,
            hourly_forecast_url: properties.forecast_hourly,
        })
    }
}

impl TryFrom<ForecastResponse> for ForecastSeries {
    type Error = WeatherTextError;

    fn try_from(response: ForecastResponse) -> Result<Self> {
        let properties = response
            .properties
            .ok_or_else(|| WeatherTextError::missing("forecast properties"))?;

        let periods = properties
            .periods
            .into_iter()
            .enumerate()
            .map(|(index, period)| {
                let start_time = period.start_time.ok_or_else(|| {
                    WeatherTextError::missing(format!("startTime of forecast period {index}"))
                })?;
                let temperature = period
                    .temperature
                    .as_ref()
                    .and_then(Temperature::value)
                    .ok_or_else(|| {
                        WeatherTextError::missing(format!("temperature for {start_time}"))
                    })?;

                Ok(ForecastPeriod {
                    start_time,
                    temperature,
                    detailed_forecast: period.detailed_forecast.unwrap_or_default(),
                    name: period.name.filter(|name| !name.is_empty()),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ForecastSeries::new(periods))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINTS: &str = r#"{
        "id": "https://api.weather.gov/points/40.7128,-74.006",
        "properties": {
            "gridId": "OKX",
            "gridX": 33,
            "gridY": 35,
            "forecast": "https://api.weather.gov/gridpoints/OKX/33,35/forecast",
            "forecastHourly": "https://api.weather.gov/gridpoints/OKX/33,35/forecast/hourly",
            "timeZone": "America/New_York"
        }
    }"#;

    const DAILY: &str = r#"{
        "properties": {
            "units": "us",
            "periods": [
                {
                    "number": 1,
                    "name": "Today",
                    "startTime": "2024-06-15T06:00:00-04:00",
                    "endTime": "2024-06-15T18:00:00-04:00",
                    "isDaytime": true,
                    "temperature": 81,
                    "temperatureUnit": "F",
                    "windSpeed": "5 to 10 mph",
                    "shortForecast": "Sunny",
                    "detailedForecast": "Sunny, with a high near 81. Southwest wind 5 to 10 mph."
                },
                {
                    "number": 2,
                    "name": "Tonight",
                    "startTime": "2024-06-15T18:00:00-04:00",
                    "endTime": "2024-06-16T06:00:00-04:00",
                    "isDaytime": false,
                    "temperature": 63,
                    "detailedForecast": "Mostly clear, with a low around 63."
                }
            ]
        }
    }"#;

    const HOURLY_QUANTITY: &str = r#"{
        "properties": {
            "periods": [
                {
                    "number": 1,
                    "name": "",
                    "startTime": "2024-06-15T07:00:00-04:00",
                    "temperature": {"unitCode": "wmoUnit:degF", "value": 64},
                    "detailedForecast": ""
                }
            ]
        }
    }"#;

    #[test]
    fn parses_point_metadata() {
        let response: PointsResponse = serde_json::from_str(POINTS).unwrap();
        let endpoints = GridEndpoints::try_from(response).unwrap();
        assert_eq!(
            endpoints.forecast_url,
            "https://api.weather.gov/gridpoints/OKX/33,35/forecast"
        );
        assert_eq!(
            endpoints.hourly_forecast_url.as_deref(),
            Some("https://api.weather.gov/gridpoints/OKX/33,35/forecast/hourly")
        );
    }

    #[test]
    fn point_without_forecast_url_is_missing_data() {
        let response: PointsResponse =
            serde_json::from_str(r#"{"properties": {"gridId": "OKX"}}"#).unwrap();
        assert!(GridEndpoints::try_from(response).unwrap_err().is_missing_data());
    }

    #[test]
    fn parses_daily_periods_in_order() {
        let response: ForecastResponse = serde_json::from_str(DAILY).unwrap();
        let series = ForecastSeries::try_from(response).unwrap();
        assert_eq!(series.len(), 2);
        let first = series.first().unwrap();
        assert_eq!(first.name.as_deref(), Some("Today"));
        assert_eq!(first.start_time, "2024-06-15T06:00:00-04:00");
        assert_eq!(first.temperature, 81.0);
        assert!(first.detailed_forecast.starts_with("Sunny, with a high near 81."));
        assert_eq!(series.periods[1].temperature, 63.0);
    }

    #[test]
    fn parses_quantity_temperatures() {
        let response: ForecastResponse = serde_json::from_str(HOURLY_QUANTITY).unwrap();
        let series = ForecastSeries::try_from(response).unwrap();
        assert_eq!(series.periods[0].temperature, 64.0);
        assert!(series.periods[0].name.is_none());
    }

    #[test]
    fn period_without_temperature_is_missing_data() {
        let json = r#"{"properties": {"periods": [
            {"startTime": "2024-06-15T07:00:00-04:00", "temperature": {"value": null}}
        ]}}"#;
        let response: ForecastResponse = serde_json::from_str(json).unwrap();
        let err = ForecastSeries::try_from(response).unwrap_err();
        assert!(err.to_string().contains("2024-06-15T07:00:00-04:00"));
    }

    #[test]
    fn points_url_uses_four_decimals() {
        let http = reqwest_middleware::ClientBuilder::new(reqwest::Client::new()).build();
        let client = NwsClient::new(http, "https://api.weather.gov/");
        assert_eq!(
            client.points_url(Location::new(40.712_776, -74.005_974)),
            "https://api.weather.gov/points/40.7128,-74.0060"
        );
    }
}
