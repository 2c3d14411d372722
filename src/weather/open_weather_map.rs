//! `OpenWeatherMap` current conditions

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{info, instrument};

use super::{CurrentConditionsProvider, get_json};
use crate::models::{CurrentConditions, Location};
use crate::{Result, WeatherTextError};

const SOURCE: &str = "openweathermap";

pub struct OpenWeatherMapClient {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: String,
}

impl OpenWeatherMapClient {
    pub fn new(client: ClientWithMiddleware, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn weather_url(&self, location: Location, units: &str) -> String {
        format!(
            "{}/weather?lat={}&lon={}&units={}&appid={}",
            self.base_url,
            location.latitude,
            location.longitude,
            urlencoding::encode(units),
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl CurrentConditionsProvider for OpenWeatherMapClient {
    #[instrument(skip(self))]
    async fn fetch_current(&self, location: Location, units: &str) -> Result<CurrentConditions> {
        let response: WeatherResponse =
            get_json(&self.client, &self.weather_url(location, units), SOURCE).await?;
        let conditions = CurrentConditions::try_from(response)?;
        info!(
            "Current temperature {:.1}, wind {:.1}",
            conditions.temperature, conditions.wind_speed
        );
        Ok(conditions)
    }
}

/// `/data/2.5/weather` response, reduced to the fields the summary uses
#[derive(Debug, Deserialize)]
struct WeatherResponse {
    main: Option<MainBlock>,
    wind: Option<WindBlock>,
    sys: Option<SysBlock>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: Option<f64>,
    temp_max: Option<f64>,
    temp_min: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WindBlock {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SysBlock {
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| WeatherTextError::missing(format!("{SOURCE} {field}")))
}

impl TryFrom<WeatherResponse> for CurrentConditions {
    type Error = WeatherTextError;

    fn try_from(response: WeatherResponse) -> Result<Self> {
        let main = required(response.main, "main")?;
        let wind = required(response.wind, "wind")?;
        let sys = required(response.sys, "sys")?;

        Ok(Self {
            temperature: required(main.temp, "main.temp")?,
            temperature_max: required(main.temp_max, "main.temp_max")?,
            temperature_min: required(main.temp_min, "main.temp_min")?,
            wind_speed: required(wind.speed, "wind.speed")?,
            sunrise_epoch: required(sys.sunrise, "sys.sunrise")?,
            sunset_epoch: required(sys.sunset, "sys.sunset")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "coord": {"lon": -74.006, "lat": 40.7128},
        "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
        "main": {"temp": 72.4, "feels_like": 71.9, "temp_min": 68.0, "temp_max": 75.0,
                 "pressure": 1015, "humidity": 48},
        "wind": {"speed": 5.2, "deg": 220},
        "sys": {"country": "US", "sunrise": 1718443320, "sunset": 1718497920},
        "name": "New York",
        "cod": 200
    }"#;

    fn client() -> OpenWeatherMapClient {
        let http = reqwest_middleware::ClientBuilder::new(reqwest::Client::new()).build();
        OpenWeatherMapClient::new(http, "https://api.openweathermap.org/data/2.5/", "k&y")
    }

    #[test]
    fn parses_current_conditions() {
        let response: WeatherResponse = serde_json::from_str(SAMPLE).unwrap();
        let conditions = CurrentConditions::try_from(response).unwrap();
        assert_eq!(
            conditions,
            CurrentConditions {
                temperature: 72.4,
                temperature_max: 75.0,
                temperature_min: 68.0,
                wind_speed: 5.2,
                sunrise_epoch: 1_718_443_320,
                sunset_epoch: 1_718_497_920,
            }
        );
    }

    #[test]
    fn missing_sunrise_is_missing_data() {
        let json = r#"{"main": {"temp": 50.0, "temp_min": 45.0, "temp_max": 55.0},
                       "wind": {"speed": 1.0}, "sys": {"sunset": 1718497920}}"#;
        let response: WeatherResponse = serde_json::from_str(json).unwrap();
        let err = CurrentConditions::try_from(response).unwrap_err();
        assert!(err.is_missing_data());
        assert!(err.to_string().contains("sys.sunrise"));
    }

    #[test]
    fn error_payload_is_missing_data() {
        let json = r#"{"cod": 401, "message": "Invalid API key"}"#;
        let response: WeatherResponse = serde_json::from_str(json).unwrap();
        assert!(CurrentConditions::try_from(response).unwrap_err().is_missing_data());
    }

    #[test]
    fn url_carries_coordinate_units_and_key() {
        let url = client().weather_url(Location::new(40.5, -74.25), "imperial");
        assert_eq!(
            url,
            concat!(
                "https://api.openweathermap.org/data/2.5/weather",
                "?lat=40.5&lon=-74.25&units=imperial&appid=k%26y"
            )
        );
    }

    #[tokio::test]
    async fn unreachable_host_error_hides_api_key() {
        let http = reqwest_middleware::ClientBuilder::new(reqwest::Client::new()).build();
        let client = OpenWeatherMapClient::new(http, "http://127.0.0.1:1/data/2.5", "SECRETKEY123");

        let err = client
            .fetch_current(Location::new(40.0, -74.0), "imperial")
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherTextError::NetworkFetch { .. }));
        assert!(!err.to_string().contains("SECRETKEY123"), "{err}");
        assert!(!err.user_message().contains("SECRETKEY123"));
    }
}
