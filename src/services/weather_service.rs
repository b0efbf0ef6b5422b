use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;
use std::{env, fmt};

use crate::models::entry::Coordinate;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// One display-ready forecast day. Purely decorative; a failed lookup
/// degrades the weather panel and nothing else.
#[derive(Debug, Serialize, Clone)]
pub struct DailyForecast {
    pub date: String,
    #[serde(rename = "weatherCode")]
    pub weather_code: u32,
    #[serde(rename = "minTemp")]
    pub min_temp: f64,
    #[serde(rename = "maxTemp")]
    pub max_temp: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: ForecastDaily,
}

#[derive(Debug, Deserialize)]
struct ForecastDaily {
    time: Vec<String>,
    weathercode: Vec<u32>,
    temperature_2m_min: Vec<f64>,
    temperature_2m_max: Vec<f64>,
}

#[derive(Debug)]
pub enum WeatherError {
    HttpError(reqwest::Error),
    ResponseError(String),
}

impl fmt::Display for WeatherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherError::HttpError(err) => write!(f, "HTTP error: {}", err),
            WeatherError::ResponseError(msg) => write!(f, "Response error: {}", msg),
        }
    }
}

impl Error for WeatherError {}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::HttpError(err)
    }
}

#[derive(Clone)]
pub struct WeatherService {
    client: Client,
    base_url: String,
}

impl WeatherService {
    pub fn new() -> Result<Self, WeatherError> {
        let base_url =
            env::var("WEATHER_API_URL").unwrap_or_else(|_| DEFAULT_FORECAST_URL.to_string());

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub async fn forecast(
        &self,
        coordinate: Coordinate,
    ) -> Result<Vec<DailyForecast>, WeatherError> {
        let response: ForecastResponse = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", coordinate.lat.to_string()),
                ("longitude", coordinate.lng.to_string()),
                (
                    "daily",
                    "weathercode,temperature_2m_min,temperature_2m_max".to_string(),
                ),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|err| WeatherError::ResponseError(err.to_string()))?;

        let daily = response.daily;
        Ok(daily
            .time
            .into_iter()
            .zip(daily.weathercode)
            .zip(daily.temperature_2m_min.into_iter().zip(daily.temperature_2m_max))
            .map(|((date, weather_code), (min_temp, max_temp))| DailyForecast {
                date,
                weather_code,
                min_temp,
                max_temp,
            })
            .collect())
    }
}
