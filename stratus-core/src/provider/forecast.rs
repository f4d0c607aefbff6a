use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::config::Config;
use crate::error::WeatherError;
use crate::model::HourlySeries;

use super::{ForecastSource, truncate_body};

const ENDPOINT: &str = "forecast";
const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// The hourly variables the snapshot is built from, in the order the
/// service expects them.
const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m";

/// Client for the Open-Meteo forecast service.
#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    http: Client,
    timezone: String,
}

impl OpenMeteoForecast {
    pub fn new(http: Client, config: &Config) -> Self {
        Self { http, timezone: config.timezone.clone() }
    }
}

#[async_trait]
impl ForecastSource for OpenMeteoForecast {
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<HourlySeries, WeatherError> {
        let lat = latitude.to_string();
        let lon = longitude.to_string();

        let res = self
            .http
            .get(FORECAST_URL)
            .query(&[
                ("latitude", lat.as_str()),
                ("longitude", lon.as_str()),
                ("hourly", HOURLY_FIELDS),
                ("timezone", self.timezone.as_str()),
            ])
            .send()
            .await
            .map_err(|source| WeatherError::Network { endpoint: ENDPOINT, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| WeatherError::Network { endpoint: ENDPOINT, source })?;

        log::debug!("forecast for ({lat}, {lon}) answered with {status}");

        decode_forecast(status, &body)
    }
}

/// Decode a forecast response. Split out from the network call so the
/// status and shape handling can be tested against canned bodies.
fn decode_forecast(status: StatusCode, body: &str) -> Result<HourlySeries, WeatherError> {
    if !status.is_success() {
        return Err(WeatherError::Status {
            endpoint: ENDPOINT,
            status,
            body: truncate_body(body),
        });
    }

    let parsed: ForecastResponse = serde_json::from_str(body)
        .map_err(|source| WeatherError::Parse { endpoint: ENDPOINT, source })?;

    let hourly = parsed.hourly;
    validated(HourlySeries {
        time: hourly.time,
        temperature_c: hourly.temperature_2m,
        humidity_pct: hourly.relative_humidity_2m,
        weather_code: hourly.weather_code,
        wind_speed_kmh: hourly.wind_speed_10m,
    })
}

/// The parallel arrays must agree on length, and an empty series leaves
/// nothing to select an hour from.
fn validated(series: HourlySeries) -> Result<HourlySeries, WeatherError> {
    let n = series.time.len();
    if n == 0 {
        return Err(WeatherError::InvalidSeries {
            reason: "the service returned no hourly samples".to_string(),
        });
    }

    let lengths = [
        ("temperature_2m", series.temperature_c.len()),
        ("relative_humidity_2m", series.humidity_pct.len()),
        ("weather_code", series.weather_code.len()),
        ("wind_speed_10m", series.wind_speed_kmh.len()),
    ];
    for (field, len) in lengths {
        if len != n {
            return Err(WeatherError::InvalidSeries {
                reason: format!("time has {n} entries but {field} has {len}"),
            });
        }
    }

    Ok(series)
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: HourlyBlock,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
    relative_humidity_2m: Vec<u8>,
    weather_code: Vec<i64>,
    wind_speed_10m: Vec<f64>,
}
