//! Orchestrates the two remote lookups into one current-hour snapshot.

use chrono::NaiveDateTime;

use crate::config::Config;
use crate::error::WeatherError;
use crate::model::{Condition, HourMatch, WeatherSnapshot};
use crate::provider::{
    ForecastSource, LocationSource, forecast::OpenMeteoForecast, geocoding::OpenMeteoGeocoder,
    http_client,
};

/// Hour-granularity pattern shared with the forecast timestamps.
const HOUR_FORMAT: &str = "%Y-%m-%dT%H:00";

/// Index of the first timestamp matching `now` at hour granularity.
///
/// Minutes are truncated to `:00` before comparing, and the comparison is
/// case-insensitive. When the current hour is absent from the series, for
/// instance because the configured forecast timezone differs from the local
/// clock, the selector falls back to the first row. The fallback is policy,
/// not an error; `HourMatch::exact` records which path was taken.
pub fn select_current_hour(times: &[String], now: NaiveDateTime) -> HourMatch {
    let wanted = now.format(HOUR_FORMAT).to_string();

    for (index, time) in times.iter().enumerate() {
        if time.eq_ignore_ascii_case(&wanted) {
            return HourMatch { index, exact: true };
        }
    }

    HourMatch { index: 0, exact: false }
}

/// The whole lookup: place name in, current-hour snapshot out.
pub struct WeatherPipeline {
    locations: Box<dyn LocationSource>,
    forecasts: Box<dyn ForecastSource>,
}

impl WeatherPipeline {
    pub fn new(locations: Box<dyn LocationSource>, forecasts: Box<dyn ForecastSource>) -> Self {
        Self { locations, forecasts }
    }

    /// Build the production pipeline backed by the Open-Meteo services,
    /// sharing one HTTP client between them.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = http_client(config.request_timeout())?;

        Ok(Self::new(
            Box::new(OpenMeteoGeocoder::new(http.clone(), config)),
            Box::new(OpenMeteoForecast::new(http, config)),
        ))
    }

    /// Resolve `place`, fetch its forecast, and return the values for the
    /// hour matching `now`.
    ///
    /// The steps run sequentially on the caller's task; the first failure
    /// propagates unchanged, and nothing is retried.
    pub async fn current_weather(
        &self,
        place: &str,
        now: NaiveDateTime,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let candidates = self.locations.resolve(place).await?;
        let location = candidates
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::NotFound { query: place.to_string() })?;

        log::info!(
            "resolved \"{place}\" to {} ({:.4}, {:.4})",
            location.display_name(),
            location.latitude,
            location.longitude
        );

        let series = self.forecasts.fetch(location.latitude, location.longitude).await?;
        if series.is_empty() {
            return Err(WeatherError::InvalidSeries {
                reason: "forecast returned an empty series".to_string(),
            });
        }

        let matched = select_current_hour(&series.time, now);
        if !matched.exact {
            log::warn!(
                "hour {} not in the forecast range, showing the first sample",
                now.format(HOUR_FORMAT)
            );
        }

        let i = matched.index;
        Ok(WeatherSnapshot {
            location_name: location.display_name(),
            observed_time: series.time[i].clone(),
            temperature_c: series.temperature_c[i],
            condition: Condition::from_code(series.weather_code[i]),
            humidity_pct: series.humidity_pct[i],
            wind_speed_kmh: series.wind_speed_kmh[i],
            exact_hour: matched.exact,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HourlySeries, LocationCandidate};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::{Arc, Mutex};

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 3)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn timestamps() -> Vec<String> {
        vec![
            "2024-01-03T00:00".to_string(),
            "2024-01-03T01:00".to_string(),
            "2024-01-03T02:00".to_string(),
        ]
    }

    #[test]
    fn selector_finds_the_matching_hour() {
        let matched = select_current_hour(&timestamps(), at(1, 0));
        assert_eq!(matched, HourMatch { index: 1, exact: true });
    }

    #[test]
    fn selector_truncates_minutes_before_matching() {
        let matched = select_current_hour(&timestamps(), at(2, 42));
        assert_eq!(matched, HourMatch { index: 2, exact: true });
    }

    #[test]
    fn selector_falls_back_to_the_first_row() {
        let matched = select_current_hour(&timestamps(), at(7, 0));
        assert_eq!(matched, HourMatch { index: 0, exact: false });
    }

    #[test]
    fn selector_ignores_timestamp_case() {
        let times = vec!["2024-01-03t01:00".to_string()];
        let matched = select_current_hour(&times, at(1, 0));
        assert_eq!(matched, HourMatch { index: 0, exact: true });
    }

    fn tokyo() -> LocationCandidate {
        LocationCandidate {
            name: "Tokyo".to_string(),
            latitude: 35.6895,
            longitude: 139.6917,
            country: Some("Japan".to_string()),
            admin1: None,
        }
    }

    fn osaka() -> LocationCandidate {
        LocationCandidate {
            name: "Osaka".to_string(),
            latitude: 34.6937,
            longitude: 135.5023,
            country: Some("Japan".to_string()),
            admin1: None,
        }
    }

    fn sample_series() -> HourlySeries {
        HourlySeries {
            time: timestamps(),
            temperature_c: vec![20.0, 21.5, 22.1],
            humidity_pct: vec![55, 60, 62],
            weather_code: vec![0, 1, 61],
            wind_speed_kmh: vec![7.0, 12.0, 14.5],
        }
    }

    #[derive(Debug)]
    struct StaticLocations(Vec<LocationCandidate>);

    #[async_trait]
    impl LocationSource for StaticLocations {
        async fn resolve(&self, _query: &str) -> Result<Vec<LocationCandidate>, WeatherError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Debug)]
    struct RecordingForecast {
        series: HourlySeries,
        calls: Arc<Mutex<Vec<(f64, f64)>>>,
    }

    #[async_trait]
    impl ForecastSource for RecordingForecast {
        async fn fetch(
            &self,
            latitude: f64,
            longitude: f64,
        ) -> Result<HourlySeries, WeatherError> {
            self.calls.lock().unwrap().push((latitude, longitude));
            Ok(self.series.clone())
        }
    }

    fn pipeline_with(
        candidates: Vec<LocationCandidate>,
        series: HourlySeries,
    ) -> (WeatherPipeline, Arc<Mutex<Vec<(f64, f64)>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let pipeline = WeatherPipeline::new(
            Box::new(StaticLocations(candidates)),
            Box::new(RecordingForecast { series, calls: Arc::clone(&calls) }),
        );
        (pipeline, calls)
    }

    #[tokio::test]
    async fn first_candidate_coordinates_reach_the_forecast_source() {
        let (pipeline, calls) = pipeline_with(vec![tokyo(), osaka()], sample_series());

        pipeline.current_weather("Tokyo", at(1, 0)).await.expect("lookup should succeed");

        assert_eq!(*calls.lock().unwrap(), vec![(35.6895, 139.6917)]);
    }

    #[tokio::test]
    async fn snapshot_carries_the_matched_row() {
        let (pipeline, _) = pipeline_with(vec![tokyo()], sample_series());

        let snapshot =
            pipeline.current_weather("Tokyo", at(1, 0)).await.expect("lookup should succeed");

        assert_eq!(snapshot.location_name, "Tokyo, Japan");
        assert_eq!(snapshot.observed_time, "2024-01-03T01:00");
        assert_eq!(snapshot.temperature_c, 21.5);
        assert_eq!(snapshot.condition, Condition::Cloudy);
        assert_eq!(snapshot.humidity_pct, 60);
        assert_eq!(snapshot.wind_speed_kmh, 12.0);
        assert!(snapshot.exact_hour);
    }

    #[tokio::test]
    async fn zero_candidates_short_circuit_before_any_forecast_call() {
        let (pipeline, calls) = pipeline_with(vec![], sample_series());

        let err = pipeline.current_weather("Atlantis", at(1, 0)).await.unwrap_err();

        assert!(matches!(err, WeatherError::NotFound { query } if query == "Atlantis"));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_hour_falls_back_to_the_first_row() {
        let (pipeline, _) = pipeline_with(vec![tokyo()], sample_series());

        let snapshot =
            pipeline.current_weather("Tokyo", at(23, 0)).await.expect("lookup should succeed");

        assert_eq!(snapshot.observed_time, "2024-01-03T00:00");
        assert_eq!(snapshot.condition, Condition::Clear);
        assert!(!snapshot.exact_hour);
    }

    #[tokio::test]
    async fn empty_series_is_rejected_not_indexed() {
        let empty = HourlySeries {
            time: vec![],
            temperature_c: vec![],
            humidity_pct: vec![],
            weather_code: vec![],
            wind_speed_kmh: vec![],
        };
        let (pipeline, _) = pipeline_with(vec![tokyo()], empty);

        let err = pipeline.current_weather("Tokyo", at(1, 0)).await.unwrap_err();
        assert!(matches!(err, WeatherError::InvalidSeries { .. }));
    }
}
