use serde::{Deserialize, Serialize};
use std::fmt;

/// One geocoding hit. Candidates arrive best-match-first from the service
/// and keep that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationCandidate {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
    pub admin1: Option<String>,
}

impl LocationCandidate {
    /// "Name, Country" when the country is known, the bare name otherwise.
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) => format!("{}, {}", self.name, country),
            None => self.name.clone(),
        }
    }
}

/// Parallel hourly arrays returned by the forecast service. Index `i`
/// across every field describes the same hour.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySeries {
    pub time: Vec<String>,
    pub temperature_c: Vec<f64>,
    pub humidity_pct: Vec<u8>,
    pub weather_code: Vec<i64>,
    pub wind_speed_kmh: Vec<f64>,
}

impl HourlySeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Outcome of matching the wall clock against the series timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourMatch {
    pub index: usize,
    /// False when no timestamp matched and the selector fell back to the
    /// first row.
    pub exact: bool,
}

/// Condition bucket derived from the provider's numeric weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    Clear,
    Cloudy,
    Rainy,
    Snow,
    Unknown,
}

impl Condition {
    /// Buckets the provider's WMO-style weather code. Codes outside the
    /// mapped ranges (fog, drizzle, thunderstorms, ...) come back as
    /// `Unknown` rather than being guessed at.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Condition::Clear,
            1..=3 => Condition::Cloudy,
            58..=67 => Condition::Rainy,
            72..=77 => Condition::Snow,
            _ => Condition::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Clear => "Clear",
            Condition::Cloudy => "Cloudy",
            Condition::Rainy => "Rainy",
            Condition::Snow => "Snow",
            Condition::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The values shown to the user for the current hour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    /// Timestamp of the series row the values were read from.
    pub observed_time: String,
    pub temperature_c: f64,
    pub condition: Condition,
    pub humidity_pct: u8,
    pub wind_speed_kmh: f64,
    /// False when the current hour was absent from the series and the
    /// first row was shown instead.
    pub exact_hour: bool,
}
