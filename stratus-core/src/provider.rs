//! Abstractions over the two remote lookups the pipeline composes.
//!
//! `LocationSource` turns a free-text place name into coordinates;
//! `ForecastSource` turns coordinates into an hourly series. The production
//! implementations live in the submodules and talk to the Open-Meteo
//! services; tests substitute in-memory fakes.

use crate::error::WeatherError;
use crate::model::{HourlySeries, LocationCandidate};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};

pub mod forecast;
pub mod geocoding;

/// Resolves a free-text place name into ranked location candidates.
#[async_trait]
pub trait LocationSource: Send + Sync + Debug {
    /// Returns at least one candidate on success; an empty result set is
    /// reported as `WeatherError::NotFound`.
    async fn resolve(&self, query: &str) -> Result<Vec<LocationCandidate>, WeatherError>;
}

/// Fetches the hourly forecast series for a coordinate pair.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    /// Implementations must return a consistent series: all parallel
    /// arrays equal in length and non-empty.
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<HourlySeries, WeatherError>;
}

/// Build the HTTP client shared by both service clients, with the
/// configured per-request timeout.
pub fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")
}

/// Clamp an error body so service responses don't flood the error message.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}
