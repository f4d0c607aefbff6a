use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::config::Config;
use crate::error::WeatherError;
use crate::model::LocationCandidate;

use super::{LocationSource, truncate_body};

const ENDPOINT: &str = "geocoding";
const SEARCH_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// Client for the Open-Meteo geocoding service.
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    http: Client,
    language: String,
    max_candidates: u8,
}

impl OpenMeteoGeocoder {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            language: config.language.clone(),
            max_candidates: config.max_candidates,
        }
    }
}

#[async_trait]
impl LocationSource for OpenMeteoGeocoder {
    async fn resolve(&self, query: &str) -> Result<Vec<LocationCandidate>, WeatherError> {
        let name = normalize_query(query);
        if name.is_empty() {
            // A blank query can never match; skip the round trip.
            return Err(WeatherError::NotFound { query: query.to_string() });
        }

        let count = self.max_candidates.to_string();
        let res = self
            .http
            .get(SEARCH_URL)
            .query(&[
                ("name", name.as_str()),
                ("count", count.as_str()),
                ("language", self.language.as_str()),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|source| WeatherError::Network { endpoint: ENDPOINT, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| WeatherError::Network { endpoint: ENDPOINT, source })?;

        log::debug!("geocoding \"{name}\" answered with {status}");

        decode_search(status, &body, query)
    }
}

/// Collapse whitespace runs so the query reaches the API as single-space
/// separated words; percent-encoding is handled by the query builder.
fn normalize_query(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode a geocoding response. Split out from the network call so the
/// status and shape handling can be tested against canned bodies.
fn decode_search(
    status: StatusCode,
    body: &str,
    query: &str,
) -> Result<Vec<LocationCandidate>, WeatherError> {
    if !status.is_success() {
        return Err(WeatherError::Status {
            endpoint: ENDPOINT,
            status,
            body: truncate_body(body),
        });
    }

    let parsed: SearchResponse = serde_json::from_str(body)
        .map_err(|source| WeatherError::Parse { endpoint: ENDPOINT, source })?;

    // The service omits "results" entirely when nothing matched.
    let results = parsed.results.unwrap_or_default();
    if results.is_empty() {
        return Err(WeatherError::NotFound { query: query.to_string() });
    }

    Ok(results
        .into_iter()
        .map(|hit| LocationCandidate {
            name: hit.name,
            latitude: hit.latitude,
            longitude: hit.longitude,
            country: hit.country,
            admin1: hit.admin1,
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Option<Vec<SearchHit>>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    admin1: Option<String>,
}
