use reqwest::StatusCode;
use thiserror::Error;

/// Failures surfaced by the lookup pipeline.
///
/// The first failing step wins; the pipeline performs no retries or
/// recovery, so callers always see the original error.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Transport-level failure before an HTTP status was received.
    #[error("request to the {endpoint} service failed: {source}")]
    Network {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("{endpoint} service returned HTTP {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    /// The response body was not the JSON shape we expect.
    #[error("could not parse the {endpoint} response: {source}")]
    Parse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The hourly arrays disagreed about how many samples they hold.
    #[error("forecast series is inconsistent: {reason}")]
    InvalidSeries { reason: String },

    /// Geocoding produced no candidates for the query.
    #[error("no locations found for \"{query}\"")]
    NotFound { query: String },
}

impl WeatherError {
    /// True for transport failures and non-success HTTP statuses.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Status { .. })
    }
}
