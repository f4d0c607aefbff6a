//! Core library for the `stratus` weather lookup.
//!
//! This crate defines:
//! - Configuration handling for the lookup pipeline
//! - Clients for the Open-Meteo geocoding and forecast services
//! - The pipeline that turns a place name into a current-hour snapshot
//!
//! It is used by `stratus-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod provider;

pub use config::Config;
pub use error::WeatherError;
pub use model::{Condition, HourMatch, HourlySeries, LocationCandidate, WeatherSnapshot};
pub use pipeline::{WeatherPipeline, select_current_hour};
pub use provider::{ForecastSource, LocationSource};
