//! Core library for the `weather-report` CLI.
//!
//! This crate defines:
//! - Forecast aggregation into daily summaries
//! - Text and form renderers for a weather report
//! - Access to OpenWeatherMap (geocoding, current weather, forecast)
//! - Configuration & credentials handling
//!
//! It is used by `weather-report`, but can also be reused by other binaries or services.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod render;
pub mod report;
pub mod time;
pub mod units;

pub use aggregate::summarize_forecast;
pub use config::Config;
pub use error::WeatherError;
pub use model::{CurrentWeather, DaySummary, ForecastSample, LocationQuery, ResolvedLocation};
pub use provider::{WeatherSource, source_from_config};
pub use render::{FormRenderer, ReportRenderer, TextRenderer};
pub use report::{WeatherReport, fetch_report, lookup, resolve};
pub use units::Units;
