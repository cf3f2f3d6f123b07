use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    Config, Units,
    error::{Result, WeatherError},
    model::ResolvedLocation,
    provider::openweather::OpenWeatherClient,
};

pub mod openweather;

/// Environment variable consulted for the API key when `--api-key` is absent.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Bound applied to every outbound request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetch/resolve layer feeding the report pipeline.
///
/// Payloads are returned raw so they can be persisted untouched; decoding
/// happens in [`crate::model`].
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Translate a free-text place name into coordinates and a display name.
    async fn geocode(&self, city: &str) -> Result<ResolvedLocation>;

    async fn current(&self, lat: f64, lon: f64, units: Units) -> Result<Value>;

    async fn forecast(&self, lat: f64, lon: f64, units: Units) -> Result<Value>;
}

/// Build the OpenWeatherMap source from config and an already-resolved key.
pub fn source_from_config(config: &Config, api_key: String) -> Result<Box<dyn WeatherSource>> {
    let timeout = config.timeout();
    if timeout.is_zero() {
        return Err(WeatherError::Configuration(
            "timeout_secs must be greater than zero".to_string(),
        ));
    }

    let client = OpenWeatherClient::new(api_key, timeout)?;
    Ok(Box::new(client))
}
