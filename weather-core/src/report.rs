//! The lookup pipeline: resolve, fetch current, fetch forecast, aggregate.
//!
//! Calls run strictly one after another and the first failure aborts the
//! lookup, so a [`WeatherReport`] only exists once every call succeeded.

use std::{fs, path::Path};

use serde::Serialize;
use serde_json::Value;

use crate::{
    Units,
    aggregate::summarize_forecast,
    error::{Result, WeatherError},
    model::{CurrentWeather, DaySummary, ForecastSample, LocationQuery, ResolvedLocation},
    provider::WeatherSource,
};

#[derive(Debug, Clone)]
pub struct WeatherReport {
    pub location: ResolvedLocation,
    pub units: Units,
    pub current: CurrentWeather,
    pub days: Vec<DaySummary>,
    raw_current: Value,
    raw_forecast: Value,
}

/// On-disk layout of `--save-json`.
#[derive(Debug, Serialize)]
struct SavedReport<'a> {
    resolved: &'a str,
    current: &'a Value,
    forecast: &'a Value,
}

/// Turn a query into coordinates. Coordinates are taken as given; names go
/// through the source's geocoder.
pub async fn resolve(source: &dyn WeatherSource, query: &LocationQuery) -> Result<ResolvedLocation> {
    let location = match query {
        LocationQuery::Coordinates { lat, lon } => ResolvedLocation::from_coordinates(*lat, *lon),
        LocationQuery::City(city) => source.geocode(city).await?,
    };

    tracing::info!(name = %location.name, lat = location.lat, lon = location.lon, "resolved location");
    Ok(location)
}

/// Fetch current weather and forecast for `location` and summarise the forecast.
pub async fn fetch_report(
    source: &dyn WeatherSource,
    location: ResolvedLocation,
    units: Units,
) -> Result<WeatherReport> {
    let raw_current = source.current(location.lat, location.lon, units).await?;
    let raw_forecast = source.forecast(location.lat, location.lon, units).await?;

    let current = CurrentWeather::from_payload(&raw_current)?;
    let samples = ForecastSample::from_forecast_payload(&raw_forecast)?;
    let days = summarize_forecast(&samples);

    Ok(WeatherReport { location, units, current, days, raw_current, raw_forecast })
}

/// [`resolve`] followed by [`fetch_report`].
pub async fn lookup(
    source: &dyn WeatherSource,
    query: &LocationQuery,
    units: Units,
) -> Result<WeatherReport> {
    let location = resolve(source, query).await?;
    fetch_report(source, location, units).await
}

impl WeatherReport {
    /// Raw payloads as a pretty-printed (2-space) JSON document with the keys
    /// `resolved`, `current` and `forecast`.
    pub fn to_saved_json(&self) -> Result<String> {
        let saved = SavedReport {
            resolved: &self.location.name,
            current: &self.raw_current,
            forecast: &self.raw_forecast,
        };

        serde_json::to_string_pretty(&saved)
            .map_err(|source| WeatherError::Serialize { context: "saved report", source })
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = self.to_saved_json()?;
        fs::write(path, json)
            .map_err(|source| WeatherError::Io { path: path.to_path_buf(), source })?;

        tracing::info!(path = %path.display(), "saved raw responses");
        Ok(())
    }
}
