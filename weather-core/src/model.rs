use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, WeatherError};

/// Placeholder rendered for any value missing from the current-weather payload.
pub const NOT_AVAILABLE: &str = "N/A";

/// What the user asked for: a place name or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl ResolvedLocation {
    /// Coordinates are used as-is; their display name is `"{lat},{lon}"`
    /// with both values kept in float form (`51.0`, not `51`).
    pub fn from_coordinates(lat: f64, lon: f64) -> Self {
        Self { name: format!("{lat:?},{lon:?}"), lat, lon }
    }
}

/// One 3-hour slot of the forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    pub time: DateTime<Utc>,
    pub temperature: f64,
    pub condition: String,
    pub icon: Option<String>,
}

/// Statistics for every sample that falls on one UTC calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub min_temp: f64,
    pub max_temp: f64,
    pub avg_temp: f64,
    pub typical_condition: String,
    pub typical_icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastWeather {
    description: String,
    #[serde(default)]
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    #[serde(with = "chrono::serde::ts_seconds")]
    dt: DateTime<Utc>,
    main: OwForecastMain,
    weather: Vec<OwForecastWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    list: Vec<OwForecastEntry>,
}

impl ForecastSample {
    /// Decode every `list` entry of a raw forecast payload.
    pub fn from_forecast_payload(raw: &Value) -> Result<Vec<ForecastSample>> {
        let parsed = OwForecastResponse::deserialize(raw).map_err(|source| WeatherError::Parse {
            context: "forecast",
            source,
        })?;

        parsed
            .list
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| {
                let weather = entry.weather.into_iter().next().ok_or_else(|| {
                    WeatherError::Malformed {
                        context: "forecast",
                        reason: format!("entry {idx} has no weather condition"),
                    }
                })?;

                Ok(ForecastSample {
                    time: entry.dt,
                    temperature: entry.main.temp,
                    condition: weather.description,
                    icon: weather.icon,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Condition {
    pub main: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CurrentMain {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Wind {
    pub speed: Option<f64>,
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Sys {
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Coord {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// "Current conditions" payload. Every field is optional; renderers fall
/// back to [`NOT_AVAILABLE`] or an empty string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CurrentWeather {
    pub name: Option<String>,
    pub sys: Sys,
    pub weather: Vec<Condition>,
    pub main: CurrentMain,
    pub wind: Wind,
    /// Shift from UTC in seconds.
    pub timezone: Option<i64>,
    pub dt: Option<i64>,
    pub coord: Option<Coord>,
}

impl CurrentWeather {
    pub fn from_payload(raw: &Value) -> Result<Self> {
        Self::deserialize(raw).map_err(|source| WeatherError::Parse {
            context: "current weather",
            source,
        })
    }

    /// First reported condition, or an empty one.
    pub fn condition(&self) -> Condition {
        self.weather.first().cloned().unwrap_or_default()
    }

    /// Observation time shifted into the location's local time.
    pub fn local_time(&self) -> String {
        crate::time::local_timestamp(self.dt.unwrap_or(0), self.timezone.unwrap_or(0))
    }

    /// `"{name}, {country}"`, or just the name when no country is reported.
    pub fn place(&self) -> String {
        let name = self.name.as_deref().unwrap_or("");
        match self.sys.country.as_deref() {
            Some(country) if !country.is_empty() => format!("{name}, {country}"),
            _ => name.to_string(),
        }
    }
}

/// `Display` for an optional number, falling back to [`NOT_AVAILABLE`].
pub fn or_na(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}
