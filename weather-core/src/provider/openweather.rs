use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    Units,
    error::{Result, WeatherError},
    model::ResolvedLocation,
};

use super::WeatherSource;

const CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";
const GEOCODING_URL: &str = "http://api.openweathermap.org/geo/1.0/direct";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build().map_err(|source| {
            WeatherError::Transport { context: "HTTP client setup", source }
        })?;

        Ok(Self { api_key, http })
    }

    /// GET `url` with `params` plus the API key and return the body of a
    /// successful response.
    async fn get_text(
        &self,
        context: &'static str,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<String> {
        tracing::debug!(%url, ?params, "sending {context} request");

        let res = self
            .http
            .get(url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| WeatherError::Transport { context, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| WeatherError::Transport { context, source })?;

        if !status.is_success() {
            tracing::warn!(%status, "{context} request rejected");
            return Err(WeatherError::Http { context, status, body: truncate_body(&body) });
        }

        tracing::debug!(bytes = body.len(), "received {context} response");
        Ok(body)
    }

    async fn get_json(
        &self,
        context: &'static str,
        url: &str,
        lat: f64,
        lon: f64,
        units: Units,
    ) -> Result<Value> {
        let params = [
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("units", units.as_str().to_string()),
        ];
        let body = self.get_text(context, url, &params).await?;
        serde_json::from_str(&body).map_err(|source| WeatherError::Parse { context, source })
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoMatch {
    lat: f64,
    lon: f64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

/// Pick the first geocoding match for `city` out of a raw response body.
fn first_match(city: &str, body: &str) -> Result<ResolvedLocation> {
    let matches: Vec<OwGeoMatch> = serde_json::from_str(body)
        .map_err(|source| WeatherError::Parse { context: "OpenWeather geocoding", source })?;

    let item = matches
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::NotFound(city.to_string()))?;

    let name = [item.name, item.state, item.country]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    Ok(ResolvedLocation { name, lat: item.lat, lon: item.lon })
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn geocode(&self, city: &str) -> Result<ResolvedLocation> {
        let params = [("q", city.to_string()), ("limit", "1".to_string())];
        let body = self.get_text("OpenWeather geocoding", GEOCODING_URL, &params).await?;
        first_match(city, &body)
    }

    async fn current(&self, lat: f64, lon: f64, units: Units) -> Result<Value> {
        self.get_json("OpenWeather current weather", CURRENT_URL, lat, lon, units).await
    }

    async fn forecast(&self, lat: f64, lon: f64, units: Units) -> Result<Value> {
        self.get_json("OpenWeather forecast", FORECAST_URL, lat, lon, units).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
