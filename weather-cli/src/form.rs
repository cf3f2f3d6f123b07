//! Interactive form: collect a location and units, then show the report
//! through [`FormRenderer`]. Lookup failures are shown inline and the user
//! can try again.

use std::fmt;

use anyhow::Result;
use inquire::{Confirm, InquireError, Select, Text};
use weather_core::{
    FormRenderer, LocationQuery, ReportRenderer, Units, WeatherError, WeatherSource, lookup,
};

use crate::cli::{LookupArgs, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchMode {
    City,
    Coordinates,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchMode::City => "City name",
            SearchMode::Coordinates => "Coordinates",
        })
    }
}

/// Raw values as typed into the form.
#[derive(Debug, Clone, PartialEq)]
struct FormInput {
    mode: SearchMode,
    city: String,
    lat: String,
    lon: String,
}

impl FormInput {
    /// Validate the fields for the chosen mode. The error is shown inline.
    fn query(&self) -> Result<LocationQuery, String> {
        match self.mode {
            SearchMode::City => {
                let city = self.city.trim();
                if city.is_empty() {
                    return Err("Enter a city name.".to_string());
                }
                Ok(LocationQuery::City(city.to_string()))
            }
            SearchMode::Coordinates => {
                let (lat, lon) = (self.lat.trim(), self.lon.trim());
                if lat.is_empty() || lon.is_empty() {
                    return Err("Enter latitude and longitude.".to_string());
                }
                let lat = lat.parse::<f64>().map_err(|_| format!("Invalid latitude '{lat}'."))?;
                let lon = lon.parse::<f64>().map_err(|_| format!("Invalid longitude '{lon}'."))?;
                Ok(LocationQuery::Coordinates { lat, lon })
            }
        }
    }
}

fn fmt_coord(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Run the form until the user declines another lookup or cancels a prompt.
pub async fn run(args: &LookupArgs, settings: &Settings, source: &dyn WeatherSource) -> Result<()> {
    let renderer = FormRenderer;
    let mut units = settings.units;
    let mut input = FormInput {
        mode: if args.lat.is_some() { SearchMode::Coordinates } else { SearchMode::City },
        city: args.city.clone().unwrap_or_default(),
        lat: fmt_coord(args.lat),
        lon: fmt_coord(args.lon),
    };

    println!("Weather Report (OpenWeatherMap)");

    loop {
        match prompt(&input, units) {
            Ok((next_input, next_units)) => {
                input = next_input;
                units = next_units;
            }
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }

        match input.query() {
            Ok(query) => {
                match render_lookup(&renderer, source, &query, units, args.days).await {
                    Ok(out) => print!("{out}"),
                    Err(err) => {
                        tracing::debug!(error = %err, "form lookup failed");
                        println!("{}", renderer.error(&err));
                    }
                }
            }
            Err(message) => println!("{}", renderer.error(&message)),
        }

        let again = Confirm::new("Look up another location?").with_default(false).prompt();
        match again {
            Ok(true) => continue,
            Ok(false) | Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }
    }
}

fn prompt(previous: &FormInput, units: Units) -> Result<(FormInput, Units), InquireError> {
    let modes = vec![SearchMode::City, SearchMode::Coordinates];
    let cursor = modes.iter().position(|m| *m == previous.mode).unwrap_or(0);
    let mode = Select::new("Search by", modes).with_starting_cursor(cursor).prompt()?;

    let mut input = FormInput { mode, ..previous.clone() };
    match mode {
        SearchMode::City => {
            input.city = Text::new("City (e.g. Hyderabad,IN)")
                .with_initial_value(&previous.city)
                .prompt()?;
        }
        SearchMode::Coordinates => {
            input.lat = Text::new("Latitude").with_initial_value(&previous.lat).prompt()?;
            input.lon = Text::new("Longitude").with_initial_value(&previous.lon).prompt()?;
        }
    }

    let cursor = Units::all().iter().position(|u| *u == units).unwrap_or(0);
    let units = Select::new("Units", Units::all().to_vec()).with_starting_cursor(cursor).prompt()?;

    Ok((input, units))
}

/// Full lookup rendered as one block. Nothing is produced unless every call
/// succeeded.
async fn render_lookup(
    renderer: &FormRenderer,
    source: &dyn WeatherSource,
    query: &LocationQuery,
    units: Units,
    days: usize,
) -> Result<String, WeatherError> {
    let report = lookup(source, query, units).await?;

    let mut out = renderer.location(&report.location);
    out.push_str(&renderer.report(&report, days));
    Ok(out)
}
