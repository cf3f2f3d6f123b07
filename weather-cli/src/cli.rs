use std::{fmt::Write as _, path::PathBuf, process::ExitCode};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select};
use weather_core::{
    Config, LocationQuery, ReportRenderer, TextRenderer, Units, WeatherError, WeatherSource,
    lookup, source_from_config,
};

use crate::form;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-report",
    version,
    about = "Current weather and a daily forecast summary from OpenWeatherMap",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub lookup: LookupArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an API key and default units in the config file.
    Configure,
}

#[derive(Debug, Clone, Args)]
pub struct LookupArgs {
    /// City name, e.g. "Hyderabad,IN" or "London".
    #[arg(long, conflicts_with = "lat")]
    pub city: Option<String>,

    /// Latitude (decimal).
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude (decimal); required if --lat is used.
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// OpenWeatherMap API key (defaults to OPENWEATHER_API_KEY, then the config file).
    #[arg(long)]
    pub api_key: Option<String>,

    /// Units: metric (°C), imperial (°F), standard (K).
    #[arg(long, value_parser = parse_units)]
    pub units: Option<Units>,

    /// Save the raw responses to a JSON file.
    #[arg(long, value_name = "PATH")]
    pub save_json: Option<PathBuf>,

    /// Number of forecast days to show.
    #[arg(long, default_value_t = 5)]
    pub days: usize,

    /// Run the interactive form instead of printing a report.
    #[arg(long)]
    pub form: bool,
}

fn parse_units(value: &str) -> Result<Units, String> {
    value.parse().map_err(|err: WeatherError| err.to_string())
}

/// Everything a lookup needs once arguments, environment and config are merged.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: Config,
    pub api_key: String,
    pub units: Units,
    pub query: Option<LocationQuery>,
}

impl Cli {
    /// `env_key` is the value of `OPENWEATHER_API_KEY`, read once by `main`.
    pub async fn run(self, env_key: Option<String>) -> ExitCode {
        match self.command {
            Some(Command::Configure) => report_anyhow(configure()),
            None => self.lookup.run(env_key.as_deref()).await,
        }
    }
}

fn report_anyhow(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[!] Error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn report_weather(result: Result<(), WeatherError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", TextRenderer.error(&err));
            ExitCode::from(err.exit_code())
        }
    }
}

fn usage_error() -> WeatherError {
    WeatherError::Configuration(
        "Usage: provide --city 'City,COUNTRY' OR --lat LAT --lon LON\n\
         Example: weather-report --city 'Hyderabad,IN' --units metric"
            .to_string(),
    )
}

impl LookupArgs {
    /// Location from `--city` or `--lat`/`--lon`, if any was given.
    pub fn query(&self) -> Result<Option<LocationQuery>, WeatherError> {
        match (&self.city, self.lat, self.lon) {
            (Some(city), _, _) => Ok(Some(LocationQuery::City(city.clone()))),
            (None, Some(lat), Some(lon)) => Ok(Some(LocationQuery::Coordinates { lat, lon })),
            (None, Some(_), None) => Err(WeatherError::Configuration(
                "--lon is required when --lat is provided.".to_string(),
            )),
            (None, None, _) => Ok(None),
        }
    }

    /// Merge arguments with the environment key and the config file.
    /// Fails before any network call when the input is unusable.
    pub fn settings(&self, config: Config, env_key: Option<&str>) -> Result<Settings, WeatherError> {
        let query = self.query()?;
        if query.is_none() && !self.form {
            return Err(usage_error());
        }

        let api_key = config.resolve_api_key(self.api_key.as_deref(), env_key)?;
        let units = config.units_or_default(self.units);

        Ok(Settings { config, api_key, units, query })
    }

    async fn run(&self, env_key: Option<&str>) -> ExitCode {
        let prepared = Config::load()
            .map_err(|err| WeatherError::Configuration(format!("{err:#}")))
            .and_then(|config| self.settings(config, env_key))
            .and_then(|settings| {
                let source = source_from_config(&settings.config, settings.api_key.clone())?;
                Ok((settings, source))
            });

        let (settings, source) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => return report_weather(Err(err)),
        };

        if self.form {
            report_anyhow(form::run(self, &settings, source.as_ref()).await)
        } else {
            report_weather(self.run_text(settings, source.as_ref()).await.map(|out| print!("{out}")))
        }
    }

    /// Run the lookup and build the whole text report. The caller prints it,
    /// so a failed fetch leaves stdout empty.
    async fn run_text(&self, settings: Settings, source: &dyn WeatherSource) -> Result<String, WeatherError> {
        let query = settings.query.ok_or_else(usage_error)?;

        let renderer = TextRenderer;
        let report = lookup(source, &query, settings.units).await?;

        let mut out = renderer.location(&report.location);
        if let Some(path) = &self.save_json {
            report.save_json(path)?;
            let _ = writeln!(out, "[i] Saved raw data to {}", path.display());
        }

        out.push_str(&renderer.report(&report, self.days));
        Ok(out)
    }
}

/// Interactive prompt that stores credentials in the config file.
fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    let current = config.units_or_default(None);
    let cursor = Units::all().iter().position(|u| *u == current).unwrap_or(0);
    let units = Select::new("Default units:", Units::all().to_vec())
        .with_starting_cursor(cursor)
        .prompt()
        .context("Failed to read default units")?;

    config.api_key = Some(api_key.to_string());
    config.units = Some(units);

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}
