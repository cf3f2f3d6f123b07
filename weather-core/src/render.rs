//! Presentation of a [`WeatherReport`].
//!
//! Renderers only format: they never reorder or filter the summaries beyond
//! cutting the list to the requested number of days, and they never convert
//! values between units, only pick the label.

use std::fmt::{Display, Write as _};

use crate::{
    Units,
    model::{CurrentWeather, DaySummary, NOT_AVAILABLE, ResolvedLocation, or_na},
    report::WeatherReport,
};

const ICON_URL: &str = "http://openweathermap.org/img/wn";

pub trait ReportRenderer {
    fn location(&self, location: &ResolvedLocation) -> String;

    fn current(&self, current: &CurrentWeather, units: Units) -> String;

    /// At most `days` summaries, starting with the earliest.
    fn forecast(&self, summaries: &[DaySummary], units: Units, days: usize) -> String;

    fn error(&self, message: &dyn Display) -> String;

    fn report(&self, report: &WeatherReport, days: usize) -> String {
        let mut out = self.current(&report.current, report.units);
        out.push_str(&self.forecast(&report.days, report.units, days));
        out
    }
}

/// First `days` summaries, or all of them when fewer are available.
pub fn visible_days(summaries: &[DaySummary], days: usize) -> &[DaySummary] {
    &summaries[..days.min(summaries.len())]
}

/// Line-oriented output for a terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl ReportRenderer for TextRenderer {
    fn location(&self, location: &ResolvedLocation) -> String {
        format!(
            "[i] Resolved location: {} (lat={:?}, lon={:?})\n",
            location.name, location.lat, location.lon
        )
    }

    fn current(&self, current: &CurrentWeather, units: Units) -> String {
        let u = units.temperature_label();
        let condition = current.condition();
        let main = &current.main;
        let wind = &current.wind;

        let mut out = String::new();
        let _ = writeln!(out, "\nCurrent weather — {}", current.place());
        let _ = writeln!(out, "  As of: {} (local)", current.local_time());
        let _ = writeln!(
            out,
            "  Condition : {} — {}",
            condition.main.as_deref().unwrap_or(""),
            condition.description.as_deref().unwrap_or("")
        );
        let _ = writeln!(
            out,
            "  Temperature: {}{u} (feels like {}{u})",
            or_na(main.temp),
            or_na(main.feels_like)
        );
        let _ = writeln!(out, "  Min / Max : {}{u} / {}{u}", or_na(main.temp_min), or_na(main.temp_max));
        let _ = writeln!(out, "  Humidity  : {}%", or_na(main.humidity));
        let _ = writeln!(out, "  Pressure  : {} hPa", or_na(main.pressure));
        let _ = writeln!(out, "  Wind      : {} m/s, gust {}", or_na(wind.speed), or_na(wind.gust));
        if let Some(coord) = &current.coord {
            let _ = writeln!(out, "  Coordinates: lat={}, lon={}", or_na(coord.lat), or_na(coord.lon));
        }
        out.push('\n');
        out
    }

    fn forecast(&self, summaries: &[DaySummary], units: Units, days: usize) -> String {
        let u = units.temperature_label();
        let shown = visible_days(summaries, days);

        let mut out = format!("Forecast summary (next {} days):\n", shown.len());
        for day in shown {
            let _ = writeln!(
                out,
                "  {} — {:20}  min:{:.1}{u}  max:{:.1}{u}  avg:{:.1}{u}",
                day.date,
                capitalize(&day.typical_condition),
                day.min_temp,
                day.max_temp,
                day.avg_temp
            );
        }
        out.push('\n');
        out
    }

    fn error(&self, message: &dyn Display) -> String {
        format!("[!] Error: {message}")
    }
}

/// Form-UI output: labelled sections and an inline error panel.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormRenderer;

impl FormRenderer {
    fn section(title: &str) -> String {
        format!("\n── {title} {}\n", "─".repeat(40usize.saturating_sub(title.chars().count())))
    }
}

impl ReportRenderer for FormRenderer {
    fn location(&self, location: &ResolvedLocation) -> String {
        format!("Location: {} (lat={:?}, lon={:?})\n", location.name, location.lat, location.lon)
    }

    fn current(&self, current: &CurrentWeather, units: Units) -> String {
        let u = units.temperature_label();
        let condition = current.condition();
        let main = &current.main;

        let mut out = Self::section("Current Weather");
        let _ = writeln!(out, "As of: {}", current.local_time());
        let _ = writeln!(
            out,
            "{} — {}",
            condition.main.as_deref().unwrap_or(""),
            condition.description.as_deref().unwrap_or("")
        );
        let _ = writeln!(out, "Temp: {}{u}  Feels: {}{u}", or_na(main.temp), or_na(main.feels_like));
        let _ = writeln!(out, "Humidity: {}%", or_na(main.humidity));
        let _ = writeln!(out, "Pressure: {} hPa", or_na(main.pressure));
        let _ = writeln!(out, "Wind: {} m/s", or_na(current.wind.speed));
        if let Some(icon) = condition.icon.as_deref().filter(|icon| !icon.is_empty()) {
            let _ = writeln!(out, "Icon: {ICON_URL}/{icon}@2x.png");
        }
        out
    }

    fn forecast(&self, summaries: &[DaySummary], units: Units, days: usize) -> String {
        let u = units.temperature_label();

        let mut out = Self::section("Forecast summary");
        let shown = visible_days(summaries, days);
        if shown.is_empty() {
            let _ = writeln!(out, "{NOT_AVAILABLE}");
        }
        for day in shown {
            let _ = writeln!(
                out,
                "{} — {}  min:{:.1}{u}  max:{:.1}{u}  avg:{:.1}{u}",
                day.date,
                title_case(&day.typical_condition),
                day.min_temp,
                day.max_temp,
                day.avg_temp
            );
        }
        out
    }

    fn error(&self, message: &dyn Display) -> String {
        let text = format!("Error: {message}");
        let width = text.lines().map(|line| line.chars().count()).max().unwrap_or(0);

        let mut out = format!("┌{}┐\n", "─".repeat(width + 2));
        for line in text.lines() {
            let pad = width - line.chars().count();
            let _ = writeln!(out, "│ {line}{} │", " ".repeat(pad));
        }
        let _ = write!(out, "└{}┘", "─".repeat(width + 2));
        out
    }
}

/// Upper-case the first character and lower-case the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
    }
}

/// Upper-case every letter that follows a non-letter, lower-case the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{
        lookup,
        tests::{FakeSource, current_payload},
    };
    use crate::model::LocationQuery;
    use chrono::NaiveDate;
    use serde_json::json;

    fn day(d: u32, min: f64, max: f64, avg: f64, cond: &str) -> DaySummary {
        DaySummary {
            date: NaiveDate::from_ymd_opt(2024, 3, d).unwrap(),
            min_temp: min,
            max_temp: max,
            avg_temp: avg,
            typical_condition: cond.to_string(),
            typical_icon: None,
        }
    }

    fn two_days() -> Vec<DaySummary> {
        vec![day(10, 10.0, 20.0, 15.0, "clear sky"), day(11, 4.04, 9.96, 7.24, "LIGHT rain")]
    }

    #[test]
    fn forecast_renders_only_available_days() {
        let out = TextRenderer.forecast(&two_days(), Units::Metric, 5);

        assert!(out.starts_with("Forecast summary (next 2 days):\n"));
        assert_eq!(out.lines().filter(|l| l.starts_with("  2024-")).count(), 2);
    }

    #[test]
    fn forecast_truncates_to_requested_days() {
        let out = TextRenderer.forecast(&two_days(), Units::Metric, 1);

        assert!(out.starts_with("Forecast summary (next 1 days):\n"));
        assert!(out.contains("2024-03-10"));
        assert!(!out.contains("2024-03-11"));
        assert_eq!(visible_days(&two_days(), 0).len(), 0);
    }

    #[test]
    fn text_forecast_line_layout() {
        let out = TextRenderer.forecast(&two_days(), Units::Metric, 5);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(
            lines[1],
            "  2024-03-10 — Clear sky             min:10.0°C  max:20.0°C  avg:15.0°C"
        );
        assert_eq!(
            lines[2],
            "  2024-03-11 — Light rain            min:4.0°C  max:10.0°C  avg:7.2°C"
        );
    }

    #[test]
    fn imperial_only_changes_the_label() {
        let out = TextRenderer.forecast(&two_days(), Units::Imperial, 5);
        assert!(out.contains("min:10.0°F  max:20.0°F  avg:15.0°F"));
        assert!(!out.contains("°C"));

        let out = FormRenderer.forecast(&two_days(), Units::Standard, 5);
        assert!(out.contains("min:10.0K  max:20.0K  avg:15.0K"));
    }

    #[test]
    fn text_current_block() {
        let current = CurrentWeather::from_payload(&current_payload()).unwrap();
        let out = TextRenderer.current(&current, Units::Metric);

        assert!(out.contains("Current weather — Hyderabad, IN\n"));
        assert!(out.contains("  As of: 2024-03-11 05:29 (local)\n"));
        assert!(out.contains("  Condition : Clear — clear sky\n"));
        assert!(out.contains("  Temperature: 31.2°C (feels like 33.1°C)\n"));
        assert!(out.contains("  Min / Max : 30°C / 32.5°C\n"));
        assert!(out.contains("  Humidity  : 40%\n"));
        assert!(out.contains("  Pressure  : 1009 hPa\n"));
        assert!(out.contains("  Wind      : 3.6 m/s, gust 5.1\n"));
        assert!(out.contains("  Coordinates: lat=17.38, lon=78.48\n"));
    }

    #[test]
    fn text_current_falls_back_to_na() {
        let current = CurrentWeather::from_payload(&json!({ "name": "Nowhere" })).unwrap();
        let out = TextRenderer.current(&current, Units::Imperial);

        assert!(out.contains("Current weather — Nowhere\n"));
        assert!(out.contains("  Condition :  — \n"));
        assert!(out.contains("  Temperature: N/A°F (feels like N/A°F)\n"));
        assert!(out.contains("  Wind      : N/A m/s, gust N/A\n"));
        assert!(!out.contains("Coordinates"));
    }

    #[test]
    fn form_current_shows_icon_url() {
        let current = CurrentWeather::from_payload(&current_payload()).unwrap();
        let out = FormRenderer.current(&current, Units::Metric);

        assert!(out.contains("Current Weather"));
        assert!(out.contains("Temp: 31.2°C  Feels: 33.1°C\n"));
        assert!(out.contains("Icon: http://openweathermap.org/img/wn/01d@2x.png\n"));
    }

    #[test]
    fn form_forecast_uses_title_case() {
        let out = FormRenderer.forecast(&two_days(), Units::Metric, 5);
        assert!(out.contains("2024-03-10 — Clear Sky  min:10.0°C"));
        assert!(out.contains("2024-03-11 — Light Rain  min:4.0°C"));
    }

    #[test]
    fn form_forecast_without_days_says_so() {
        let out = FormRenderer.forecast(&[], Units::Metric, 5);
        assert!(out.trim_end().ends_with(NOT_AVAILABLE));
    }

    #[test]
    fn errors_render_per_surface() {
        assert_eq!(TextRenderer.error(&"Could not find location for 'x'"), "[!] Error: Could not find location for 'x'");

        let panel = FormRenderer.error(&"Enter a city name.");
        let lines: Vec<&str> = panel.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "│ Error: Enter a city name. │");
        assert!(lines.iter().all(|l| l.chars().count() == lines[0].chars().count()));
    }

    #[test]
    fn location_lines() {
        let loc = ResolvedLocation { name: "London, GB".into(), lat: 51.5, lon: -0.12 };
        assert_eq!(TextRenderer.location(&loc), "[i] Resolved location: London, GB (lat=51.5, lon=-0.12)\n");
        assert_eq!(FormRenderer.location(&loc), "Location: London, GB (lat=51.5, lon=-0.12)\n");

        let whole = ResolvedLocation::from_coordinates(51.0, 0.0);
        assert_eq!(TextRenderer.location(&whole), "[i] Resolved location: 51.0,0.0 (lat=51.0, lon=0.0)\n");
    }

    #[tokio::test]
    async fn both_renderers_render_the_same_report() {
        let source = FakeSource::default();
        let report = lookup(&source, &LocationQuery::City("Hyderabad".into()), Units::Metric)
            .await
            .unwrap();

        for out in [TextRenderer.report(&report, 5), FormRenderer.report(&report, 5)] {
            assert!(out.contains("2024-03-10"));
            assert!(out.contains("2024-03-11"));
            assert!(out.contains("min:10.0°C  max:20.0°C  avg:15.0°C"));
        }
    }

    #[test]
    fn case_helpers() {
        assert_eq!(capitalize("cLEAR sky"), "Clear sky");
        assert_eq!(capitalize(""), "");
        assert_eq!(title_case("light intensity drizzle"), "Light Intensity Drizzle");
        assert_eq!(title_case("thunderstorm/RAIN"), "Thunderstorm/Rain");
    }
}
