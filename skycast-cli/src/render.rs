//! Text panels, charts and the error surface.

use std::io::Write;

use skycast_core::{
    AirQualitySnapshot, HOURLY_WINDOW, HourlySeries, Phase, Presenter, SeriesDomain, StatusTier,
    WeatherSnapshot,
};

use crate::charts::{ChartHandle, ChartRegistry, Sparkline};

const NOT_AVAILABLE: &str = "not available";

/// Writes panels and charts to `out` and the error surface to `err`.
#[derive(Debug)]
pub struct TerminalPresenter<W: Write, E: Write> {
    out: W,
    err: E,
    charts: ChartRegistry,
    error: Option<String>,
}

impl<W: Write, E: Write> TerminalPresenter<W, E> {
    pub fn new(out: W, err: E) -> Self {
        Self {
            out,
            err,
            charts: ChartRegistry::new(),
            error: None,
        }
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::warn!(error = %e, "failed to write dashboard output");
        }
    }
}

impl<W: Write, E: Write> Presenter for TerminalPresenter<W, E> {
    fn clear_error(&mut self) {
        self.error = None;
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
        if let Err(e) = writeln!(self.err, "error: {message}") {
            tracing::warn!(error = %e, "failed to write error message");
        }
    }

    fn render_panels(&mut self, weather: &WeatherSnapshot, air_quality: &AirQualitySnapshot) {
        let text = format!(
            "{}\n\n{}",
            weather_panel(weather),
            air_quality_panel(air_quality)
        );
        self.emit(&text);
    }

    fn render_series(&mut self, domain: SeriesDomain, series: Option<&HourlySeries>) {
        let prefix = format!("{domain}/");
        let heading = match domain {
            SeriesDomain::Weather => "Hourly weather (next 24h)",
            SeriesDomain::Air => "Hourly air quality (next 24h)",
        };

        let Some(series) = series else {
            self.charts.remove_prefixed(&prefix);
            self.emit(&format!("\n{heading}: {NOT_AVAILABLE}"));
            return;
        };

        let window = series.window(HOURLY_WINDOW);
        let mut lines = vec![format!("\n{heading}")];
        for (channel, values) in window.channels() {
            // Codes are categorical, a bar height means nothing for them.
            if channel == "weather_code" {
                continue;
            }
            let id = format!("{prefix}{channel}");
            let chart = Sparkline::new(channel, values, window.timestamps());
            lines.push(chart.render());
            self.charts.replace(id, Box::new(chart));
        }
        self.emit(&lines.join("\n"));
    }

    fn phase_changed(&mut self, phase: Phase) {
        tracing::debug!(%phase, charts = self.charts.len(), "presenter phase");
    }
}

/// Presenter that shows nothing; the caller uses the returned bundle instead.
#[derive(Debug, Default)]
pub struct Silent;

impl Presenter for Silent {
    fn clear_error(&mut self) {}

    fn show_error(&mut self, _message: &str) {}

    fn render_panels(&mut self, _weather: &WeatherSnapshot, _air_quality: &AirQualitySnapshot) {}

    fn render_series(&mut self, _domain: SeriesDomain, _series: Option<&HourlySeries>) {}
}

pub fn weather_panel(weather: &WeatherSnapshot) -> String {
    let place = if weather.country_code.is_empty() {
        weather.city_name.clone()
    } else {
        format!("{}, {}", weather.city_name, weather.country_code)
    };

    [
        place,
        format!("  {:<14}{}°C", "Temperature", weather.temperature_c),
        format!("  {:<14}{}", "Conditions", weather.description),
        format!("  {:<14}{}%", "Humidity", weather.humidity_pct),
        format!("  {:<14}{} m/s", "Wind", weather.wind_speed_mps),
    ]
    .join("\n")
}

pub fn air_quality_panel(air: &AirQualitySnapshot) -> String {
    let tier = match StatusTier::from_label(&air.status_label) {
        StatusTier::Good => "good",
        StatusTier::Moderate => "moderate",
        StatusTier::Unhealthy => "unhealthy",
    };

    let (pm25, index) = match air.reading {
        Some(r) => (format!("{:.1} µg/m³", r.pm25), r.index.to_string()),
        None => (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()),
    };

    let header = match air.reading {
        Some(_) => format!("Air quality [{tier}]"),
        None => "Air quality".to_string(),
    };

    [
        header,
        format!("  {:<14}{}", "PM2.5", pm25),
        format!("  {:<14}{}", "AQI", index),
        format!("  {:<14}{}", "Status", air.status_label),
    ]
    .join("\n")
}
