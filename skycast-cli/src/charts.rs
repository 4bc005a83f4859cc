//! Terminal charts and the registry that owns them.

use std::collections::BTreeMap;
use std::fmt::Debug;

use chrono::NaiveDateTime;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A drawn chart owned by the registry.
pub trait ChartHandle: Debug {
    /// Rendered text, one line per row.
    fn render(&self) -> String;

    /// Release whatever the chart holds. Called exactly once, before the
    /// handle is dropped or replaced.
    fn dispose(&mut self);
}

/// Owns at most one chart per id.
#[derive(Debug, Default)]
pub struct ChartRegistry {
    charts: BTreeMap<String, Box<dyn ChartHandle>>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handle` under `id`, disposing the chart it replaces.
    pub fn replace(&mut self, id: impl Into<String>, handle: Box<dyn ChartHandle>) {
        let id = id.into();
        if let Some(mut previous) = self.charts.insert(id.clone(), handle) {
            tracing::debug!(chart = %id, "disposing replaced chart");
            previous.dispose();
        }
    }

    /// Dispose and remove every chart whose id starts with `prefix`.
    pub fn remove_prefixed(&mut self, prefix: &str) -> usize {
        let ids: Vec<String> = self
            .charts
            .keys()
            .filter(|id| id.starts_with(prefix))
            .cloned()
            .collect();

        for id in &ids {
            if let Some(mut chart) = self.charts.remove(id) {
                chart.dispose();
            }
        }
        ids.len()
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }
}

impl Drop for ChartRegistry {
    fn drop(&mut self) {
        for chart in self.charts.values_mut() {
            chart.dispose();
        }
    }
}

/// Display title and unit for an Open-Meteo channel.
pub fn channel_label(channel: &str) -> (&'static str, &'static str) {
    match channel {
        "temperature_2m" => ("Temperature", "°C"),
        "relative_humidity_2m" => ("Humidity", "%"),
        "weather_code" => ("Weather code", ""),
        "precipitation" => ("Precipitation", "mm"),
        "pm2_5" => ("PM2.5", "µg/m³"),
        "pm10" => ("PM10", "µg/m³"),
        "ozone" => ("Ozone", "µg/m³"),
        "nitrogen_dioxide" => ("NO₂", "µg/m³"),
        "carbon_monoxide" => ("CO", "µg/m³"),
        _ => ("Unknown channel", ""),
    }
}

/// One-line bar chart of an hourly channel.
#[derive(Debug, Clone)]
pub struct Sparkline {
    title: String,
    unit: &'static str,
    values: Vec<Option<f64>>,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    disposed: bool,
}

impl Sparkline {
    pub fn new(channel: &str, values: &[Option<f64>], timestamps: &[NaiveDateTime]) -> Self {
        let (title, unit) = channel_label(channel);
        Self {
            title: title.to_string(),
            unit,
            values: values.to_vec(),
            start: timestamps.first().copied(),
            end: timestamps.last().copied(),
            disposed: false,
        }
    }

    fn range(&self) -> Option<(f64, f64)> {
        self.values.iter().flatten().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    pub fn bars(&self) -> String {
        let Some((lo, hi)) = self.range() else {
            return " ".repeat(self.values.len());
        };
        let span = hi - lo;

        self.values
            .iter()
            .map(|v| match v {
                None => ' ',
                Some(_) if span == 0.0 => BARS[BARS.len() / 2],
                Some(v) => {
                    let level = ((v - lo) / span * (BARS.len() - 1) as f64).round() as usize;
                    BARS[level.min(BARS.len() - 1)]
                }
            })
            .collect()
    }
}

impl ChartHandle for Sparkline {
    fn render(&self) -> String {
        if self.disposed {
            return String::new();
        }

        let range = match self.range() {
            Some((lo, hi)) => format!("{lo:.1}–{hi:.1} {}", self.unit),
            None => "no data".to_string(),
        };
        let span = match (self.start, self.end) {
            (Some(s), Some(e)) => format!("{} → {}", s.format("%H:%M"), e.format("%H:%M")),
            _ => String::new(),
        };

        format!("  {:<14} {}  {range}  {span}", self.title, self.bars())
            .trim_end()
            .to_string()
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug)]
    struct Probe {
        disposed: Rc<Cell<u32>>,
    }

    impl ChartHandle for Probe {
        fn render(&self) -> String {
            "probe".to_string()
        }

        fn dispose(&mut self) {
            self.disposed.set(self.disposed.get() + 1);
        }
    }

    fn probe(counter: &Rc<Cell<u32>>) -> Box<dyn ChartHandle> {
        Box::new(Probe {
            disposed: Rc::clone(counter),
        })
    }

    #[test]
    fn replace_disposes_previous_handle() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let mut registry = ChartRegistry::new();

        registry.replace("weather/temperature_2m", probe(&first));
        assert_eq!(first.get(), 0);

        registry.replace("weather/temperature_2m", probe(&second));
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_prefixed_only_touches_that_domain() {
        let weather = Rc::new(Cell::new(0));
        let air = Rc::new(Cell::new(0));
        let mut registry = ChartRegistry::new();

        registry.replace("weather/temperature_2m", probe(&weather));
        registry.replace("weather/precipitation", probe(&weather));
        registry.replace("air/pm2_5", probe(&air));

        assert_eq!(registry.remove_prefixed("weather/"), 2);
        assert_eq!(weather.get(), 2);
        assert_eq!(air.get(), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn dropping_registry_disposes_everything() {
        let counter = Rc::new(Cell::new(0));
        {
            let mut registry = ChartRegistry::new();
            registry.replace("a", probe(&counter));
            registry.replace("b", probe(&counter));
        }
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn sparkline_scales_between_min_and_max() {
        let line = Sparkline::new("pm2_5", &[Some(0.0), Some(5.0), None, Some(10.0)], &[]);
        assert_eq!(line.bars(), "▁▅ █");
    }

    #[test]
    fn flat_sparkline_uses_middle_bar() {
        let line = Sparkline::new("temperature_2m", &[Some(20.0), Some(20.0)], &[]);
        assert_eq!(line.bars(), "▅▅");
    }

    #[test]
    fn render_includes_title_and_range() {
        let line = Sparkline::new("temperature_2m", &[Some(18.0), Some(24.0)], &[]);
        let text = line.render();

        assert!(text.contains("Temperature"));
        assert!(text.contains("18.0–24.0 °C"));
    }

    #[test]
    fn disposed_sparkline_renders_nothing() {
        let mut line = Sparkline::new("ozone", &[Some(1.0)], &[]);
        line.dispose();
        assert!(line.render().is_empty());
    }
}
