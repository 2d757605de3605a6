//! Multi-series line chart over the Likert domain, with a togglable legend.

use log::{debug, warn};
use std::collections::HashSet;

use crate::config::*;

/// Colors assigned to series in order, wrapping around.
pub const SERIES_PALETTE: [&str; 8] = [
    "#2563eb", "#dc2626", "#16a34a", "#d97706", "#7c3aed", "#0891b2", "#db2777", "#4b5563",
];

/// One series to draw: the distribution of answers to a question.
#[derive(PartialEq, Debug, Clone)]
pub struct SeriesInput {
    pub key: String,
    pub label: String,
    pub distribution: Distribution,
}

impl SeriesInput {
    pub fn from_question(q: &QuestionStat) -> SeriesInput {
        SeriesInput {
            key: q.key.clone(),
            label: q.display_label().to_string(),
            distribution: q.distribution.clone(),
        }
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Tick {
    pub value: f64,
    /// Coordinate along the axis (x for the domain axis, y for the count axis).
    pub position: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Axes {
    pub plot: PlotArea,
    pub max_y: u64,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
}

/// A laid-out series. Only `hidden` changes after layout.
#[derive(PartialEq, Debug, Clone)]
pub struct ChartSeries {
    pub key: String,
    pub label: String,
    pub color: String,
    pub points: Vec<Point>,
    pub hidden: bool,
}

impl ChartSeries {
    /// SVG path data for the polyline.
    pub fn path(&self) -> String {
        let mut out = String::new();
        for (idx, p) in self.points.iter().enumerate() {
            if idx > 0 {
                out.push(' ');
            }
            let cmd = if idx == 0 { 'M' } else { 'L' };
            out.push_str(&format!("{}{:.2},{:.2}", cmd, p.x, p.y));
        }
        out
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct LineChart {
    pub axes: Axes,
    pub series: Vec<ChartSeries>,
}

impl LineChart {
    /// Flips the visibility of one series. Returns the new `hidden` flag,
    /// or `None` if no series has this key.
    pub fn toggle(&mut self, key: &str) -> Option<bool> {
        let s = self.series.iter_mut().find(|s| s.key == key)?;
        s.hidden = !s.hidden;
        debug!("LineChart::toggle: {} hidden={}", key, s.hidden);
        Some(s.hidden)
    }

    /// The series the render surface should draw.
    pub fn visible(&self) -> impl Iterator<Item = &ChartSeries> {
        self.series.iter().filter(|s| !s.hidden)
    }
}

/// Lays out one polyline per series on shared axes.
///
/// The x axis is ordinal: domain values are spaced evenly, whatever their numeric gaps.
/// Counts map to `y = top + (1 - count / max_y) * height`, with `max_y` floored at 1.
pub fn layout_lines(
    series: &[SeriesInput],
    domain: &[LikertValue],
    plot: PlotArea,
) -> Result<LineChart, LayoutError> {
    if domain.is_empty() {
        return Err(LayoutError::EmptyDomain);
    }
    if let Some(v) = domain.iter().find(|v| !LIKERT_DOMAIN.contains(v)) {
        return Err(LayoutError::OutOfDomain(*v));
    }
    let valid_plot = [plot.left, plot.top, plot.width, plot.height]
        .iter()
        .all(|x| x.is_finite())
        && plot.width > 0.0
        && plot.height > 0.0;
    if !valid_plot {
        return Err(LayoutError::InvalidPlotArea(plot));
    }

    let max_y: u64 = series
        .iter()
        .flat_map(|s| domain.iter().map(move |v| s.distribution.count(*v)))
        .fold(1, u64::max);

    let x_at = |idx: usize| -> f64 {
        if domain.len() == 1 {
            plot.left + plot.width / 2.0
        } else {
            plot.left + plot.width * idx as f64 / (domain.len() - 1) as f64
        }
    };
    let y_at = |value: f64| -> f64 { plot.top + (1.0 - value / max_y as f64) * plot.height };

    let x_ticks: Vec<Tick> = domain
        .iter()
        .enumerate()
        .map(|(idx, v)| Tick {
            value: *v as f64,
            position: x_at(idx),
        })
        .collect();
    let y_ticks: Vec<Tick> = [0.0, 0.25, 0.5, 0.75, 1.0]
        .iter()
        .map(|q| {
            let value = q * max_y as f64;
            Tick {
                value,
                position: y_at(value),
            }
        })
        .collect();

    let mut out: Vec<ChartSeries> = Vec::with_capacity(series.len());
    for (idx, s) in series.iter().enumerate() {
        if out.iter().any(|c| c.key == s.key) {
            warn!(
                "layout_lines: duplicate series key {:?}, toggling will only reach the first one",
                s.key
            );
        }
        let points: Vec<Point> = domain
            .iter()
            .enumerate()
            .map(|(i, v)| Point::new(x_at(i), y_at(s.distribution.count(*v) as f64)))
            .collect();
        out.push(ChartSeries {
            key: s.key.clone(),
            label: s.label.clone(),
            color: SERIES_PALETTE[idx % SERIES_PALETTE.len()].to_string(),
            points,
            hidden: false,
        });
    }
    debug!(
        "layout_lines: {} series over {} domain values, max_y {}",
        out.len(),
        domain.len(),
        max_y
    );

    Ok(LineChart {
        axes: Axes {
            plot,
            max_y,
            x_ticks,
            y_ticks,
        },
        series: out,
    })
}

/// Legend visibility that outlives a single layout.
///
/// Every series starts visible; a click flips it between visible and hidden.
/// When a new snapshot replaces the chart, [`LegendState::apply`] carries the
/// hidden keys over to the freshly computed series.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct LegendState {
    hidden: HashSet<String>,
}

impl LegendState {
    pub fn new() -> LegendState {
        LegendState::default()
    }

    /// Returns the new `hidden` flag of the series.
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.hidden.remove(key) {
            false
        } else {
            self.hidden.insert(key.to_string());
            true
        }
    }

    pub fn is_hidden(&self, key: &str) -> bool {
        self.hidden.contains(key)
    }

    /// Flips the series as currently shown in `chart` and records the result.
    /// Keys absent from the chart are toggled in the legend only.
    pub fn toggle_in(&mut self, chart: &mut LineChart, key: &str) -> bool {
        let hidden = match chart.toggle(key) {
            Some(h) => h,
            None => !self.is_hidden(key),
        };
        if hidden {
            self.hidden.insert(key.to_string());
        } else {
            self.hidden.remove(key);
        }
        hidden
    }

    pub fn apply(&self, chart: &mut LineChart) {
        for s in chart.series.iter_mut() {
            s.hidden = self.hidden.contains(&s.key);
        }
    }
}
