//! Chart rendering and theme-driven restyling
//!
//! Each chart slot names a canvas that carries its data as JSON in
//! `data-labels` / `data-values`. Construction failures never escape this
//! module: a slot that cannot be built is logged and skipped so the rest of
//! the page keeps working.
//!
//! ## Structure
//! - `ChartBackend`: the seam to the charting library (Chart.js in the browser)
//! - `CssVariables`: theme colors published by the page stylesheet
//! - `ChartRenderer`: owns the live instances and restyles them on theme change

pub mod chartjs;
pub mod config;

use serde::{Deserialize, Serialize};

use crate::config::ChartSlot;
use crate::error::{DashboardError, Result};
use crate::models::Theme;
use crate::models::colors::{fallback_colors, grid_color};
use crate::theme::ThemeObserver;

pub use chartjs::{ChartJs, ComputedStyleVariables};
pub use config::ChartConfig;

/// CSS custom property for axis tick labels
pub const TICKS_VARIABLE: &str = "--card-header-color";
/// CSS custom property for legend labels
pub const LEGEND_VARIABLE: &str = "--heading-color";
/// CSS custom property matching the page background, used for doughnut borders
pub const BORDER_VARIABLE: &str = "--bg-color";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Doughnut,
}

impl ChartKind {
    /// Bar and line charts plot one series over ordered labels
    #[must_use]
    pub const fn is_trend(self) -> bool {
        matches!(self, Self::Bar | Self::Line)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Doughnut => "doughnut",
        }
    }
}

/// Labels and values of one chart, guaranteed to be the same length
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    labels: Vec<String>,
    values: Vec<f64>,
}

impl ChartSeries {
    /// # Errors
    ///
    /// Returns `MalformedData` when the two sequences differ in length.
    pub fn new(labels: Vec<String>, values: Vec<f64>) -> Result<Self> {
        if labels.len() != values.len() {
            return Err(DashboardError::MalformedData(format!(
                "{} labels but {} values",
                labels.len(),
                values.len()
            )));
        }
        Ok(Self { labels, values })
    }

    /// Parse the raw `data-labels` / `data-values` attribute values
    ///
    /// # Errors
    ///
    /// Returns `MalformedData` if either attribute is missing, is not a JSON
    /// array of the right element type, or the lengths differ.
    pub fn from_attributes(labels: Option<&str>, values: Option<&str>) -> Result<Self> {
        let (Some(labels), Some(values)) = (labels, values) else {
            return Err(DashboardError::MalformedData(
                "canvas is missing data-labels or data-values".to_string(),
            ));
        };
        let labels: Vec<String> = serde_json::from_str(labels)?;
        let values: Vec<f64> = serde_json::from_str(values)?;
        Self::new(labels, values)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<f64>) {
        (self.labels, self.values)
    }
}

/// Read access to the page's theme custom properties
pub trait CssVariables {
    /// Trimmed value of a custom property, `None` when unset or empty
    fn variable(&self, name: &str) -> Option<String>;
}

/// Theme-dependent chart colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeColors {
    pub grid: String,
    pub ticks: String,
    pub legend: String,
    pub border: String,
}

impl ThemeColors {
    /// Grid color is fixed per theme; the rest come from the stylesheet
    pub fn resolve(theme: Theme, vars: &impl CssVariables) -> Self {
        let fallback = fallback_colors(theme);
        let read = |name: &str, default: &str| {
            vars.variable(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self {
            grid: grid_color(theme).to_string(),
            ticks: read(TICKS_VARIABLE, fallback.ticks),
            legend: read(LEGEND_VARIABLE, fallback.legend),
            border: read(BORDER_VARIABLE, fallback.border),
        }
    }
}

/// One property assignment inside a live chart object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleEdit {
    /// Property path from the chart instance, array indices as strings
    pub path: &'static [&'static str],
    pub value: String,
}

const X_GRID: &[&str] = &["options", "scales", "x", "grid", "color"];
const Y_GRID: &[&str] = &["options", "scales", "y", "grid", "color"];
const X_TICKS: &[&str] = &["options", "scales", "x", "ticks", "color"];
const Y_TICKS: &[&str] = &["options", "scales", "y", "ticks", "color"];
const LEGEND_LABELS: &[&str] = &["options", "plugins", "legend", "labels", "color"];
const DATASET_BORDER: &[&str] = &["data", "datasets", "0", "borderColor"];

/// The property edits that bring a chart of `kind` in line with `colors`
#[must_use]
pub fn restyle_patch(kind: ChartKind, colors: &ThemeColors) -> Vec<StyleEdit> {
    let edit = |path, value: &str| StyleEdit {
        path,
        value: value.to_string(),
    };
    let mut patch = Vec::with_capacity(6);
    if kind.is_trend() {
        patch.push(edit(X_GRID, &colors.grid));
        patch.push(edit(Y_GRID, &colors.grid));
        patch.push(edit(X_TICKS, &colors.ticks));
        patch.push(edit(Y_TICKS, &colors.ticks));
    }
    patch.push(edit(LEGEND_LABELS, &colors.legend));
    if !kind.is_trend() {
        patch.push(edit(DATASET_BORDER, &colors.border));
    }
    patch
}

/// The charting library, as seen by the renderer
pub trait ChartBackend {
    /// A live chart instance
    type Handle;

    /// Whether the library is loaded on the page
    fn is_available(&self) -> bool;

    /// Raw `data-labels` and `data-values` of a canvas
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` if the canvas does not exist.
    fn read_data(&self, canvas_id: &str) -> Result<(Option<String>, Option<String>)>;

    /// Construct a chart on the canvas
    ///
    /// # Errors
    ///
    /// Returns an error if the library rejects the config or the canvas has
    /// no 2D context.
    fn create(&self, canvas_id: &str, config: &ChartConfig) -> Result<Self::Handle>;

    /// Apply property edits to a live chart, then redraw it
    ///
    /// # Errors
    ///
    /// Returns an error if a property cannot be written or the redraw throws.
    fn restyle(&self, handle: &Self::Handle, patch: &[StyleEdit]) -> Result<()>;

    /// Release the chart and its canvas bindings
    fn destroy(&self, handle: Self::Handle);
}

/// A constructed chart bound to its slot
#[derive(Debug)]
pub struct LiveChart<H> {
    pub slot: ChartSlot,
    pub handle: H,
    /// Theme the instance is currently styled for
    pub theme: Theme,
}

/// Owns every live chart on the page
pub struct ChartRenderer<B: ChartBackend, V: CssVariables> {
    backend: B,
    vars: V,
    charts: Vec<LiveChart<B::Handle>>,
}

impl<B: ChartBackend, V: CssVariables> ChartRenderer<B, V> {
    pub fn new(backend: B, vars: V) -> Self {
        Self {
            backend,
            vars,
            charts: Vec::new(),
        }
    }

    /// Build every slot, skipping (and logging) the ones that fail
    ///
    /// Returns the number of charts built.
    pub fn build_all(&mut self, slots: &[ChartSlot], theme: Theme) -> usize {
        let mut built = 0;
        for slot in slots {
            match self.build(slot, theme) {
                Ok(chart) => {
                    log::debug!("built {} chart on #{}", slot.kind.as_str(), slot.canvas_id);
                    self.charts.push(chart);
                    built += 1;
                }
                Err(DashboardError::ElementNotFound(what)) => {
                    log::debug!("chart slot skipped, {what} is not on this page");
                }
                Err(err) => log::error!("chart #{} not rendered: {err}", slot.canvas_id),
            }
        }
        built
    }

    /// Construct one chart styled for `theme`
    ///
    /// # Errors
    ///
    /// Returns `LibraryMissing`, `ElementNotFound`, `MalformedData`, or the
    /// backend's construction error.
    pub fn build(&self, slot: &ChartSlot, theme: Theme) -> Result<LiveChart<B::Handle>> {
        if !self.backend.is_available() {
            return Err(DashboardError::LibraryMissing);
        }
        let (labels, values) = self.backend.read_data(&slot.canvas_id)?;
        let series = ChartSeries::from_attributes(labels.as_deref(), values.as_deref())?;
        let colors = ThemeColors::resolve(theme, &self.vars);
        let config = ChartConfig::for_kind(slot.kind, &slot.label, series, &colors);
        let handle = self.backend.create(&slot.canvas_id, &config)?;
        Ok(LiveChart {
            slot: slot.clone(),
            handle,
            theme,
        })
    }

    /// Restyle a live chart for `theme` without rebuilding it
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the edits cannot be applied.
    pub fn update_chart_theme(&self, chart: &mut LiveChart<B::Handle>, theme: Theme) -> Result<()> {
        let colors = ThemeColors::resolve(theme, &self.vars);
        let patch = restyle_patch(chart.slot.kind, &colors);
        self.backend.restyle(&chart.handle, &patch)?;
        chart.theme = theme;
        Ok(())
    }

    /// Restyle every live chart, logging individual failures
    pub fn restyle_all(&mut self, theme: Theme) {
        let mut charts = std::mem::take(&mut self.charts);
        for chart in &mut charts {
            if let Err(err) = self.update_chart_theme(chart, theme) {
                log::warn!("could not restyle chart #{}: {err}", chart.slot.canvas_id);
            }
        }
        self.charts = charts;
    }

    #[must_use]
    pub fn charts(&self) -> &[LiveChart<B::Handle>] {
        &self.charts
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Destroy every live chart
    pub fn teardown(&mut self) {
        for chart in self.charts.drain(..) {
            self.backend.destroy(chart.handle);
        }
    }
}

impl<B: ChartBackend, V: CssVariables> ThemeObserver for ChartRenderer<B, V> {
    fn theme_changed(&mut self, theme: Theme) {
        self.restyle_all(theme);
    }
}
