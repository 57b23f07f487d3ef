//! Chart.js configuration objects
//!
//! Plain serde structs that serialize to the option tree Chart.js expects.
//! The backend hands them to the library through `serde-wasm-bindgen`.

use serde::Serialize;

use super::{ChartKind, ChartSeries, ThemeColors};
use crate::models::colors::{TOOLTIP_BACKGROUND, TREND_ACCENT, distribution_colors};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// Either one color for the whole series or one per data point
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Single(String),
    PerPoint(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub background_color: ColorSpec,
    pub border_color: String,
    pub border_width: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cutout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scales: Option<Scales>,
    pub plugins: Plugins,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scales {
    pub x: Axis,
    pub y: Axis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_at_zero: Option<bool>,
    pub grid: Grid,
    pub ticks: Ticks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub color: String,
    pub border_color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticks {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plugins {
    pub legend: Legend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Tooltip>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Legend {
    pub display: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    pub labels: LegendLabels,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendLabels {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub background_color: String,
    pub title_font: Font,
    pub body_font: Font,
    pub padding: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Font {
    pub size: u32,
}

impl ChartConfig {
    /// Build the config for a slot of any kind
    #[must_use]
    pub fn for_kind(kind: ChartKind, label: &str, series: ChartSeries, colors: &ThemeColors) -> Self {
        if kind.is_trend() {
            Self::trend(kind, label, series, colors)
        } else {
            Self::distribution(label, series, colors)
        }
    }

    /// Single-series bar or line chart over ordered labels
    #[must_use]
    pub fn trend(kind: ChartKind, label: &str, series: ChartSeries, colors: &ThemeColors) -> Self {
        let axis = |begin_at_zero: Option<bool>, integer_ticks: bool| Axis {
            begin_at_zero,
            grid: Grid {
                color: colors.grid.clone(),
                border_color: colors.grid.clone(),
            },
            ticks: Ticks {
                color: colors.ticks.clone(),
                step_size: integer_ticks.then_some(1),
                precision: integer_ticks.then_some(0),
            },
        };

        let (labels, values) = series.into_parts();
        Self {
            kind,
            data: ChartData {
                labels,
                datasets: vec![Dataset {
                    label: label.to_string(),
                    data: values,
                    background_color: ColorSpec::Single(TREND_ACCENT.to_rgba(0.5)),
                    border_color: TREND_ACCENT.to_rgba(1.0),
                    border_width: 1,
                    border_radius: Some(4),
                }],
            },
            options: ChartOptions {
                responsive: true,
                maintain_aspect_ratio: false,
                cutout: None,
                scales: Some(Scales {
                    x: axis(None, false),
                    y: axis(Some(true), true),
                }),
                plugins: Plugins {
                    legend: Legend {
                        display: false,
                        position: None,
                        labels: LegendLabels {
                            color: colors.legend.clone(),
                            box_width: None,
                            padding: None,
                        },
                    },
                    tooltip: Some(Tooltip {
                        background_color: TOOLTIP_BACKGROUND.to_string(),
                        title_font: Font { size: 14 },
                        body_font: Font { size: 12 },
                        padding: 10,
                    }),
                },
            },
        }
    }

    /// Doughnut chart with the categorical palette and a side legend
    #[must_use]
    pub fn distribution(label: &str, series: ChartSeries, colors: &ThemeColors) -> Self {
        let (labels, values) = series.into_parts();
        let palette = distribution_colors(values.len());
        Self {
            kind: ChartKind::Doughnut,
            data: ChartData {
                labels,
                datasets: vec![Dataset {
                    label: label.to_string(),
                    data: values,
                    background_color: ColorSpec::PerPoint(palette),
                    border_color: colors.border.clone(),
                    border_width: 3,
                    border_radius: None,
                }],
            },
            options: ChartOptions {
                responsive: true,
                maintain_aspect_ratio: false,
                cutout: Some("65%".to_string()),
                scales: None,
                plugins: Plugins {
                    legend: Legend {
                        display: true,
                        position: Some("right".to_string()),
                        labels: LegendLabels {
                            color: colors.legend.clone(),
                            box_width: Some(12),
                            padding: Some(15),
                        },
                    },
                    tooltip: None,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use serde_json::json;

    fn colors() -> ThemeColors {
        ThemeColors {
            grid: "rgba(0, 0, 0, 0.08)".to_string(),
            ticks: "#777777".to_string(),
            legend: "#111111".to_string(),
            border: "#ffffff".to_string(),
        }
    }

    fn series(labels: &[&str], values: &[f64]) -> Result<ChartSeries> {
        ChartSeries::new(
            labels.iter().map(ToString::to_string).collect(),
            values.to_vec(),
        )
    }

    #[test]
    fn test_trend_config_json_shape() -> Result<()> {
        let config = ChartConfig::trend(
            ChartKind::Bar,
            "Daily active users",
            series(&["06-01", "06-02"], &[3.0, 5.0])?,
            &colors(),
        );
        let value = serde_json::to_value(&config)?;

        assert_eq!(value["type"], json!("bar"));
        assert_eq!(value["data"]["labels"], json!(["06-01", "06-02"]));
        assert_eq!(value["data"]["datasets"][0]["data"], json!([3.0, 5.0]));
        assert_eq!(
            value["data"]["datasets"][0]["backgroundColor"],
            json!("rgba(63, 167, 106, 0.5)")
        );
        assert_eq!(value["data"]["datasets"][0]["borderRadius"], json!(4));
        assert_eq!(value["options"]["maintainAspectRatio"], json!(false));
        assert_eq!(value["options"]["scales"]["y"]["beginAtZero"], json!(true));
        assert_eq!(value["options"]["scales"]["y"]["ticks"]["stepSize"], json!(1));
        assert_eq!(value["options"]["scales"]["y"]["ticks"]["precision"], json!(0));
        assert_eq!(
            value["options"]["scales"]["x"]["grid"]["color"],
            json!("rgba(0, 0, 0, 0.08)")
        );
        assert_eq!(value["options"]["plugins"]["legend"]["display"], json!(false));
        Ok(())
    }

    #[test]
    fn test_trend_tooltip_is_theme_independent() -> Result<()> {
        let mut dark = colors();
        dark.grid = "rgba(255, 255, 255, 0.1)".to_string();
        let light_config =
            ChartConfig::trend(ChartKind::Line, "x", series(&["a"], &[1.0])?, &colors());
        let dark_config = ChartConfig::trend(ChartKind::Line, "x", series(&["a"], &[1.0])?, &dark);

        assert_eq!(
            light_config.options.plugins.tooltip,
            dark_config.options.plugins.tooltip
        );
        let tooltip = serde_json::to_value(&light_config.options.plugins.tooltip)?;
        assert_eq!(tooltip["backgroundColor"], json!("rgba(0, 0, 0, 0.7)"));
        assert_eq!(tooltip["titleFont"]["size"], json!(14));
        Ok(())
    }

    #[test]
    fn test_x_axis_has_no_integer_ticks() -> Result<()> {
        let config = ChartConfig::trend(ChartKind::Bar, "x", series(&["a"], &[1.0])?, &colors());
        let value = serde_json::to_value(&config)?;
        assert!(value["options"]["scales"]["x"]["ticks"].get("stepSize").is_none());
        assert!(value["options"]["scales"]["x"].get("beginAtZero").is_none());
        Ok(())
    }

    #[test]
    fn test_distribution_config_json_shape() -> Result<()> {
        let config = ChartConfig::distribution(
            "Content items",
            series(&["Posts", "Comments", "Likes", "Bookmarks"], &[10.0, 20.0, 5.0, 1.0])?,
            &colors(),
        );
        let value = serde_json::to_value(&config)?;

        assert_eq!(value["type"], json!("doughnut"));
        assert_eq!(value["options"]["cutout"], json!("65%"));
        assert_eq!(value["options"]["plugins"]["legend"]["position"], json!("right"));
        assert_eq!(value["options"]["plugins"]["legend"]["labels"]["boxWidth"], json!(12));
        assert_eq!(value["data"]["datasets"][0]["borderColor"], json!("#ffffff"));
        assert_eq!(value["data"]["datasets"][0]["borderWidth"], json!(3));
        assert_eq!(
            value["data"]["datasets"][0]["backgroundColor"],
            json!(["#3fa76a", "#6c8bc7", "#f0c987", "#b05c90"])
        );
        assert!(value["options"].get("scales").is_none());
        Ok(())
    }

    #[test]
    fn test_distribution_palette_cycles_for_many_categories() -> Result<()> {
        let labels = ["a", "b", "c", "d", "e", "f"];
        let config = ChartConfig::distribution(
            "x",
            series(&labels, &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0])?,
            &colors(),
        );
        let Some(dataset) = config.data.datasets.first() else {
            return Err(crate::error::DashboardError::MalformedData("no dataset".into()));
        };
        match &dataset.background_color {
            ColorSpec::PerPoint(palette) => {
                assert_eq!(palette.len(), 6);
                assert_eq!(palette.last().map(String::as_str), Some("#3fa76a"));
            }
            ColorSpec::Single(_) => {
                return Err(crate::error::DashboardError::MalformedData(
                    "expected per-point colors".into(),
                ));
            }
        }
        Ok(())
    }

    #[test]
    fn test_for_kind_dispatches_by_family() -> Result<()> {
        let line = ChartConfig::for_kind(ChartKind::Line, "x", series(&["a"], &[1.0])?, &colors());
        assert!(line.options.scales.is_some());

        let doughnut =
            ChartConfig::for_kind(ChartKind::Doughnut, "x", series(&["a"], &[1.0])?, &colors());
        assert!(doughnut.options.scales.is_none());
        assert_eq!(doughnut.kind, ChartKind::Doughnut);
        Ok(())
    }
}
