//! Chart color palette

use super::theme::Theme;

/// RGB color representation (0-255 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to CSS rgba() string with the given opacity
    pub fn to_rgba(&self, alpha: f32) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }

    /// Convert to lowercase hex string (#rrggbb)
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Accent used for the trend series
pub const TREND_ACCENT: RgbColor = RgbColor::new(63, 167, 106);

/// Categorical palette for distribution charts, assigned in order
pub const DISTRIBUTION_PALETTE: [RgbColor; 5] = [
    RgbColor::new(63, 167, 106),  // green
    RgbColor::new(108, 139, 199), // blue
    RgbColor::new(240, 201, 135), // sand
    RgbColor::new(176, 92, 144),  // plum
    RgbColor::new(92, 79, 163),   // indigo
];

/// Tooltip background, identical in both themes
pub const TOOLTIP_BACKGROUND: &str = "rgba(0, 0, 0, 0.7)";

/// One color per category, cycling the palette past five categories
pub fn distribution_colors(count: usize) -> Vec<String> {
    DISTRIBUTION_PALETTE
        .iter()
        .cycle()
        .take(count)
        .map(RgbColor::to_hex)
        .collect()
}

/// Axis grid line color
pub const fn grid_color(theme: Theme) -> &'static str {
    match theme {
        Theme::Dark => "rgba(255, 255, 255, 0.1)",
        Theme::Light => "rgba(0, 0, 0, 0.08)",
    }
}

/// Built-in colors used when the page stylesheet leaves a variable empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackColors {
    pub ticks: &'static str,
    pub legend: &'static str,
    pub border: &'static str,
}

pub const fn fallback_colors(theme: Theme) -> FallbackColors {
    match theme {
        Theme::Light => FallbackColors {
            ticks: "#6c757d",
            legend: "#212529",
            border: "#ffffff",
        },
        Theme::Dark => FallbackColors {
            ticks: "#adb5bd",
            legend: "#f1f3f5",
            border: "#1e1f24",
        },
    }
}
