//! Dashboard configuration
//!
//! One parametrized controller replaces the per-page script variants. The page
//! selects chart slots and the search mode through an optional JSON attribute
//! on `<html>`:
//!
//! ```html
//! <html data-dashboard-config='{"search": {"mode": "remote", "url": "/dashboard/users/"}}'>
//! ```
//!
//! Every field has a default, so a page without the attribute gets the local
//! filter and the two standard charts.

use serde::Deserialize;

use crate::charts::ChartKind;
use crate::error::{DashboardError, Result};

/// Attribute on the document element holding the JSON config
pub const CONFIG_ATTRIBUTE: &str = "data-dashboard-config";

/// Section shown on every page load, regardless of the URL fragment
pub const DEFAULT_SECTION: &str = "home-content";

/// Quiet period before a remote search fires
pub const DEFAULT_DEBOUNCE_MS: u32 = 300;

/// How the user directory search behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Legacy: hide non-matching rows of the fully rendered table
    Local,
    /// Debounced server-side search with AJAX pagination
    #[default]
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub mode: SearchMode,
    /// AJAX endpoint for remote mode
    pub url: Option<String>,
    pub debounce_ms: u32,
    /// Element whose contents the remote fragment replaces
    pub container_id: String,
    pub input_id: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode: SearchMode::default(),
            url: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            container_id: "user-directory".to_string(),
            input_id: "user-search-input".to_string(),
        }
    }
}

impl SearchConfig {
    /// Remote mode without an endpoint degrades to the local filter
    #[must_use]
    pub fn effective_mode(&self) -> SearchMode {
        match (self.mode, self.url.as_deref()) {
            (SearchMode::Remote, Some(url)) if !url.trim().is_empty() => SearchMode::Remote,
            _ => SearchMode::Local,
        }
    }
}

/// One chart canvas to render
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChartSlot {
    pub canvas_id: String,
    pub kind: ChartKind,
    /// Dataset label shown in tooltips
    #[serde(default)]
    pub label: String,
}

impl ChartSlot {
    pub fn new(canvas_id: impl Into<String>, kind: ChartKind, label: impl Into<String>) -> Self {
        Self {
            canvas_id: canvas_id.into(),
            kind,
            label: label.into(),
        }
    }
}

fn default_chart_slots() -> Vec<ChartSlot> {
    vec![
        ChartSlot::new("dauChart", ChartKind::Bar, "Daily active users"),
        ChartSlot::new("contentPieChart", ChartKind::Doughnut, "Content items"),
    ]
}

/// User-facing strings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub quit_confirm: String,
    pub support_info: String,
    /// Alert prefix for a failed toggle request
    pub request_failed: String,
    /// Used when the server gives no message of its own
    pub server_error: String,
    pub network_error: String,
    pub directory_error: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            quit_confirm: "Are you sure you want to log out?".to_string(),
            support_info: "Support is not available yet. Please check back soon!".to_string(),
            request_failed: "Request failed".to_string(),
            server_error: "A server error occurred.".to_string(),
            network_error: "Could not reach the server.".to_string(),
            directory_error: "Could not load the user list. Please try again.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub default_section: String,
    pub search: SearchConfig,
    pub charts: Vec<ChartSlot>,
    /// `error`, `warn`, `info`, `debug` or `trace`
    pub log_level: String,
    pub messages: Messages,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_section: DEFAULT_SECTION.to_string(),
            search: SearchConfig::default(),
            charts: default_chart_slots(),
            log_level: "info".to_string(),
            messages: Messages::default(),
        }
    }
}

impl DashboardConfig {
    /// Parse and validate a JSON config
    ///
    /// # Errors
    ///
    /// Returns `MalformedData` for invalid JSON and `InvalidConfig` when the
    /// parsed values are inconsistent.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an empty default section, a zero debounce
    /// delay, or two chart slots sharing a canvas.
    pub fn validate(&self) -> Result<()> {
        if self.default_section.trim().is_empty() {
            return Err(DashboardError::InvalidConfig(
                "default_section must not be empty".to_string(),
            ));
        }
        if self.search.debounce_ms == 0 {
            return Err(DashboardError::InvalidConfig(
                "search.debounce_ms must be positive".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for slot in &self.charts {
            if !seen.insert(slot.canvas_id.as_str()) {
                return Err(DashboardError::InvalidConfig(format!(
                    "chart canvas '{}' is declared twice",
                    slot.canvas_id
                )));
            }
        }
        Ok(())
    }

    /// Configured log level, `Info` when unrecognized
    #[must_use]
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }

    /// Read the config attribute from the current document
    ///
    /// A missing attribute yields the defaults; a malformed one is reported
    /// alongside the defaults so the caller can log it once logging is up.
    #[must_use]
    pub fn from_document() -> (Self, Option<DashboardError>) {
        let raw = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
            .and_then(|root| root.get_attribute(CONFIG_ATTRIBUTE));

        match raw {
            None => (Self::default(), None),
            Some(json) => match Self::from_json(&json) {
                Ok(config) => (config, None),
                Err(err) => (Self::default(), Some(err)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.default_section, "home-content");
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.charts.len(), 2);
        assert_eq!(config.log_level(), log::Level::Info);
    }

    #[test]
    fn test_empty_json_yields_defaults() -> Result<()> {
        let config = DashboardConfig::from_json("{}")?;
        assert_eq!(config, DashboardConfig::default());
        Ok(())
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() -> Result<()> {
        let config = DashboardConfig::from_json(
            r#"{"search": {"mode": "remote", "url": "/dashboard/users/"}, "log_level": "debug"}"#,
        )?;
        assert_eq!(config.search.mode, SearchMode::Remote);
        assert_eq!(config.search.url.as_deref(), Some("/dashboard/users/"));
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.search.container_id, "user-directory");
        assert_eq!(config.log_level(), log::Level::Debug);
        assert_eq!(config.default_section, "home-content");
        Ok(())
    }

    #[test]
    fn test_chart_slots_from_json() -> Result<()> {
        let config = DashboardConfig::from_json(
            r#"{"charts": [{"canvas_id": "mauChart", "kind": "line", "label": "Monthly active users"}]}"#,
        )?;
        assert_eq!(
            config.charts,
            vec![ChartSlot::new("mauChart", ChartKind::Line, "Monthly active users")]
        );
        Ok(())
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let result = DashboardConfig::from_json("{\"charts\": [");
        assert!(matches!(result, Err(DashboardError::MalformedData(_))));
    }

    #[test]
    fn test_unknown_chart_kind_is_rejected() {
        let result =
            DashboardConfig::from_json(r#"{"charts": [{"canvas_id": "x", "kind": "radar"}]}"#);
        assert!(matches!(result, Err(DashboardError::MalformedData(_))));
    }

    #[test]
    fn test_duplicate_canvas_is_rejected() {
        let result = DashboardConfig::from_json(
            r#"{"charts": [{"canvas_id": "a", "kind": "bar"}, {"canvas_id": "a", "kind": "line"}]}"#,
        );
        assert!(matches!(result, Err(DashboardError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_debounce_is_rejected() {
        let result = DashboardConfig::from_json(r#"{"search": {"debounce_ms": 0}}"#);
        assert!(matches!(result, Err(DashboardError::InvalidConfig(_))));
    }

    #[test]
    fn test_remote_without_url_falls_back_to_local() {
        let search = SearchConfig::default();
        assert_eq!(search.mode, SearchMode::Remote);
        assert_eq!(search.effective_mode(), SearchMode::Local);

        let blank = SearchConfig {
            url: Some("  ".to_string()),
            ..SearchConfig::default()
        };
        assert_eq!(blank.effective_mode(), SearchMode::Local);
    }

    #[test]
    fn test_remote_with_url_stays_remote() {
        let search = SearchConfig {
            url: Some("/dashboard/users/".to_string()),
            ..SearchConfig::default()
        };
        assert_eq!(search.effective_mode(), SearchMode::Remote);

        let local = SearchConfig {
            mode: SearchMode::Local,
            url: Some("/dashboard/users/".to_string()),
            ..SearchConfig::default()
        };
        assert_eq!(local.effective_mode(), SearchMode::Local);
    }

    #[test]
    fn test_unknown_log_level_defaults_to_info() {
        let config = DashboardConfig {
            log_level: "verbose".to_string(),
            ..DashboardConfig::default()
        };
        assert_eq!(config.log_level(), log::Level::Info);
    }
}
