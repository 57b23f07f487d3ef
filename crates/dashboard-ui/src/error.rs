//! Error types for the dashboard behavior layer
//!
//! Every fallible operation returns [`Result`]. Failures are terminal for the
//! single user action that caused them: the controller logs or surfaces them
//! and the rest of the page keeps working.

use wasm_bindgen::JsValue;

/// Errors that can occur while wiring or running dashboard behaviors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardError {
    /// Embedded data (chart attributes, config JSON) could not be parsed
    #[error("malformed data: {0}")]
    MalformedData(String),

    /// The charting library global is not loaded on the page
    #[error("charting library is not loaded")]
    LibraryMissing,

    /// A required DOM element is absent
    #[error("element not found: {0}")]
    ElementNotFound(String),

    /// The request never produced an HTTP response
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    /// Configuration is internally inconsistent
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A browser API call threw
    #[error("browser API error: {0}")]
    Js(String),

    /// Local storage is unavailable or rejected the write
    #[error("storage error: {0}")]
    Storage(String),
}

impl DashboardError {
    /// Wrap a thrown `JsValue` with a short context label
    #[must_use]
    pub fn js(context: &str, err: &JsValue) -> Self {
        Self::Js(format!("{context}: {err:?}"))
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedData(err.to_string())
    }
}

impl From<gloo_net::Error> for DashboardError {
    fn from(err: gloo_net::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
