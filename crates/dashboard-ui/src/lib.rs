//! Client-side behavior layer for the server-rendered admin dashboard
//!
//! This crate compiles to WASM and enhances markup the server has already
//! rendered: section switching, the light/dark theme, Chart.js widgets, the
//! user directory search and the activate/deactivate action.
//!
//! ## Architecture
//! - One [`DashboardController`] per page load, built from [`DashboardConfig`]
//! - Pure logic behind small traits (`ThemeStore`, `SectionHost`,
//!   `ChartBackend`, `DirectoryApi`, `StatusApi`), so it runs natively in tests
//! - web-sys implementations of those traits for the browser
//! - One delegated listener per event kind, routed by a typed dispatch table
//!
//! ## Module Structure
//! - `controller`: load sequence, event handling and teardown
//! - `router`: sidebar/tab section switching
//! - `theme`: theme persistence and application
//! - `charts`: Chart.js construction and theme restyling
//! - `directory`: local filter and remote search of the user table
//! - `status`: user status toggle requests
//! - `dispatch`: (role, event) bindings
//! - `config`: page-supplied configuration
//! - `models`: domain types
//! - `error`: error types and handling

#![forbid(unsafe_code)]

pub mod charts;
pub mod config;
pub mod controller;
pub mod directory;
pub mod dispatch;
pub mod dom;
pub mod effects;
pub mod error;
pub mod models;
pub mod router;
pub mod status;
pub mod theme;

pub use config::DashboardConfig;
pub use controller::DashboardController;
pub use error::{DashboardError, Result};
pub use models::{SectionId, Theme, UserStatus};

#[cfg(test)]
mod tests;
