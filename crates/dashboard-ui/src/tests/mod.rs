//! Behavioral tests for the dashboard behaviors
//!
//! BDD-style tests using the given-when-then naming convention, run natively
//! against in-memory fakes of the browser seams. `browser` holds the DOM
//! fixtures for the wasm-bindgen tests next to the web-sys code.

pub mod status_behaviors;
