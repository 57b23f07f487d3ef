//! The celebrate button's confetti burst
//!
//! `window.confetti` is an optional page script; without it the button does
//! nothing.

use js_sys::{Array, Function, Reflect};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Window;

use crate::error::{DashboardError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfettiOptions {
    pub particle_count: u32,
    pub spread: u32,
    pub origin: Origin,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Origin {
    pub y: f64,
}

impl Default for ConfettiOptions {
    fn default() -> Self {
        Self {
            particle_count: 150,
            spread: 90,
            origin: Origin { y: 0.6 },
        }
    }
}

/// Fire one burst
///
/// Returns `Ok(false)` when the confetti script is not loaded.
///
/// # Errors
///
/// Returns `Js` if the library call throws.
pub fn celebrate(window: &Window, options: &ConfettiOptions) -> Result<bool> {
    let Some(confetti) = Reflect::get(window, &JsValue::from_str("confetti"))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
    else {
        log::debug!("confetti library not loaded");
        return Ok(false);
    };

    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    let options = options
        .serialize(&serializer)
        .map_err(|e| DashboardError::MalformedData(e.to_string()))?;
    confetti
        .apply(&JsValue::NULL, &Array::of1(&options))
        .map_err(|e| DashboardError::js("confetti", &e))?;
    Ok(true)
}
