//! Chart.js backend
//!
//! Talks to the `window.Chart` global through `js_sys::Reflect`, so the page
//! decides whether the library is loaded and a missing script degrades to "no
//! chart" instead of a failed import.

use js_sys::{Array, Function, Object, Reflect};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlCanvasElement, Window};

use super::{ChartBackend, ChartConfig, CssVariables, StyleEdit};
use crate::error::{DashboardError, Result};

/// Chart.js loaded as a page global
pub struct ChartJs {
    window: Window,
    document: Document,
}

impl ChartJs {
    /// # Errors
    ///
    /// Returns `ElementNotFound` if the window has no document.
    pub fn new(window: Window) -> Result<Self> {
        let document = window
            .document()
            .ok_or_else(|| DashboardError::ElementNotFound("document".to_string()))?;
        Ok(Self { window, document })
    }

    fn constructor(&self) -> Option<Function> {
        Reflect::get(&self.window, &JsValue::from_str("Chart"))
            .ok()
            .and_then(|ctor| ctor.dyn_into::<Function>().ok())
    }

    fn canvas(&self, canvas_id: &str) -> Result<Element> {
        self.document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| DashboardError::ElementNotFound(format!("#{canvas_id}")))
    }
}

impl ChartBackend for ChartJs {
    type Handle = JsValue;

    fn is_available(&self) -> bool {
        self.constructor().is_some()
    }

    fn read_data(&self, canvas_id: &str) -> Result<(Option<String>, Option<String>)> {
        let canvas = self.canvas(canvas_id)?;
        Ok((
            canvas.get_attribute("data-labels"),
            canvas.get_attribute("data-values"),
        ))
    }

    fn create(&self, canvas_id: &str, config: &ChartConfig) -> Result<JsValue> {
        let ctor = self.constructor().ok_or(DashboardError::LibraryMissing)?;

        let canvas = self
            .canvas(canvas_id)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| DashboardError::ElementNotFound(format!("#{canvas_id} is not a canvas")))?;

        let context = canvas
            .get_context("2d")
            .map_err(|e| DashboardError::js("getContext", &e))?
            .ok_or_else(|| DashboardError::Js("canvas 2d context unavailable".to_string()))?;

        // Plain objects and arrays, not ES Maps
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let options = config
            .serialize(&serializer)
            .map_err(|e| DashboardError::MalformedData(e.to_string()))?;

        Reflect::construct(&ctor, &Array::of2(&context, &options))
            .map_err(|e| DashboardError::js("new Chart", &e))
    }

    fn restyle(&self, handle: &JsValue, patch: &[StyleEdit]) -> Result<()> {
        for edit in patch {
            set_path(handle, edit.path, &JsValue::from_str(&edit.value))?;
        }
        call_method(handle, "update").map(|_| ())
    }

    fn destroy(&self, handle: JsValue) {
        if let Err(err) = call_method(&handle, "destroy") {
            log::warn!("chart destroy failed: {err}");
        }
    }
}

/// Assign `value` at `path`, creating missing intermediate objects
fn set_path(root: &JsValue, path: &[&str], value: &JsValue) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        return Ok(());
    };

    let mut current = root.clone();
    for key in parents {
        let key_js = JsValue::from_str(key);
        let next = Reflect::get(&current, &key_js).map_err(|e| DashboardError::js(key, &e))?;
        current = if next.is_undefined() || next.is_null() {
            let created: JsValue = Object::new().into();
            Reflect::set(&current, &key_js, &created).map_err(|e| DashboardError::js(key, &e))?;
            created
        } else {
            next
        };
    }

    Reflect::set(&current, &JsValue::from_str(last), value)
        .map_err(|e| DashboardError::js(last, &e))?;
    Ok(())
}

fn call_method(target: &JsValue, name: &str) -> Result<JsValue> {
    let method = Reflect::get(target, &JsValue::from_str(name))
        .map_err(|e| DashboardError::js(name, &e))?
        .dyn_into::<Function>()
        .map_err(|_| DashboardError::Js(format!("{name} is not a function")))?;
    method
        .call0(target)
        .map_err(|e| DashboardError::js(name, &e))
}

/// Computed custom properties of the document element
pub struct ComputedStyleVariables {
    window: Window,
    root: Element,
}

impl ComputedStyleVariables {
    /// # Errors
    ///
    /// Returns `ElementNotFound` if the document has no root element.
    pub fn new(window: Window) -> Result<Self> {
        let root = window
            .document()
            .and_then(|d| d.document_element())
            .ok_or_else(|| DashboardError::ElementNotFound("document element".to_string()))?;
        Ok(Self { window, root })
    }
}

impl CssVariables for ComputedStyleVariables {
    fn variable(&self, name: &str) -> Option<String> {
        // Recomputed on each call so a theme switch sees the new values
        let style = self.window.get_computed_style(&self.root).ok().flatten()?;
        let value = style.get_property_value(name).ok()?;
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_set_path_creates_missing_objects() -> std::result::Result<(), JsValue> {
        let root: JsValue = Object::new().into();
        set_path(&root, &["options", "plugins", "legend", "labels", "color"], &"#fff".into())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let color = ["options", "plugins", "legend", "labels", "color"]
            .iter()
            .try_fold(root, |obj, key| Reflect::get(&obj, &JsValue::from_str(key)))?;
        assert_eq!(color.as_string().as_deref(), Some("#fff"));
        Ok(())
    }

    #[wasm_bindgen_test]
    fn test_library_absent_without_global() -> std::result::Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let backend = ChartJs::new(window).map_err(|e| JsValue::from_str(&e.to_string()))?;
        assert!(!backend.is_available());
        Ok(())
    }
}
