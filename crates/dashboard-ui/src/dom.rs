//! Small web-sys helpers shared by the behaviors

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, Event, EventTarget, Window};

use crate::error::{DashboardError, Result};

/// # Errors
///
/// Returns `ElementNotFound` outside a browser context.
pub fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| DashboardError::ElementNotFound("window".to_string()))
}

/// # Errors
///
/// Returns `ElementNotFound` if there is no window or document.
pub fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| DashboardError::ElementNotFound("document".to_string()))
}

/// All elements in the document matching `selector`
///
/// An invalid selector yields an empty list.
pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    document
        .query_selector_all(selector)
        .map(|list| {
            (0..list.length())
                .filter_map(|i| list.item(i))
                .filter_map(|node| node.dyn_into::<Element>().ok())
                .collect()
        })
        .unwrap_or_default()
}

/// All descendants of `root` matching `selector`
pub fn query_all_in(root: &Element, selector: &str) -> Vec<Element> {
    root.query_selector_all(selector)
        .map(|list| {
            (0..list.length())
                .filter_map(|i| list.item(i))
                .filter_map(|node| node.dyn_into::<Element>().ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Nearest ancestor-or-self of the event target matching `selector`
pub fn closest(target: &EventTarget, selector: &str) -> Option<Element> {
    target
        .dyn_ref::<Element>()
        .and_then(|el| el.closest(selector).ok().flatten())
}

/// Add or remove one class
pub fn set_class(element: &Element, class: &str, on: bool) {
    if let Err(err) = element.class_list().toggle_with_force(class, on) {
        log::warn!("could not toggle class '{class}': {err:?}");
    }
}

/// Trimmed text content of an element
pub fn text(element: &Element) -> String {
    element
        .text_content()
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}

/// Blocking user prompts
pub trait Notifier {
    fn alert(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
}

/// `window.alert` / `window.confirm`
pub struct BrowserNotifier {
    window: Window,
}

impl BrowserNotifier {
    #[must_use]
    pub const fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Notifier for BrowserNotifier {
    fn alert(&self, message: &str) {
        if let Err(err) = self.window.alert_with_message(message) {
            log::error!("alert failed: {err:?}");
        }
    }

    fn confirm(&self, message: &str) -> bool {
        self.window.confirm_with_message(message).unwrap_or(false)
    }
}

/// An attached event listener, removable at teardown
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    /// # Errors
    ///
    /// Returns `Js` if the browser rejects the listener.
    pub fn attach<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|e| DashboardError::js(event, &e))?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }

    /// Stop receiving events; the callback stays alive until dropped
    pub fn remove(&self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref())
        {
            log::warn!("could not remove {} listener: {err:?}", self.event);
        }
    }

    /// Remove the listener from its target and release the callback
    pub fn detach(self) {
        self.remove();
    }
}

/// Run `f` once the document has been parsed
///
/// # Errors
///
/// Returns an error if the `DOMContentLoaded` listener cannot be attached.
pub fn on_ready<F>(document: &Document, f: F) -> Result<()>
where
    F: FnOnce() + 'static,
{
    if document.ready_state() != "loading" {
        f();
        return Ok(());
    }
    let mut f = Some(f);
    let listener = Listener::attach(document, "DOMContentLoaded", move |_event| {
        if let Some(f) = f.take() {
            f();
        }
    })?;
    // Fires once for the lifetime of the page
    std::mem::forget(listener);
    Ok(())
}
