//! WASM entry point
//!
//! Trunk compiles this to WASM. It reads the page config, sets up console
//! logging and starts the dashboard controller once the document is parsed.

use std::cell::RefCell;
use std::rc::Rc;

use dashboard_ui::{DashboardConfig, DashboardController, dom};

thread_local! {
    // Listeners hold weak references; this keeps the controller alive
    static CONTROLLER: RefCell<Option<Rc<DashboardController>>> = const { RefCell::new(None) };
}

fn main() {
    // Set up panic hook for better error messages in browser console
    console_error_panic_hook::set_once();

    let (config, config_error) = DashboardConfig::from_document();
    if let Err(err) = console_log::init_with_level(config.log_level()) {
        web_sys::console::error_1(&format!("logger init failed: {err}").into());
    }
    if let Some(err) = config_error {
        log::error!("ignoring {}: {err}", dashboard_ui::config::CONFIG_ATTRIBUTE);
    }

    let started = dom::document().and_then(|document| {
        dom::on_ready(&document, move || match DashboardController::init(config) {
            Ok(controller) => {
                log::info!("dashboard ready");
                CONTROLLER.with(|slot| *slot.borrow_mut() = Some(controller));
            }
            Err(err) => log::error!("dashboard init failed: {err}"),
        })
    });
    if let Err(err) = started {
        log::error!("dashboard not started: {err}");
    }
}
