//! Activate/deactivate a user from the directory table
//!
//! A click POSTs to the button's `data-url`. On success the row's status
//! indicator and the button are rewritten together from one [`UserStatus`];
//! any failure ends in a blocking alert and leaves the row untouched.

use std::future::Future;

use gloo_net::http::Request;
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlDocument};

use crate::config::Messages;
use crate::dom::Notifier;
use crate::error::{DashboardError, Result};
use crate::models::UserStatus;

/// Cookie holding the CSRF token
pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_HEADER: &str = "X-CSRFToken";
/// Attribute on the button with the endpoint URL
pub const URL_ATTRIBUTE: &str = "data-url";
pub const INDICATOR_SELECTOR: &str = ".status-span";

/// JSON body of the toggle endpoint
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ToggleResponse {
    pub status: String,
    pub is_active: Option<bool>,
    pub message: Option<String>,
}

impl ToggleResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// An HTTP response before interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReply {
    pub http_ok: bool,
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The server applied the change; the row now shows this status
    Updated(UserStatus),
    /// 2xx reply whose `status` is not `success`
    Rejected(String),
}

/// Turn an HTTP reply into an outcome
///
/// # Errors
///
/// Returns `Server` for a non-2xx status, carrying the body's `message` or
/// the generic server error. Returns `MalformedData` for a 2xx reply that is
/// not valid JSON or reports success without `is_active`.
pub fn interpret_reply(reply: &RawReply, messages: &Messages) -> Result<ToggleOutcome> {
    if !reply.http_ok {
        let message = serde_json::from_str::<ToggleResponse>(&reply.body)
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| messages.server_error.clone());
        return Err(DashboardError::Server {
            status: reply.status,
            message,
        });
    }

    let body: ToggleResponse = serde_json::from_str(&reply.body)?;
    if !body.is_success() {
        return Ok(ToggleOutcome::Rejected(
            body.message.unwrap_or_else(|| messages.server_error.clone()),
        ));
    }
    body.is_active
        .map(|active| ToggleOutcome::Updated(UserStatus::from_active(active)))
        .ok_or_else(|| DashboardError::MalformedData("success reply without is_active".to_string()))
}

/// Value of cookie `name`, percent-decoded
#[must_use]
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(|value| value.into_owned())
}

/// The CSRF token of the current session, if the cookie is set
#[must_use]
pub fn csrf_token(document: &Document) -> Option<String> {
    let cookies = document.dyn_ref::<HtmlDocument>()?.cookie().ok()?;
    cookie_value(&cookies, CSRF_COOKIE)
}

/// The toggle endpoint
pub trait StatusApi {
    /// POST an empty JSON request to `url`
    ///
    /// Only transport failures are errors; any HTTP status is a reply.
    fn post_toggle(&self, url: &str, csrf_token: Option<&str>) -> impl Future<Output = Result<RawReply>>;
}

/// The table row being toggled
pub trait StatusRow {
    /// Disable the button while a request is in flight
    fn set_pending(&self, pending: bool);

    fn render_status(&self, status: UserStatus);
}

/// Alert text for a failed toggle
#[must_use]
pub fn failure_message(err: &DashboardError, messages: &Messages) -> String {
    let detail = match err {
        DashboardError::Server { message, .. } => message.as_str(),
        DashboardError::Network(_) => messages.network_error.as_str(),
        _ => messages.server_error.as_str(),
    };
    format!("{}: {detail}", messages.request_failed)
}

/// Run one toggle request and apply its result
///
/// # Errors
///
/// Returns the transport or interpretation error after alerting it.
pub async fn toggle_status<A, R, N>(
    api: &A,
    row: &R,
    notifier: &N,
    url: &str,
    csrf_token: Option<&str>,
    messages: &Messages,
) -> Result<ToggleOutcome>
where
    A: StatusApi,
    R: StatusRow,
    N: Notifier + ?Sized,
{
    row.set_pending(true);
    let result = match api.post_toggle(url, csrf_token).await {
        Ok(reply) => interpret_reply(&reply, messages),
        Err(err) => Err(err),
    };
    row.set_pending(false);

    match &result {
        Ok(ToggleOutcome::Updated(status)) => {
            log::info!("user status is now {status:?}");
            row.render_status(*status);
        }
        Ok(ToggleOutcome::Rejected(message)) => {
            log::warn!("status toggle rejected: {message}");
            notifier.alert(&format!("{}: {message}", messages.request_failed));
        }
        Err(err) => {
            log::error!("status toggle failed: {err}");
            notifier.alert(&failure_message(err, messages));
        }
    }
    result
}

/// `fetch` POST with the CSRF header
pub struct HttpStatusApi;

impl StatusApi for HttpStatusApi {
    async fn post_toggle(&self, url: &str, csrf_token: Option<&str>) -> Result<RawReply> {
        let mut request = Request::post(url).header("Content-Type", "application/json");
        if let Some(token) = csrf_token {
            request = request.header(CSRF_HEADER, token);
        } else {
            log::warn!("no {CSRF_COOKIE} cookie, sending toggle without token");
        }
        let response = request.send().await?;
        Ok(RawReply {
            http_ok: response.ok(),
            status: response.status(),
            body: response.text().await?,
        })
    }
}

/// A `.btn-toggle-status` button and the indicator in its row
pub struct DomStatusRow {
    button: Element,
    indicator: Option<Element>,
}

impl DomStatusRow {
    #[must_use]
    pub fn new(button: Element) -> Self {
        let indicator = button
            .closest("tr")
            .ok()
            .flatten()
            .and_then(|row| row.query_selector(INDICATOR_SELECTOR).ok().flatten());
        if indicator.is_none() {
            log::debug!("toggle button has no {INDICATOR_SELECTOR} in its row");
        }
        Self { button, indicator }
    }

    /// The endpoint this button posts to
    #[must_use]
    pub fn url(&self) -> Option<String> {
        self.button
            .get_attribute(URL_ATTRIBUTE)
            .filter(|url| !url.trim().is_empty())
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.button
            .dyn_ref::<HtmlButtonElement>()
            .is_some_and(HtmlButtonElement::disabled)
    }
}

impl StatusRow for DomStatusRow {
    fn set_pending(&self, pending: bool) {
        if let Some(button) = self.button.dyn_ref::<HtmlButtonElement>() {
            button.set_disabled(pending);
        }
    }

    fn render_status(&self, status: UserStatus) {
        let presentation = status.presentation();
        if let Some(indicator) = &self.indicator {
            indicator.set_class_name(presentation.indicator_class);
            indicator.set_text_content(Some(presentation.indicator_text));
        }
        self.button.set_class_name(presentation.button_class);
        self.button.set_text_content(Some(presentation.button_label));
    }
}
