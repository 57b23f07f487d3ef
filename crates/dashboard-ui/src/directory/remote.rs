//! Server-side search and pagination of the user directory
//!
//! Each load replaces the directory container with an HTML fragment from the
//! server. Starting a load aborts the one in flight, so a slow stale response
//! can never overwrite a newer one.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use futures::future::{AbortHandle, Abortable};
use gloo_net::http::Request;
use url::form_urlencoded;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::error::{DashboardError, Result};

/// Query parameter carrying the search term
pub const SEARCH_PARAM: &str = "search";
/// Query parameter carrying the 1-based page number
pub const PAGE_PARAM: &str = "page";

const BUSY_OPACITY: &str = "0.5";
const IDLE_OPACITY: &str = "1";

/// One page of search results to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRequest {
    pub query: String,
    pub page: u32,
}

impl DirectoryRequest {
    pub fn new(query: impl Into<String>, page: u32) -> Self {
        Self {
            query: query.into(),
            page: page.max(1),
        }
    }

    /// Endpoint URL with the search and page parameters appended
    #[must_use]
    pub fn to_url(&self, base: &str) -> String {
        let params = form_urlencoded::Serializer::new(String::new())
            .append_pair(SEARCH_PARAM, &self.query)
            .append_pair(PAGE_PARAM, &self.page.to_string())
            .finish();
        let separator = match base.find('?') {
            None => "?",
            Some(_) if base.ends_with('?') || base.ends_with('&') => "",
            Some(_) => "&",
        };
        format!("{base}{separator}{params}")
    }
}

/// Page number of a pagination link's `href`
#[must_use]
pub fn page_from_href(href: &str) -> Option<u32> {
    let (_, query) = href.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == PAGE_PARAM)
        .and_then(|(_, value)| value.trim().parse().ok())
        .filter(|page| *page > 0)
}

/// The directory endpoint
pub trait DirectoryApi {
    /// Fetch the HTML fragment at `url`
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<String>>;
}

/// The element the fragment is rendered into
pub trait DirectoryView {
    fn set_busy(&self, busy: bool);
    fn replace_content(&self, html: &str);
    fn show_error(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// A newer load started before this one finished
    Superseded,
    Failed(DashboardError),
}

pub struct RemoteDirectory<A, V> {
    api: A,
    view: V,
    base_url: String,
    error_message: String,
    query: RefCell<String>,
    generation: Cell<u64>,
    in_flight: RefCell<Option<(u64, AbortHandle)>>,
}

impl<A: DirectoryApi, V: DirectoryView> RemoteDirectory<A, V> {
    pub fn new(api: A, view: V, base_url: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            api,
            view,
            base_url: base_url.into(),
            error_message: error_message.into(),
            query: RefCell::new(String::new()),
            generation: Cell::new(0),
            in_flight: RefCell::new(None),
        }
    }

    /// Remember the search term; the value is sent as typed, trimmed
    pub fn set_query(&self, query: &str) {
        *self.query.borrow_mut() = query.trim().to_string();
    }

    #[must_use]
    pub fn query(&self) -> String {
        self.query.borrow().clone()
    }

    #[must_use]
    pub fn request(&self, page: u32) -> DirectoryRequest {
        DirectoryRequest::new(self.query(), page)
    }

    /// Abort the load in flight, if any
    pub fn cancel(&self) {
        if let Some((_, handle)) = self.in_flight.borrow_mut().take() {
            handle.abort();
            self.view.set_busy(false);
        }
    }

    /// Fetch `page` for the current query and render it
    ///
    /// Supersedes any earlier load as soon as this is called, before the
    /// returned future is first polled.
    pub fn load(self: Rc<Self>, page: u32) -> impl Future<Output = LoadOutcome> {
        let request = self.request(page);
        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        let (handle, registration) = AbortHandle::new_pair();
        if let Some((_, previous)) = self.in_flight.borrow_mut().replace((generation, handle)) {
            log::debug!("aborting superseded directory load");
            previous.abort();
        }
        self.view.set_busy(true);

        async move {
            let url = request.to_url(&self.base_url);
            log::debug!("loading directory page {} for '{}'", request.page, request.query);

            let Ok(result) = Abortable::new(self.api.fetch_page(&url), registration).await else {
                return LoadOutcome::Superseded;
            };

            self.finish(generation);
            match result {
                Ok(html) => {
                    self.view.replace_content(&html);
                    LoadOutcome::Loaded
                }
                Err(err) => {
                    log::error!("directory load failed: {err}");
                    self.view.show_error(&self.error_message);
                    LoadOutcome::Failed(err)
                }
            }
        }
    }

    fn finish(&self, generation: u64) {
        let mut in_flight = self.in_flight.borrow_mut();
        if in_flight.as_ref().is_some_and(|(g, _)| *g == generation) {
            in_flight.take();
        }
        self.view.set_busy(false);
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }
}

/// `fetch` with the header the server uses to pick the fragment template
pub struct HttpDirectoryApi;

impl DirectoryApi for HttpDirectoryApi {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = Request::get(url)
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await?;
        if !response.ok() {
            return Err(DashboardError::Server {
                status: response.status(),
                message: response.status_text(),
            });
        }
        Ok(response.text().await?)
    }
}

/// The `#user-directory` container
pub struct DomDirectoryView {
    document: Document,
    container: Element,
}

impl DomDirectoryView {
    /// # Errors
    ///
    /// Returns `ElementNotFound` if there is no element with `container_id`.
    pub fn new(document: Document, container_id: &str) -> Result<Self> {
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| DashboardError::ElementNotFound(format!("#{container_id}")))?;
        Ok(Self {
            document,
            container,
        })
    }
}

impl DirectoryView for DomDirectoryView {
    fn set_busy(&self, busy: bool) {
        let Some(container) = self.container.dyn_ref::<HtmlElement>() else {
            return;
        };
        let opacity = if busy { BUSY_OPACITY } else { IDLE_OPACITY };
        if let Err(err) = container.style().set_property("opacity", opacity) {
            log::warn!("could not dim directory: {err:?}");
        }
    }

    fn replace_content(&self, html: &str) {
        // Server-rendered fragment
        self.container.set_inner_html(html);
    }

    fn show_error(&self, message: &str) {
        self.container.set_text_content(None);
        match self.document.create_element("p") {
            Ok(notice) => {
                notice.set_class_name("directory-error");
                notice.set_text_content(Some(message));
                if let Err(err) = self.container.append_child(&notice) {
                    log::error!("could not show directory error: {err:?}");
                }
            }
            Err(err) => log::error!("could not create error notice: {err:?}"),
        }
    }
}
